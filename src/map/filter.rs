use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::map::projection::{DriverPoint, TripPoint};
use crate::models::driver::DriverStatus;

/// Which layers the map shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MapFilter {
    #[default]
    All,
    /// Drivers in this status only; trips are hidden.
    Drivers(DriverStatus),
    /// Trip markers and routes only; drivers are hidden.
    Trips,
}

impl FromStr for MapFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "all" => Ok(MapFilter::All),
            "trips" => Ok(MapFilter::Trips),
            "available" => Ok(MapFilter::Drivers(DriverStatus::Available)),
            "on_trip" => Ok(MapFilter::Drivers(DriverStatus::OnTrip)),
            "offline" => Ok(MapFilter::Drivers(DriverStatus::Offline)),
            other => Err(format!("unknown map filter {other:?}")),
        }
    }
}

impl TryFrom<String> for MapFilter {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<MapFilter> for String {
    fn from(filter: MapFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for MapFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapFilter::All => f.write_str("all"),
            MapFilter::Trips => f.write_str("trips"),
            MapFilter::Drivers(status) => f.write_str(status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapSelection<'a> {
    pub drivers: Vec<&'a DriverPoint>,
    pub trips: Vec<&'a TripPoint>,
}

pub fn filter_by_status<'a>(
    drivers: &'a [DriverPoint],
    trips: &'a [TripPoint],
    filter: &MapFilter,
) -> MapSelection<'a> {
    match filter {
        MapFilter::All => MapSelection {
            drivers: drivers.iter().collect(),
            trips: trips.iter().collect(),
        },
        MapFilter::Drivers(status) => MapSelection {
            drivers: drivers.iter().filter(|d| &d.status == status).collect(),
            trips: Vec::new(),
        },
        MapFilter::Trips => MapSelection {
            drivers: Vec::new(),
            trips: trips.iter().collect(),
        },
    }
}
