use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::trip::Trip;

/// Which trips the calendar shows. Parses from `"all"`, `"unassigned"`, or a
/// driver id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DriverSelector {
    #[default]
    All,
    Unassigned,
    Driver(Uuid),
}

impl FromStr for DriverSelector {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "all" => Ok(DriverSelector::All),
            "unassigned" => Ok(DriverSelector::Unassigned),
            other => Uuid::parse_str(other)
                .map(DriverSelector::Driver)
                .map_err(|err| format!("invalid driver selector {other:?}: {err}")),
        }
    }
}

impl TryFrom<String> for DriverSelector {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<DriverSelector> for String {
    fn from(selector: DriverSelector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for DriverSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverSelector::All => f.write_str("all"),
            DriverSelector::Unassigned => f.write_str("unassigned"),
            DriverSelector::Driver(id) => write!(f, "{id}"),
        }
    }
}

impl DriverSelector {
    pub fn matches(&self, trip: &Trip) -> bool {
        match self {
            DriverSelector::All => true,
            DriverSelector::Unassigned => trip.driver_id.is_none(),
            DriverSelector::Driver(id) => trip.driver_id == Some(*id),
        }
    }
}

pub fn filter_by_driver(trips: &[Trip], selector: DriverSelector) -> Vec<Trip> {
    trips
        .iter()
        .filter(|trip| selector.matches(trip))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{filter_by_driver, DriverSelector};
    use crate::calendar::bucket::tests::trip;

    fn assigned(seed: u128, driver: u128) -> crate::models::trip::Trip {
        let mut t = trip(seed, Some("2024-02-01T09:00:00Z"));
        t.driver_id = Some(Uuid::from_u128(driver));
        t
    }

    #[test]
    fn unassigned_keeps_only_driverless_trips_in_order() {
        let trips = vec![
            trip(1, None),
            assigned(2, 100),
            trip(3, None),
            assigned(4, 200),
            trip(5, None),
        ];

        let ids: Vec<u128> = filter_by_driver(&trips, DriverSelector::Unassigned)
            .iter()
            .map(|t| t.id.as_u128())
            .collect();

        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn specific_driver_and_all() {
        let trips = vec![assigned(1, 100), assigned(2, 200), trip(3, None)];

        let only_100 = filter_by_driver(&trips, DriverSelector::Driver(Uuid::from_u128(100)));
        assert_eq!(only_100.len(), 1);
        assert_eq!(only_100[0].id.as_u128(), 1);

        assert_eq!(filter_by_driver(&trips, DriverSelector::All).len(), 3);
    }

    #[test]
    fn selector_parses_and_prints() {
        assert_eq!("all".parse::<DriverSelector>(), Ok(DriverSelector::All));
        assert_eq!(
            "unassigned".parse::<DriverSelector>(),
            Ok(DriverSelector::Unassigned)
        );

        let id = Uuid::from_u128(42);
        let parsed: DriverSelector = id.to_string().parse().unwrap();
        assert_eq!(parsed, DriverSelector::Driver(id));
        assert_eq!(parsed.to_string(), id.to_string());

        assert!("someone".parse::<DriverSelector>().is_err());
    }
}
