use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::geo::haversine_km;
use crate::models::driver::{Driver, DriverStatus, GeoPoint};
use crate::models::non_blank;
use crate::models::trip::{CoordinateInput, Trip, TripStatus};

/// Where a point sits on the map, if anywhere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Position {
    Known(GeoPoint),
    Unknown,
}

impl Position {
    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            Position::Known(point) => Some(*point),
            Position::Unknown => None,
        }
    }
}

/// What to do with a record that has no usable coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PositionFallback {
    #[default]
    Unknown,
    /// Pin the record to a fixed point, e.g. the map centre.
    ReferencePoint(GeoPoint),
}

impl PositionFallback {
    pub fn resolve(&self, point: Option<GeoPoint>) -> Position {
        match (point, self) {
            (Some(point), _) => Position::Known(point),
            (None, PositionFallback::Unknown) => Position::Unknown,
            (None, PositionFallback::ReferencePoint(reference)) => Position::Known(*reference),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DriverPoint {
    pub id: Uuid,
    pub name: String,
    pub position: Position,
    pub status: DriverStatus,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripPoint {
    pub id: Uuid,
    pub client_name: String,
    pub pickup: Position,
    pub dropoff: Position,
    pub status: TripStatus,
    pub pickup_time: Option<DateTime<Utc>>,
    pub driver_id: Option<Uuid>,
    pub pickup_address: Option<String>,
    pub dropoff_address: Option<String>,
    /// Straight-line distance when both ends are known.
    pub distance_km: Option<f64>,
}

impl TripPoint {
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        Some((self.pickup.point()?, self.dropoff.point()?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Projector {
    fallback: PositionFallback,
}

impl Projector {
    pub fn new(fallback: PositionFallback) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> PositionFallback {
        self.fallback
    }

    pub fn project_driver(&self, driver: &Driver) -> DriverPoint {
        let point = driver.current_position.as_ref().and_then(|input| {
            let point = input.point();
            if point.is_none() {
                warn!(driver_id = %driver.id, raw = ?input, "unusable driver position");
            }
            point
        });

        DriverPoint {
            id: driver.id,
            name: driver.display_name(),
            position: self.fallback.resolve(point),
            status: driver.status.clone(),
            email: non_blank(&driver.email).map(str::to_string),
            phone: non_blank(&driver.phone).map(str::to_string),
        }
    }

    pub fn project_trip(&self, trip: &Trip) -> TripPoint {
        let pickup = self.fallback.resolve(resolve_coordinates(
            trip.id,
            "pickup",
            trip.pickup_coordinates.as_ref(),
        ));
        let dropoff = self.fallback.resolve(resolve_coordinates(
            trip.id,
            "dropoff",
            trip.dropoff_coordinates.as_ref(),
        ));

        let distance_km = match (pickup, dropoff) {
            (Position::Known(from), Position::Known(to)) => Some(haversine_km(&from, &to)),
            _ => None,
        };

        TripPoint {
            id: trip.id,
            client_name: client_name(trip),
            pickup,
            dropoff,
            status: trip.status.clone(),
            pickup_time: trip.pickup_at(),
            driver_id: trip.driver_id,
            pickup_address: non_blank(&trip.pickup_location).map(str::to_string),
            dropoff_address: non_blank(&trip.dropoff_location).map(str::to_string),
            distance_km,
        }
    }

    pub fn project_all(&self, drivers: &[Driver], trips: &[Trip]) -> (Vec<DriverPoint>, Vec<TripPoint>) {
        (
            drivers.iter().map(|d| self.project_driver(d)).collect(),
            trips.iter().map(|t| self.project_trip(t)).collect(),
        )
    }
}

/// Projects with unknown positions left unknown.
pub fn project_driver(driver: &Driver) -> DriverPoint {
    Projector::default().project_driver(driver)
}

pub fn project_trip(trip: &Trip) -> TripPoint {
    Projector::default().project_trip(trip)
}

fn client_name(trip: &Trip) -> String {
    if let Some(name) = non_blank(&trip.client_name) {
        return name.to_string();
    }

    match non_blank(&trip.user_id) {
        Some(user_id) => format!("Client {}", user_id.chars().take(4).collect::<String>()),
        None => "Unknown Client".to_string(),
    }
}

fn resolve_coordinates(
    trip_id: Uuid,
    end: &'static str,
    input: Option<&CoordinateInput>,
) -> Option<GeoPoint> {
    let parsed = input?.point();
    if parsed.is_none() {
        warn!(trip_id = %trip_id, end, raw = ?input, "unusable trip coordinates");
    }

    parsed
}
