use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;
use uuid::Uuid;

use crate::map::filter::MapSelection;
use crate::map::palette::{driver_color, trip_color, DROPOFF_COLOR};
use crate::map::projection::{DriverPoint, TripPoint};
use crate::models::driver::GeoPoint;

const DRIVER_Z_INDEX: i32 = 2;
const TRIP_Z_INDEX: i32 = 1;
const POPUP_TIME_FORMAT: &str = "%a, %b %-d, %-I:%M %p";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Driver,
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Popup {
    pub heading: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerSpec {
    /// Driver or trip the marker belongs to.
    pub record_id: Uuid,
    pub kind: MarkerKind,
    pub position: GeoPoint,
    pub title: String,
    pub color: &'static str,
    pub z_index: i32,
    pub popup: Option<Popup>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineSpec {
    pub trip_id: Uuid,
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub color: &'static str,
    pub geodesic: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Overlay {
    Marker(MarkerSpec),
    Line(LineSpec),
}

/// Everything one render pass wants on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayPlan {
    pub overlays: Vec<Overlay>,
    pub drivers: usize,
    pub trips: usize,
    /// Selected records left off the map for lack of a position.
    pub unplaced: usize,
}

pub fn build_overlays<Tz>(selection: &MapSelection<'_>, tz: &Tz) -> OverlayPlan
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut plan = OverlayPlan::default();

    for driver in &selection.drivers {
        match driver_marker(driver) {
            Some(marker) => {
                plan.overlays.push(Overlay::Marker(marker));
                plan.drivers += 1;
            }
            None => plan.unplaced += 1,
        }
    }

    for trip in &selection.trips {
        let Some((pickup, dropoff)) = trip.endpoints() else {
            plan.unplaced += 1;
            continue;
        };

        let color = trip_color(&trip.status);
        plan.overlays.push(Overlay::Marker(MarkerSpec {
            record_id: trip.id,
            kind: MarkerKind::Pickup,
            position: pickup,
            title: format!("Pickup: {}", trip.client_name),
            color,
            z_index: TRIP_Z_INDEX,
            popup: Some(trip_popup(trip, tz)),
        }));
        plan.overlays.push(Overlay::Marker(MarkerSpec {
            record_id: trip.id,
            kind: MarkerKind::Dropoff,
            position: dropoff,
            title: format!("Dropoff: {}", trip.client_name),
            color: DROPOFF_COLOR,
            z_index: TRIP_Z_INDEX,
            popup: None,
        }));
        plan.overlays.push(Overlay::Line(LineSpec {
            trip_id: trip.id,
            from: pickup,
            to: dropoff,
            color,
            geodesic: true,
        }));
        plan.trips += 1;
    }

    plan
}

fn driver_marker(driver: &DriverPoint) -> Option<MarkerSpec> {
    let position = driver.position.point()?;

    let mut lines = vec![driver.status.label()];
    lines.extend(driver.email.clone());

    Some(MarkerSpec {
        record_id: driver.id,
        kind: MarkerKind::Driver,
        position,
        title: driver.name.clone(),
        color: driver_color(&driver.status),
        z_index: DRIVER_Z_INDEX,
        popup: Some(Popup {
            heading: driver.name.clone(),
            lines,
        }),
    })
}

fn trip_popup<Tz>(trip: &TripPoint, tz: &Tz) -> Popup
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let when = match trip.pickup_time {
        Some(at) => format!(
            "Pickup at {}",
            at.with_timezone(tz).format(POPUP_TIME_FORMAT)
        ),
        None => "No pickup time specified".to_string(),
    };

    Popup {
        heading: trip.client_name.clone(),
        lines: vec![when, trip.status.label()],
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{build_overlays, MarkerKind, Overlay};
    use crate::map::filter::{filter_by_status, MapFilter};
    use crate::map::projection::tests::trip_at;
    use crate::map::projection::{project_trip, DriverPoint, Position};
    use crate::models::driver::{DriverStatus, GeoPoint};
    use crate::models::trip::TripStatus;

    #[test]
    fn trip_with_both_ends_gets_two_markers_and_a_line() {
        let mut trip = trip_at(1, Some("37.1,-122.2"), Some("37.2,-122.3"));
        trip.status = TripStatus::Cancelled;
        let trips = vec![project_trip(&trip)];

        let selection = filter_by_status(&[], &trips, &MapFilter::All);
        let plan = build_overlays(&selection, &Utc);

        assert_eq!(plan.trips, 1);
        assert_eq!(plan.overlays.len(), 3);
        match &plan.overlays[0] {
            Overlay::Marker(marker) => {
                assert_eq!(marker.kind, MarkerKind::Pickup);
                assert_eq!(marker.color, "#EF4444");
                let popup = marker.popup.as_ref().unwrap();
                assert_eq!(popup.heading, "Jordan");
                assert_eq!(popup.lines[0], "Pickup at Thu, Feb 1, 5:30 PM");
                assert_eq!(popup.lines[1], "cancelled");
            }
            other => panic!("expected pickup marker, got {other:?}"),
        }
        match &plan.overlays[1] {
            Overlay::Marker(marker) => {
                assert_eq!(marker.kind, MarkerKind::Dropoff);
                assert_eq!(marker.color, "#9CA3AF");
            }
            other => panic!("expected dropoff marker, got {other:?}"),
        }
        assert!(matches!(&plan.overlays[2], Overlay::Line(line) if line.color == "#EF4444"));
    }

    #[test]
    fn records_without_positions_are_counted_not_drawn() {
        let trips = vec![project_trip(&trip_at(1, Some("37.1,-122.2"), None))];
        let drivers = vec![
            DriverPoint {
                id: Uuid::from_u128(5),
                name: "Kim".to_string(),
                position: Position::Unknown,
                status: DriverStatus::Available,
                email: None,
                phone: None,
            },
            DriverPoint {
                id: Uuid::from_u128(6),
                name: "Ola".to_string(),
                position: Position::Known(GeoPoint::new(37.7, -122.4)),
                status: DriverStatus::OnTrip,
                email: Some("ola@example.com".to_string()),
                phone: None,
            },
        ];

        let selection = filter_by_status(&drivers, &trips, &MapFilter::All);
        let plan = build_overlays(&selection, &Utc);

        assert_eq!(plan.drivers, 1);
        assert_eq!(plan.trips, 0);
        assert_eq!(plan.unplaced, 2);
        match &plan.overlays[..] {
            [Overlay::Marker(marker)] => {
                assert_eq!(marker.color, "#F59E0B");
                assert_eq!(
                    marker.popup.as_ref().unwrap().lines,
                    vec!["on trip".to_string(), "ola@example.com".to_string()]
                );
            }
            other => panic!("expected a single driver marker, got {other:?}"),
        }
    }
}
