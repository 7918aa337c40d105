use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;
use uuid::Uuid;

use crate::models::non_blank;
use crate::models::trip::{Trip, TripCategory};

const MISSING_TIME: &str = "N/A";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClientInfo {
    pub name: String,
    pub phone: Option<String>,
    /// First eight characters of the account id, suffixed with "...".
    pub user_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DriverInfo {
    pub name: String,
    pub phone: Option<String>,
}

/// Payload of the trip detail dialog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripDetail {
    pub id: Uuid,
    pub status: String,
    pub status_label: String,
    pub category: TripCategory,
    pub pickup_time: String,
    pub return_pickup_time: Option<String>,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
    pub estimated_duration_minutes: u32,
    pub special_requirements: Option<String>,
    pub notes: Option<String>,
    pub client: Option<ClientInfo>,
    pub driver: Option<DriverInfo>,
    pub details_path: String,
}

impl TripDetail {
    pub fn from_trip<Tz>(trip: &Trip, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let pickup_time = trip
            .pickup_at()
            .map(|at| at.with_timezone(tz).format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| MISSING_TIME.to_string());

        let return_pickup_time = trip.return_pickup_time.as_ref().map(|_| {
            trip.return_pickup_at()
                .map(|at| at.with_timezone(tz).format(TIME_FORMAT).to_string())
                .unwrap_or_else(|| MISSING_TIME.to_string())
        });

        let client = non_blank(&trip.client_name).map(|name| ClientInfo {
            name: name.to_string(),
            phone: non_blank(&trip.phone_number).map(str::to_string),
            user_ref: non_blank(&trip.user_id)
                .map(|id| format!("{}...", id.chars().take(8).collect::<String>())),
        });

        let driver = non_blank(&trip.driver_name).map(|name| DriverInfo {
            name: name.to_string(),
            phone: non_blank(&trip.driver_phone).map(str::to_string),
        });

        Self {
            id: trip.id,
            status: trip.status.as_str().to_string(),
            status_label: trip.status.label(),
            category: trip.status.category(),
            pickup_time,
            return_pickup_time,
            pickup_location: trip.pickup_location.clone(),
            dropoff_location: trip.dropoff_location.clone(),
            estimated_duration_minutes: trip.estimated_duration_minutes(),
            special_requirements: non_blank(&trip.special_requirements).map(str::to_string),
            notes: non_blank(&trip.notes).map(str::to_string),
            client,
            driver,
            details_path: details_path(trip.id),
        }
    }
}

/// Route of the full trip page.
pub fn details_path(trip_id: Uuid) -> String {
    format!("/trips/{trip_id}")
}
