use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use uuid::Uuid;

pub use crate::models::driver::CoordinateInput;

pub const DEFAULT_TRIP_DURATION_MINUTES: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum TripStatus {
    Pending,
    Confirmed,
    Upcoming,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

/// Visual bucket a trip status is drawn with. Anything outside the known
/// set is drawn as pending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripCategory {
    Pending,
    Upcoming,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TripStatus::Pending => "pending",
            TripStatus::Confirmed => "confirmed",
            TripStatus::Upcoming => "upcoming",
            TripStatus::InProgress => "in_progress",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
            TripStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn category(&self) -> TripCategory {
        match self {
            TripStatus::Completed => TripCategory::Completed,
            TripStatus::InProgress => TripCategory::InProgress,
            TripStatus::Cancelled => TripCategory::Cancelled,
            TripStatus::Upcoming => TripCategory::Upcoming,
            TripStatus::Pending | TripStatus::Confirmed | TripStatus::Other(_) => {
                TripCategory::Pending
            }
        }
    }
}

impl From<String> for TripStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => TripStatus::Pending,
            "confirmed" => TripStatus::Confirmed,
            "upcoming" => TripStatus::Upcoming,
            "in_progress" => TripStatus::InProgress,
            "completed" => TripStatus::Completed,
            "cancelled" => TripStatus::Cancelled,
            _ => TripStatus::Other(raw),
        }
    }
}

impl From<TripStatus> for String {
    fn from(status: TripStatus) -> Self {
        match status {
            TripStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub dropoff_location: Option<String>,
    #[serde(default)]
    pub pickup_coordinates: Option<CoordinateInput>,
    #[serde(default)]
    pub dropoff_coordinates: Option<CoordinateInput>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pickup_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub return_pickup_time: Option<String>,
    pub status: TripStatus,
    #[serde(default)]
    pub driver_id: Option<Uuid>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_phone: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
}

impl Trip {
    pub fn pickup_at(&self) -> Option<DateTime<Utc>> {
        self.pickup_time.as_deref().and_then(parse_timestamp)
    }

    pub fn return_pickup_at(&self) -> Option<DateTime<Utc>> {
        self.return_pickup_time.as_deref().and_then(parse_timestamp)
    }

    pub fn estimated_duration_minutes(&self) -> u32 {
        self.estimated_duration.unwrap_or(DEFAULT_TRIP_DURATION_MINUTES)
    }
}

/// Keeps string values and drops anything else, so one odd timestamp does
/// not reject the record it sits in.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(raw)) => Ok(Some(raw)),
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(other) => {
            debug!(value = %other, "ignoring non-string timestamp");
            Ok(None)
        }
    }
}

/// Accepts RFC 3339 and zone-less ISO timestamps; the latter are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
