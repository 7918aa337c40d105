use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::parse_lat_lng;
use crate::models::non_blank;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Stored coordinates come either as a "lat,lng" string or as an object.
/// Anything else is kept so a bad record never fails the whole snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CoordinateInput {
    Text(String),
    Pair(GeoPoint),
    Malformed(serde_json::Value),
}

impl CoordinateInput {
    /// The point this input describes, if it is readable and in range.
    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            CoordinateInput::Text(raw) => parse_lat_lng(raw),
            CoordinateInput::Pair(point) => point.is_valid().then_some(*point),
            CoordinateInput::Malformed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum DriverStatus {
    Available,
    OnTrip,
    #[default]
    Offline,
    Other(String),
}

impl DriverStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::OnTrip => "on_trip",
            DriverStatus::Offline => "offline",
            DriverStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<String> for DriverStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "available" => DriverStatus::Available,
            "on_trip" => DriverStatus::OnTrip,
            "offline" => DriverStatus::Offline,
            _ => DriverStatus::Other(raw),
        }
    }
}

impl From<DriverStatus> for String {
    fn from(status: DriverStatus) -> Self {
        match status {
            DriverStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: DriverStatus,
    #[serde(default)]
    pub current_position: Option<CoordinateInput>,
}

impl Driver {
    /// Full name, then "first last", then email, then a short id tag.
    pub fn display_name(&self) -> String {
        if let Some(full_name) = non_blank(&self.full_name) {
            return full_name.to_string();
        }

        let joined = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let joined = joined.trim();
        if !joined.is_empty() {
            return joined.to_string();
        }

        if let Some(email) = non_blank(&self.email) {
            return email.to_string();
        }

        let id = self.id.to_string();
        format!("Driver {}", &id[..6])
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{CoordinateInput, Driver, DriverStatus, GeoPoint};

    fn driver() -> Driver {
        Driver {
            id: Uuid::parse_str("a1b2c3d4-0000-0000-0000-000000000000").unwrap(),
            full_name: None,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            status: DriverStatus::Offline,
            current_position: None,
        }
    }

    #[test]
    fn full_name_wins_over_everything() {
        let mut d = driver();
        d.full_name = Some("Ada Lovelace".to_string());
        d.first_name = Some("Ada".to_string());
        d.email = Some("ada@example.com".to_string());
        assert_eq!(d.display_name(), "Ada Lovelace");
    }

    #[test]
    fn first_and_last_are_trimmed() {
        let mut d = driver();
        d.first_name = Some("Grace".to_string());
        assert_eq!(d.display_name(), "Grace");

        d.last_name = Some("Hopper".to_string());
        assert_eq!(d.display_name(), "Grace Hopper");
    }

    #[test]
    fn falls_back_to_email_then_id_prefix() {
        let mut d = driver();
        d.email = Some("someone@example.com".to_string());
        assert_eq!(d.display_name(), "someone@example.com");

        d.email = Some("   ".to_string());
        assert_eq!(d.display_name(), "Driver a1b2c3");
    }

    #[test]
    fn status_defaults_to_offline_and_keeps_unknown_values() {
        let parsed: Driver = serde_json::from_value(serde_json::json!({
            "id": "a1b2c3d4-0000-0000-0000-000000000000"
        }))
        .unwrap();
        assert_eq!(parsed.status, DriverStatus::Offline);

        let parsed: Driver = serde_json::from_value(serde_json::json!({
            "id": "a1b2c3d4-0000-0000-0000-000000000000",
            "status": "on_break"
        }))
        .unwrap();
        assert_eq!(parsed.status, DriverStatus::Other("on_break".to_string()));
        assert_eq!(serde_json::to_value(&parsed.status).unwrap(), "on_break");
    }

    #[test]
    fn position_accepts_text_object_or_junk() {
        let parsed: Driver = serde_json::from_value(serde_json::json!({
            "id": "a1b2c3d4-0000-0000-0000-000000000000",
            "current_position": "37.1,-122.2"
        }))
        .unwrap();
        assert_eq!(
            parsed.current_position.as_ref().and_then(CoordinateInput::point),
            Some(GeoPoint::new(37.1, -122.2))
        );

        let parsed: Driver = serde_json::from_value(serde_json::json!({
            "id": "a1b2c3d4-0000-0000-0000-000000000000",
            "current_position": { "lat": null, "lng": null }
        }))
        .unwrap();
        assert!(matches!(
            parsed.current_position,
            Some(CoordinateInput::Malformed(_))
        ));
        assert!(parsed
            .current_position
            .as_ref()
            .and_then(CoordinateInput::point)
            .is_none());
    }
}
