use std::env;
use std::time::Duration;

use chrono::FixedOffset;

use crate::error::AppError;
use crate::map::projection::PositionFallback;
use crate::map::surface::MapOptions;
use crate::models::driver::GeoPoint;

const DEFAULT_MAPS_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    /// Zone the calendar buckets and formats times in.
    pub calendar_offset: FixedOffset,
    /// Calendar sessions untouched for longer than this are dropped.
    pub session_idle_timeout: Duration,
    pub map_options: MapOptions,
    pub position_fallback: PositionFallback,
    pub maps_script_url: String,
    pub maps_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let defaults = MapOptions::default();
        let map_options = MapOptions {
            center: GeoPoint {
                lat: parse_or_default("MAP_CENTER_LAT", defaults.center.lat)?,
                lng: parse_or_default("MAP_CENTER_LNG", defaults.center.lng)?,
            },
            zoom: parse_or_default("MAP_ZOOM", defaults.zoom)?,
        };

        let offset_minutes: i32 = parse_or_default("CALENDAR_UTC_OFFSET_MINUTES", 0)?;
        let calendar_offset = calendar_offset(offset_minutes)?;

        let position_fallback = match env::var("MAP_POSITION_FALLBACK").as_deref() {
            Err(_) | Ok("unknown") => PositionFallback::Unknown,
            Ok("reference") => PositionFallback::ReferencePoint(map_options.center),
            Ok(other) => {
                return Err(AppError::Internal(format!(
                    "invalid MAP_POSITION_FALLBACK: {other:?} (expected unknown or reference)"
                )));
            }
        };

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            calendar_offset,
            session_idle_timeout: Duration::from_secs(parse_or_default(
                "CALENDAR_SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )?),
            map_options,
            position_fallback,
            maps_script_url: env::var("MAPS_SCRIPT_URL")
                .unwrap_or_else(|_| DEFAULT_MAPS_SCRIPT_URL.to_string()),
            maps_api_key: env::var("MAPS_API_KEY").ok().filter(|key| !key.is_empty()),
        })
    }

    /// Script reference handed to the browser, key included when configured.
    pub fn maps_script_src(&self) -> String {
        match &self.maps_api_key {
            Some(key) => format!("{}?key={key}&libraries=places", self.maps_script_url),
            None => format!("{}?libraries=places", self.maps_script_url),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            log_level: "info".to_string(),
            event_buffer_size: 1024,
            calendar_offset: FixedOffset::east_opt(0).expect("zero offset is valid"),
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            map_options: MapOptions::default(),
            position_fallback: PositionFallback::Unknown,
            maps_script_url: DEFAULT_MAPS_SCRIPT_URL.to_string(),
            maps_api_key: None,
        }
    }
}

fn calendar_offset(minutes: i32) -> Result<FixedOffset, AppError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            AppError::Internal(format!(
                "invalid CALENDAR_UTC_OFFSET_MINUTES: {minutes} is out of range"
            ))
        })
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{calendar_offset, Config};
    use crate::error::AppError;

    #[test]
    fn script_src_includes_key_only_when_set() {
        let mut config = Config::default();
        assert_eq!(
            config.maps_script_src(),
            "https://maps.googleapis.com/maps/api/js?libraries=places"
        );

        config.maps_api_key = Some("abc".to_string());
        assert_eq!(
            config.maps_script_src(),
            "https://maps.googleapis.com/maps/api/js?key=abc&libraries=places"
        );
    }

    #[test]
    fn calendar_offset_accepts_real_zones() {
        assert_eq!(calendar_offset(-300).unwrap().local_minus_utc(), -300 * 60);
        assert_eq!(calendar_offset(0).unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn calendar_offset_rejects_out_of_range_minutes() {
        for minutes in [i32::MAX, i32::MIN, 24 * 60] {
            assert!(matches!(calendar_offset(minutes), Err(AppError::Internal(_))));
        }
    }
}
