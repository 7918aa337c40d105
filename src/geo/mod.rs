use crate::models::driver::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Parses a "lat,lng" pair. Whitespace around either half is ignored.
pub fn parse_lat_lng(raw: &str) -> Option<GeoPoint> {
    let (lat, lng) = raw.split_once(',')?;
    if lng.contains(',') {
        return None;
    }

    let point = GeoPoint {
        lat: lat.trim().parse().ok()?,
        lng: lng.trim().parse().ok()?,
    };

    point.is_valid().then_some(point)
}

#[cfg(test)]
mod tests {
    use super::{haversine_km, parse_lat_lng};
    use crate::models::driver::GeoPoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: 37.7749,
            lng: -122.4194,
        };
        let distance = haversine_km(&p, &p);
        assert!(distance < 1e-9);
    }

    #[test]
    fn san_francisco_to_oakland_is_around_13_km() {
        let sf = GeoPoint {
            lat: 37.7749,
            lng: -122.4194,
        };
        let oakland = GeoPoint {
            lat: 37.8044,
            lng: -122.2712,
        };
        let distance = haversine_km(&sf, &oakland);
        assert!((distance - 13.4).abs() < 1.0);
    }

    #[test]
    fn parses_exact_pair() {
        assert_eq!(parse_lat_lng("37.1,-122.2"), Some(GeoPoint::new(37.1, -122.2)));
        assert_eq!(parse_lat_lng(" 0 , 0 "), Some(GeoPoint::new(0.0, 0.0)));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert_eq!(parse_lat_lng("37.1"), None);
        assert_eq!(parse_lat_lng("37.1,-122.2,5"), None);
        assert_eq!(parse_lat_lng("abc,def"), None);
        assert_eq!(parse_lat_lng("NaN,1"), None);
        assert_eq!(parse_lat_lng("91,0"), None);
    }
}
