//! Great-circle distance on a spherical Earth.

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two `(latitude, longitude)` points given in degrees.
///
/// No validation is performed: NaN inputs produce NaN.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Rounds a distance to two decimals for display.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// True when both values are finite and inside the WGS84 degree ranges.
pub fn valid_coordinates(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(12.9, 77.6, 12.9, 77.6), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree along a meridian is R * pi / 180
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.19).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = distance_km(12.97, 77.59, 13.08, 80.27);
        let b = distance_km(13.08, 80.27, 12.97, 77.59);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_bangalore_to_chennai() {
        let d = distance_km(12.9716, 77.5946, 13.0827, 80.2707);
        assert!(d > 285.0 && d < 295.0, "got {}", d);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(2.34567), 2.35);
        assert_eq!(round_km(0.004), 0.0);
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(valid_coordinates(12.9, 77.6));
        assert!(valid_coordinates(-90.0, 180.0));
        assert!(!valid_coordinates(90.5, 0.0));
        assert!(!valid_coordinates(0.0, -181.0));
        assert!(!valid_coordinates(f64::NAN, 0.0));
    }
}
