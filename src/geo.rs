//! Great-circle distance between destination and owner coordinates.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres. Symmetric, zero for identical points.
pub fn haversine(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIVAKASI: GeoPoint = GeoPoint { lat: 9.4533, lon: 77.7975 };
    const RAJAPALAYAM: GeoPoint = GeoPoint { lat: 9.4522, lon: 77.5535 };

    #[test]
    fn zero_for_identical_points() {
        assert_eq!(haversine(SIVAKASI, SIVAKASI), 0.0);
    }

    #[test]
    fn symmetric() {
        let there = haversine(SIVAKASI, RAJAPALAYAM);
        let back = haversine(RAJAPALAYAM, SIVAKASI);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn sivakasi_to_rajapalayam_is_about_27_km() {
        let d = haversine(SIVAKASI, RAJAPALAYAM);
        assert!(d > 25.0 && d < 29.0, "got {d}");
    }

    #[test]
    fn small_offset_is_under_a_kilometre() {
        let near = GeoPoint { lat: SIVAKASI.lat + 0.004, lon: SIVAKASI.lon };
        let d = haversine(SIVAKASI, near);
        assert!(d > 0.3 && d < 0.6, "got {d}");
    }
}
