//! Great-circle geometry on WGS84 coordinates.
//!
//! Distance, initial bearing, and destination-point offsets over a spherical
//! earth model. Accuracy is well within GPS noise for the distances this
//! crate works with (meters to a few hundred kilometers).

use serde::{Deserialize, Serialize};

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when the coordinate lies inside the valid WGS84 envelope.
    pub fn is_valid(&self) -> bool {
        self.latitude.abs() <= 90.0 && self.longitude.abs() <= 180.0
    }
}

/// Great-circle distance between two coordinates in meters.
pub fn haversine_meters(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `from` toward `to`, in degrees [0, 360).
///
/// 0 is north, 90 east. Undefined (returns 0) when both points coincide;
/// callers that care about that case must guard on distance first.
pub fn bearing_degrees(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Destination point reached by traveling `distance_meters` from `origin`
/// along `bearing_degrees`.
pub fn offset_meters(origin: Coordinate, bearing_degrees: f64, distance_meters: f64) -> Coordinate {
    let angular = distance_meters / EARTH_RADIUS_M;
    let bearing = bearing_degrees.to_radians();
    let lat1 = origin.latitude.to_radians();
    let lng1 = origin.longitude.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    // Wrap into [-180, 180) so crossing the antimeridian stays valid.
    let longitude = (lng2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    Coordinate::new(lat2.to_degrees(), longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_point_has_zero_distance() {
        let p = Coordinate::new(36.1, -115.1);
        assert!(haversine_meters(p, p) < 0.001);
    }

    #[test]
    fn test_known_distance_vegas_to_la() {
        // Las Vegas to Los Angeles, ~370 km.
        let vegas = Coordinate::new(36.17, -115.14);
        let la = Coordinate::new(34.05, -118.24);
        let dist = haversine_meters(vegas, la);
        assert!(
            dist > 350_000.0 && dist < 400_000.0,
            "LV to LA should be ~370km, got {}",
            dist
        );
    }

    #[test]
    fn test_bearing_due_north() {
        let from = Coordinate::new(36.0, -115.0);
        let to = Coordinate::new(37.0, -115.0);
        assert_relative_eq!(bearing_degrees(from, to), 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_bearing_due_east_near_equator() {
        let from = Coordinate::new(0.0, 10.0);
        let to = Coordinate::new(0.0, 11.0);
        assert_relative_eq!(bearing_degrees(from, to), 90.0, epsilon = 0.01);
    }

    #[test]
    fn test_bearing_is_always_in_range() {
        let from = Coordinate::new(37.0, -115.0);
        let to = Coordinate::new(36.0, -115.5);
        let b = bearing_degrees(from, to);
        assert!((0.0..360.0).contains(&b), "bearing out of range: {}", b);
    }

    #[test]
    fn test_offset_moves_the_expected_distance() {
        let origin = Coordinate::new(36.17, -115.14);
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0] {
            let moved = offset_meters(origin, bearing, 100.0);
            assert_relative_eq!(haversine_meters(origin, moved), 100.0, epsilon = 0.1);
        }
    }

    #[test]
    fn test_offset_across_the_antimeridian_stays_valid() {
        let origin = Coordinate::new(0.0, 179.9999);
        let moved = offset_meters(origin, 90.0, 200.0);
        assert!(moved.is_valid(), "wrapped longitude: {}", moved.longitude);
        assert!(moved.longitude < -179.99);
        assert_relative_eq!(haversine_meters(origin, moved), 200.0, epsilon = 0.1);
    }

    #[test]
    fn test_offset_north_increases_latitude() {
        let origin = Coordinate::new(36.0, -115.0);
        let moved = offset_meters(origin, 0.0, 500.0);
        assert!(moved.latitude > origin.latitude);
        assert_relative_eq!(moved.longitude, origin.longitude, epsilon = 1e-9);
    }
}
