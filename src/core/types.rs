//! Core data types for the fare meter

use crate::core::constants::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};

/// A single positioning fix in geodetic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Fix timestamp (milliseconds since epoch)
    pub timestamp_ms: u64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: u64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms,
        }
    }

    /// Great-circle distance to another coordinate in kilometers (haversine).
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_for_identical_coordinates() {
        let a = Coordinate::new(22.3000, 114.1700, 0);
        let b = Coordinate::new(22.3000, 114.1700, 1000);
        assert_eq!(a.distance_km(&b), 0.0);
    }

    #[test]
    fn test_haversine_one_kilometer() {
        // ~0.009 degrees of latitude is close to 1 km on the ground
        let a = Coordinate::new(22.3000, 114.1700, 0);
        let b = Coordinate::new(22.3090, 114.1700, 1000);
        let d = a.distance_km(&b);
        assert!((d - 1.0).abs() < 0.01, "expected ~1.0 km, got {}", d);
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = Coordinate::new(22.3193, 114.1694, 0);
        let b = Coordinate::new(22.2783, 114.1747, 0);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-12);
    }

    #[test]
    fn test_haversine_cross_harbour() {
        // Tsim Sha Tsui to Central is roughly 2.2 km in a straight line
        let tst = Coordinate::new(22.2976, 114.1722, 0);
        let central = Coordinate::new(22.2819, 114.1582, 0);
        let d = tst.distance_km(&central);
        assert!(d > 1.5 && d < 3.0, "unexpected distance {}", d);
    }
}
