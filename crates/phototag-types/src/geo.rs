//! Coordinate helpers shared by the photo ledger and the stores

use serde::{Deserialize, Serialize};

/// Sentinel meaning "no latitude/longitude present".
///
/// Kept at the record and API boundary because clients key off the numeric
/// value; internal resolution logic goes through [`GeoPosition`] accessors
/// instead of comparing against it directly.
pub const NO_COORDINATE: f64 = -360.0;

/// True when both components carry real coordinates (not the sentinel).
pub fn has_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude != NO_COORDINATE && longitude != NO_COORDINATE
}

/// A resolved latitude/longitude pair with optional altitude in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64, altitude: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Build a position from candidate fields, or `None` if the sentinel is set.
    pub fn from_candidate(latitude: f64, longitude: f64, altitude: Option<f64>) -> Option<Self> {
        if has_coordinates(latitude, longitude) {
            Some(Self::new(latitude, longitude, altitude))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_coordinates() {
        assert!(has_coordinates(45.0, -75.0));
        assert!(!has_coordinates(NO_COORDINATE, -75.0));
        assert!(!has_coordinates(45.0, NO_COORDINATE));
        assert!(!has_coordinates(NO_COORDINATE, NO_COORDINATE));
    }

    #[test]
    fn test_from_candidate() {
        let position = GeoPosition::from_candidate(45.0, -75.0, Some(100.0)).unwrap();
        assert_eq!(position.latitude, 45.0);
        assert_eq!(position.altitude, Some(100.0));

        assert!(GeoPosition::from_candidate(NO_COORDINATE, NO_COORDINATE, None).is_none());
    }
}
