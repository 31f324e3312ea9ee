//! Predefined position records loaded from user files

use serde::{Deserialize, Serialize};

/// One named position from a user positions file. Immutable once loaded;
/// removal happens in bulk by `source_file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub source_file: String,
}

impl PositionRecord {
    /// Coordinate range check used by the loader before a record is admitted.
    pub fn coordinates_in_range(latitude: f64, longitude: f64) -> bool {
        (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_range() {
        assert!(PositionRecord::coordinates_in_range(45.0, -75.0));
        assert!(PositionRecord::coordinates_in_range(-90.0, 180.0));
        assert!(!PositionRecord::coordinates_in_range(90.5, 0.0));
        assert!(!PositionRecord::coordinates_in_range(0.0, -180.5));
    }
}
