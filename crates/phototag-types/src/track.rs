//! GPS track records and samples

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One time-stamped sample from a GPS track.
///
/// `original_time` is what the track file carried; `time` is the effective
/// instant used for matching, `original_time + offset_seconds` of the owning
/// track, and is recomputed whenever an offset changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub original_time: DateTime<Utc>,
    pub time: DateTime<Utc>,
    pub track_index: usize,
}

impl TrackPoint {
    pub fn apply_offset(&mut self, offset_seconds: i64) {
        self.time = self.original_time + Duration::seconds(offset_seconds);
    }
}

/// Geographic bounding box of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl TrackBounds {
    /// Compute bounds over (latitude, longitude) pairs; `None` when empty.
    pub fn from_coordinates<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bounds: Option<TrackBounds> = None;
        for (latitude, longitude) in coordinates {
            bounds = Some(match bounds {
                None => TrackBounds {
                    north: latitude,
                    south: latitude,
                    east: longitude,
                    west: longitude,
                },
                Some(b) => TrackBounds {
                    north: b.north.max(latitude),
                    south: b.south.min(latitude),
                    east: b.east.max(longitude),
                    west: b.west.min(longitude),
                },
            });
        }
        bounds
    }
}

/// Summary of one loaded GPS track.
///
/// `name` is the natural key: loading a second track with the same name is
/// silently discarded by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    pub source_file: String,
    pub offset_seconds: i64,
    pub bounds: Option<TrackBounds>,
    pub point_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bounds_from_coordinates() {
        let bounds =
            TrackBounds::from_coordinates(vec![(45.0, -75.0), (46.5, -74.0), (44.0, -76.2)])
                .unwrap();
        assert_eq!(bounds.north, 46.5);
        assert_eq!(bounds.south, 44.0);
        assert_eq!(bounds.east, -74.0);
        assert_eq!(bounds.west, -76.2);
    }

    #[test]
    fn test_bounds_empty() {
        assert!(TrackBounds::from_coordinates(Vec::new()).is_none());
    }

    #[test]
    fn test_apply_offset() {
        let original = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let mut point = TrackPoint {
            latitude: 45.0,
            longitude: -75.0,
            elevation: None,
            original_time: original,
            time: original,
            track_index: 0,
        };

        point.apply_offset(3600);
        assert_eq!(point.time, original + Duration::hours(1));
        assert_eq!(point.original_time, original);

        point.apply_offset(-1800);
        assert_eq!(point.time, original - Duration::minutes(30));
    }
}
