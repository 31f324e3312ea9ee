//! Photo records and the final-coordinate resolution cascade

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{GeoPosition, NO_COORDINATE};

/// Sort order for the photo ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Capture time (falling back to filesystem creation time), ascending
    #[default]
    Time,
    /// Original filename, ascending
    Name,
}

/// Photo listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFilter {
    #[default]
    All,
    Tagged,
    Untagged,
}

impl PhotoFilter {
    /// Parse a filter name; anything unrecognized means "all".
    pub fn parse(text: &str) -> Self {
        match text {
            "tagged" => Self::Tagged,
            "untagged" => Self::Untagged,
            _ => Self::All,
        }
    }

    pub fn matches(&self, record: &PhotoRecord) -> bool {
        match self {
            Self::All => true,
            Self::Tagged => record.tagged,
            Self::Untagged => !record.tagged,
        }
    }
}

/// One scanned photo with all candidate and derived metadata fields.
///
/// Coordinate candidates come in three tiers: `exif_*` extracted at scan time
/// and never mutated afterward, `gpx_*` owned by track matching, and
/// `manual_*` set by explicit user action. `final_*` is derived and must only
/// change through [`PhotoRecord::resolve_final`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub filename: String,
    pub full_path: PathBuf,

    pub exif_capture_time: Option<DateTime<Utc>>,
    pub creation_time: DateTime<Utc>,
    pub new_time: Option<DateTime<Utc>>,

    pub exif_latitude: f64,
    pub exif_longitude: f64,
    pub exif_altitude: Option<f64>,
    pub gpx_latitude: f64,
    pub gpx_longitude: f64,
    pub gpx_altitude: Option<f64>,
    pub manual_latitude: f64,
    pub manual_longitude: f64,
    pub manual_altitude: Option<f64>,
    pub final_latitude: f64,
    pub final_longitude: f64,
    pub final_altitude: Option<f64>,

    pub exif_title: String,
    pub new_title: String,
    pub exif_keywords: String,
    pub new_keywords: String,
    pub exif_city: String,
    pub new_city: String,
    pub exif_sublocation: String,
    pub new_sublocation: String,
    pub exif_state: String,
    pub new_state: String,
    pub exif_country: String,
    pub new_country: String,
    pub exif_gps_datestamp: String,
    pub new_gps_datestamp: String,
    pub exif_gps_timestamp: String,
    pub new_gps_timestamp: String,
    pub exif_offset_time: String,
    pub new_offset_time: String,

    pub new_name: String,
    pub tagged: bool,
}

impl PhotoRecord {
    /// Create a record with every candidate field at its unset default.
    pub fn new(filename: String, full_path: PathBuf, creation_time: DateTime<Utc>) -> Self {
        Self {
            filename,
            full_path,
            exif_capture_time: None,
            creation_time,
            new_time: None,
            exif_latitude: NO_COORDINATE,
            exif_longitude: NO_COORDINATE,
            exif_altitude: None,
            gpx_latitude: NO_COORDINATE,
            gpx_longitude: NO_COORDINATE,
            gpx_altitude: None,
            manual_latitude: NO_COORDINATE,
            manual_longitude: NO_COORDINATE,
            manual_altitude: None,
            final_latitude: NO_COORDINATE,
            final_longitude: NO_COORDINATE,
            final_altitude: None,
            exif_title: String::new(),
            new_title: String::new(),
            exif_keywords: String::new(),
            new_keywords: String::new(),
            exif_city: String::new(),
            new_city: String::new(),
            exif_sublocation: String::new(),
            new_sublocation: String::new(),
            exif_state: String::new(),
            new_state: String::new(),
            exif_country: String::new(),
            new_country: String::new(),
            exif_gps_datestamp: String::new(),
            new_gps_datestamp: String::new(),
            exif_gps_timestamp: String::new(),
            new_gps_timestamp: String::new(),
            exif_offset_time: String::new(),
            new_offset_time: String::new(),
            new_name: String::new(),
            tagged: false,
        }
    }

    pub fn exif_location(&self) -> Option<GeoPosition> {
        GeoPosition::from_candidate(self.exif_latitude, self.exif_longitude, self.exif_altitude)
    }

    pub fn gpx_location(&self) -> Option<GeoPosition> {
        GeoPosition::from_candidate(self.gpx_latitude, self.gpx_longitude, self.gpx_altitude)
    }

    pub fn manual_location(&self) -> Option<GeoPosition> {
        GeoPosition::from_candidate(
            self.manual_latitude,
            self.manual_longitude,
            self.manual_altitude,
        )
    }

    pub fn final_location(&self) -> Option<GeoPosition> {
        GeoPosition::from_candidate(self.final_latitude, self.final_longitude, self.final_altitude)
    }

    /// Re-derive `final_*` from the candidates: manual wins over gpx wins
    /// over exif; with no candidate present the fields stay unset.
    ///
    /// Must be called after every mutation of `manual_*` or `gpx_*`.
    pub fn resolve_final(&mut self) {
        let resolved = self
            .manual_location()
            .or_else(|| self.gpx_location())
            .or_else(|| self.exif_location());

        match resolved {
            Some(position) => {
                self.final_latitude = position.latitude;
                self.final_longitude = position.longitude;
                self.final_altitude = position.altitude;
            }
            None => {
                self.final_latitude = NO_COORDINATE;
                self.final_longitude = NO_COORDINATE;
                self.final_altitude = None;
            }
        }
    }

    /// Capture time if known, else filesystem creation time.
    pub fn best_time(&self) -> DateTime<Utc> {
        self.exif_capture_time.unwrap_or(self.creation_time)
    }

    /// Timestamp written at export: the user override wins over the
    /// embedded capture time.
    pub fn export_time(&self) -> Option<DateTime<Utc>> {
        self.new_time.or(self.exif_capture_time)
    }

    /// Title written at export: the user overlay wins when non-empty.
    pub fn export_title(&self) -> Option<&str> {
        pick_overlay(&self.new_title, &self.exif_title)
    }

    pub fn export_keywords(&self) -> Option<&str> {
        pick_overlay(&self.new_keywords, &self.exif_keywords)
    }

    pub fn export_city(&self) -> Option<&str> {
        pick_overlay(&self.new_city, &self.exif_city)
    }

    pub fn export_sublocation(&self) -> Option<&str> {
        pick_overlay(&self.new_sublocation, &self.exif_sublocation)
    }

    pub fn export_state(&self) -> Option<&str> {
        pick_overlay(&self.new_state, &self.exif_state)
    }

    pub fn export_country(&self) -> Option<&str> {
        pick_overlay(&self.new_country, &self.exif_country)
    }

    pub fn export_offset_time(&self) -> Option<&str> {
        pick_overlay(&self.new_offset_time, &self.exif_offset_time)
    }
}

fn pick_overlay<'a>(new_value: &'a str, exif_value: &'a str) -> Option<&'a str> {
    if !new_value.is_empty() {
        Some(new_value)
    } else if !exif_value.is_empty() {
        Some(exif_value)
    } else {
        None
    }
}

/// Partial update for the user-editable overlay fields of a photo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoMetadataUpdate {
    #[serde(default)]
    pub new_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub new_title: Option<String>,
    #[serde(default)]
    pub new_keywords: Option<String>,
    #[serde(default)]
    pub new_city: Option<String>,
    #[serde(default)]
    pub new_sublocation: Option<String>,
    #[serde(default)]
    pub new_state: Option<String>,
    #[serde(default)]
    pub new_country: Option<String>,
    #[serde(default)]
    pub new_gps_datestamp: Option<String>,
    #[serde(default)]
    pub new_gps_timestamp: Option<String>,
    #[serde(default)]
    pub new_offset_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> PhotoRecord {
        PhotoRecord::new(
            "IMG_0001.jpg".to_string(),
            PathBuf::from("/photos/IMG_0001.jpg"),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_record_has_no_locations() {
        let photo = record();
        assert!(photo.exif_location().is_none());
        assert!(photo.gpx_location().is_none());
        assert!(photo.manual_location().is_none());
        assert!(photo.final_location().is_none());
    }

    #[test]
    fn test_cascade_priority() {
        let mut photo = record();
        photo.exif_latitude = 1.0;
        photo.exif_longitude = 2.0;
        photo.resolve_final();
        assert_eq!(photo.final_latitude, 1.0);

        photo.gpx_latitude = 3.0;
        photo.gpx_longitude = 4.0;
        photo.resolve_final();
        assert_eq!(photo.final_latitude, 3.0);

        photo.manual_latitude = 5.0;
        photo.manual_longitude = 6.0;
        photo.manual_altitude = Some(10.0);
        photo.resolve_final();
        assert_eq!(photo.final_latitude, 5.0);
        assert_eq!(photo.final_altitude, Some(10.0));
    }

    #[test]
    fn test_best_time_falls_back_to_creation_time() {
        let mut photo = record();
        assert_eq!(photo.best_time(), photo.creation_time);

        let captured = Utc.with_ymd_and_hms(2024, 5, 30, 9, 30, 0).unwrap();
        photo.exif_capture_time = Some(captured);
        assert_eq!(photo.best_time(), captured);
    }

    #[test]
    fn test_export_title_overlay_wins() {
        let mut photo = record();
        assert_eq!(photo.export_title(), None);

        photo.exif_title = "embedded".to_string();
        assert_eq!(photo.export_title(), Some("embedded"));

        photo.new_title = "edited".to_string();
        assert_eq!(photo.export_title(), Some("edited"));
    }
}
