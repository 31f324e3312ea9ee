//! EXIF metadata reader for scanned photos.
//!
//! Extraction is best-effort: corrupt or partial metadata yields partial
//! results, never an error. Missing fields stay `None`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{In, Reader, Tag};

/// Metadata extracted from an image file at scan time.
#[derive(Debug, Clone, Default)]
pub struct PhotoMetadata {
    /// Original capture datetime (from camera, naive local treated as UTC)
    pub captured_at: Option<DateTime<Utc>>,
    /// GPS latitude in signed decimal degrees (South negative)
    pub latitude: Option<f64>,
    /// GPS longitude in signed decimal degrees (West negative)
    pub longitude: Option<f64>,
    /// GPS altitude in meters (below sea level negative)
    pub altitude: Option<f64>,
    /// Image title/description
    pub title: Option<String>,
    /// Keyword list as stored (comma-separated)
    pub keywords: Option<String>,
    /// GPS date stamp as recorded, e.g. "2024-06-01"
    pub gps_datestamp: Option<String>,
    /// GPS time stamp as recorded, e.g. "10:30:00"
    pub gps_timestamp: Option<String>,
    /// UTC offset of the capture time, e.g. "+02:00"
    pub offset_time: Option<String>,
}

impl PhotoMetadata {
    /// Read metadata from an image file. Returns `None` when the container
    /// has no readable EXIF block at all.
    pub fn from_file(path: &Path) -> Option<Self> {
        let file = File::open(path).ok()?;
        let mut bufreader = BufReader::new(file);
        let exif = Reader::new().read_from_container(&mut bufreader).ok()?;

        let captured_at = exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))
            .and_then(|f| parse_exif_datetime(&f.display_value().to_string()));

        let latitude = gps_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef);
        let longitude = gps_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef);
        let altitude = gps_altitude(&exif);

        let title = string_field(&exif, Tag::ImageDescription);
        // Keyword and IPTC location fields live outside the EXIF block;
        // they stay absent here and are only written back at export.
        let keywords = None;
        let gps_datestamp = string_field(&exif, Tag::GPSDateStamp);
        let gps_timestamp = string_field(&exif, Tag::GPSTimeStamp);
        let offset_time = string_field(&exif, Tag::OffsetTimeOriginal)
            .or_else(|| string_field(&exif, Tag::OffsetTime));

        Some(Self {
            captured_at,
            latitude,
            longitude,
            altitude,
            title,
            keywords,
            gps_datestamp,
            gps_timestamp,
            offset_time,
        })
    }
}

/// Parse EXIF datetime string (format: "2024:01:15 10:30:45")
fn parse_exif_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim().trim_matches('"');
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

fn string_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let value = exif
        .get_field(tag, In::PRIMARY)?
        .display_value()
        .to_string();
    let value = value.trim().trim_matches('"').trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Extract one GPS coordinate, converting degree/minute/second rational form
/// to signed decimal degrees (South/West negate).
fn gps_coordinate(exif: &exif::Exif, coordinate_tag: Tag, reference_tag: Tag) -> Option<f64> {
    let coordinate_field = exif.get_field(coordinate_tag, In::PRIMARY)?;
    let reference_field = exif.get_field(reference_tag, In::PRIMARY)?;

    let value = coordinate_field.display_value().to_string();
    let reference = reference_field.display_value().to_string();
    decimal_degrees(&value, &reference)
}

/// Parse the numeric parts out of a displayed coordinate and combine them.
/// Handles "deg min sec", "deg min", and already-decimal forms.
fn decimal_degrees(value: &str, reference: &str) -> Option<f64> {
    let parts: Vec<f64> = value
        .split(|c: char| !c.is_numeric() && c != '.')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    let degrees = match parts.len() {
        0 => return None,
        1 => parts[0],
        2 => parts[0] + parts[1] / 60.0,
        _ => parts[0] + parts[1] / 60.0 + parts[2] / 3600.0,
    };

    let sign = if reference.contains('S') || reference.contains('W') {
        -1.0
    } else {
        1.0
    };
    Some(degrees * sign)
}

fn gps_altitude(exif: &exif::Exif) -> Option<f64> {
    let value = exif
        .get_field(Tag::GPSAltitude, In::PRIMARY)?
        .display_value()
        .to_string();
    let meters = first_number(&value)?;

    // Altitude reference 1 means below sea level.
    let below = exif
        .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
        .map(|f| {
            let reference = f.display_value().to_string();
            reference.contains("below") || reference.trim() == "1"
        })
        .unwrap_or(false);

    Some(if below { -meters } else { meters })
}

fn first_number(value: &str) -> Option<f64> {
    value
        .split(|c: char| !c.is_numeric() && c != '.')
        .filter(|s| !s.is_empty())
        .find_map(|s| s.parse().ok())
}
