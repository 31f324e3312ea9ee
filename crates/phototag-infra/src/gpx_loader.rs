//! GPX track file parsing

use chrono::{DateTime, Utc};
use phototag_store::{ParsedPoint, ParsedTrack};
use phototag_types::{Error, Result};

/// Parse GPX content into track samples.
///
/// All tracks in the file are flattened into one sample sequence; the track
/// name comes from the first named track, falling back to the source name.
/// Structurally invalid content is a parse error.
pub fn parse_gpx(content: &str, source_name: &str) -> Result<ParsedTrack> {
    let document =
        gpx::read(content.as_bytes()).map_err(|e| Error::Parse(format!("invalid GPX data: {e}")))?;

    let mut name = String::new();
    let mut points = Vec::new();

    for track in &document.tracks {
        if name.is_empty() {
            if let Some(track_name) = &track.name {
                name = track_name.clone();
            }
        }
        for segment in &track.segments {
            for waypoint in &segment.points {
                let position = waypoint.point();
                points.push(ParsedPoint {
                    latitude: position.y(),
                    longitude: position.x(),
                    elevation: waypoint.elevation,
                    time: waypoint.time.clone().and_then(to_utc),
                });
            }
        }
    }

    if name.is_empty() {
        name = source_name.to_string();
    }

    Ok(ParsedTrack { name, points })
}

fn to_utc(timestamp: gpx::Time) -> Option<DateTime<Utc>> {
    let parsed = time::OffsetDateTime::from(timestamp);
    DateTime::from_timestamp(parsed.unix_timestamp(), parsed.nanosecond())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning ride</name>
    <trkseg>
      <trkpt lat="45.0" lon="-75.0">
        <ele>120.5</ele>
        <time>2024-06-01T10:00:00Z</time>
      </trkpt>
      <trkpt lat="45.1" lon="-75.1">
        <ele>121.0</ele>
        <time>2024-06-01T10:05:00Z</time>
      </trkpt>
      <trkpt lat="45.2" lon="-75.2"/>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_parse_gpx() {
        let parsed = parse_gpx(SAMPLE_GPX, "ride.gpx").unwrap();

        assert_eq!(parsed.name, "Morning ride");
        assert_eq!(parsed.points.len(), 3);

        let first = &parsed.points[0];
        assert_eq!(first.latitude, 45.0);
        assert_eq!(first.longitude, -75.0);
        assert_eq!(first.elevation, Some(120.5));
        assert_eq!(
            first.time,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap())
        );

        // The point without a timestamp is kept for bounds, untimed.
        assert!(parsed.points[2].time.is_none());
    }

    #[test]
    fn test_parse_gpx_unnamed_track_uses_source_name() {
        let unnamed = SAMPLE_GPX.replace("<name>Morning ride</name>", "");
        let parsed = parse_gpx(&unnamed, "ride.gpx").unwrap();
        assert_eq!(parsed.name, "ride.gpx");
    }

    #[test]
    fn test_parse_gpx_invalid_content() {
        assert!(matches!(
            parse_gpx("this is not xml", "bad.gpx"),
            Err(Error::Parse(_))
        ));
    }
}
