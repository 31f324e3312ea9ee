//! Integration tests for the reconciliation flow across ledger and tracks

use chrono::{DateTime, TimeZone, Utc};
use phototag_store::{
    format_offset, parse_offset, ParsedPoint, ParsedTrack, PhotoLedger, TrackStore,
};
use phototag_types::{PhotoFilter, PhotoRecord, SortKey};
use std::path::PathBuf;

fn utc(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, 0).unwrap()
}

fn photo(name: &str, capture: Option<DateTime<Utc>>) -> PhotoRecord {
    let mut record = PhotoRecord::new(
        name.to_string(),
        PathBuf::from(format!("/photos/{name}")),
        utc(7, 0),
    );
    record.exif_capture_time = capture;
    record
}

fn track(name: &str, samples: &[(u32, u32, f64, f64)]) -> ParsedTrack {
    ParsedTrack {
        name: name.to_string(),
        points: samples
            .iter()
            .map(|&(hour, minute, latitude, longitude)| ParsedPoint {
                latitude,
                longitude,
                elevation: Some(100.0),
                time: Some(utc(hour, minute)),
            })
            .collect(),
    }
}

/// The full reconciliation scenario: embedded GPS survives, unmatched
/// photos adopt track coordinates, manual override wins, deletion falls
/// back, and the whole pass is idempotent.
#[test]
fn test_reconciliation_scenario() {
    let mut with_gps = photo("embedded.jpg", Some(utc(6, 0)));
    with_gps.exif_latitude = 48.8566;
    with_gps.exif_longitude = 2.3522;
    with_gps.resolve_final();

    let records = vec![
        with_gps,
        photo("one.jpg", Some(utc(10, 2))),
        photo("two.jpg", Some(utc(10, 5))),
    ];
    let mut ledger = PhotoLedger::from_records(records, SortKey::Time);

    let mut tracks = TrackStore::new();
    tracks.load_track(
        track("ride", &[(10, 0, 45.0, -75.0), (10, 3, 45.1, -75.1), (10, 5, 45.2, -75.2)]),
        "ride.gpx",
    );

    let report = ledger.match_all_with_tracks(&tracks);
    assert_eq!(report.matched, 2);
    assert_eq!(report.cleared, 1);

    // Embedded GPS photo is outside the track span and keeps its EXIF fix.
    assert_eq!(ledger.photo(0).unwrap().final_latitude, 48.8566);
    assert_eq!(ledger.photo(1).unwrap().final_latitude, 45.1);
    assert_eq!(ledger.photo(2).unwrap().final_latitude, 45.2);

    // Re-running with unchanged inputs changes nothing.
    let again = ledger.match_all_with_tracks(&tracks);
    assert_eq!(report, again);

    // Manual override on one photo only affects that photo.
    ledger.set_manual_location(1, -33.8688, 151.2093, Some(30.0)).unwrap();
    assert_eq!(ledger.photo(1).unwrap().final_latitude, -33.8688);
    assert_eq!(ledger.photo(2).unwrap().final_latitude, 45.2);

    // Deleting the override falls back to the track match.
    ledger.delete_manual_location(1).unwrap();
    assert_eq!(ledger.photo(1).unwrap().final_latitude, 45.1);
}

/// Main offset shifts every track by exactly the offset; previously matching
/// targets stop matching.
#[test]
fn test_main_offset_shift_scenario() {
    let mut tracks = TrackStore::new();
    tracks.load_track(track("out", &[(10, 0, 1.0, 2.0)]), "out.gpx");
    tracks.load_track(track("back", &[(15, 0, 3.0, 4.0)]), "back.gpx");

    assert!(tracks.find_closest_point(utc(10, 0), 5).is_some());
    assert!(tracks.find_closest_point(utc(15, 0), 5).is_some());

    tracks.set_main_offset(parse_offset("+01:00:00"));

    assert!(tracks.find_closest_point(utc(10, 0), 5).is_none());
    assert!(tracks.find_closest_point(utc(15, 0), 5).is_none());
    assert_eq!(tracks.find_closest_point(utc(11, 0), 5).unwrap().latitude, 1.0);
    assert_eq!(tracks.find_closest_point(utc(16, 0), 5).unwrap().latitude, 3.0);

    // A ledger matched before the shift converges to the same state as one
    // matched fresh after it.
    let mut ledger = PhotoLedger::from_records(vec![photo("a.jpg", Some(utc(11, 0)))], SortKey::Time);
    ledger.match_all_with_tracks(&tracks);
    assert_eq!(ledger.photo(0).unwrap().final_latitude, 1.0);
}

#[test]
fn test_track_identity_by_name() {
    let mut tracks = TrackStore::new();
    let first = tracks.load_track(track("ride", &[(10, 0, 1.0, 2.0)]), "a.gpx");
    let second = tracks.load_track(track("ride", &[(11, 0, 3.0, 4.0)]), "b.gpx");

    assert!(first.is_loaded());
    assert!(!second.is_loaded());
    assert_eq!(tracks.track_count(), 1);
}

#[test]
fn test_filename_generation_and_dedup_through_public_api() {
    // Two photos captured in the same second collide under a coarse format.
    let records = vec![
        photo("b.jpg", Some(utc(10, 0))),
        photo("a.jpg", Some(utc(10, 0))),
        photo("c.jpg", Some(utc(11, 0))),
    ];
    let mut ledger = PhotoLedger::from_records(records, SortKey::Name);
    ledger.apply_filename_format("%Y%m%d_%H%M%S");

    let names: Vec<String> = ledger
        .photos(PhotoFilter::All)
        .iter()
        .map(|p| p.new_name.clone())
        .collect();
    assert_eq!(
        names,
        vec![
            "20240601_100000.jpg",
            "20240601_100000a.jpg",
            "20240601_110000.jpg",
        ]
    );

    // Generation from an invalid pattern keeps the original filenames.
    ledger.apply_filename_format("%Q!!");
    let names: Vec<String> = ledger
        .photos(PhotoFilter::All)
        .iter()
        .map(|p| p.new_name.clone())
        .collect();
    assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
}

#[test]
fn test_offset_round_trip_property() {
    for seconds in [-359999, -4500, -1, 0, 1, 59, 3600, 9000, 123456] {
        assert_eq!(parse_offset(&format_offset(seconds)), seconds);
    }
    assert_eq!(format_offset(9000), "+02:30:00");
    assert_eq!(parse_offset("-01:15:00"), -4500);
}
