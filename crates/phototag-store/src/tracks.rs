//! Track store: loaded GPS tracks, time offsets, and nearest-time lookup

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use phototag_types::{Error, Result, TrackBounds, TrackPoint, TrackRecord};

/// One sample as produced by a track file parser, before the store assigns
/// offsets and track indices.
#[derive(Debug, Clone)]
pub struct ParsedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub time: Option<DateTime<Utc>>,
}

/// A parsed track file, not yet admitted into the store.
#[derive(Debug, Clone)]
pub struct ParsedTrack {
    pub name: String,
    pub points: Vec<ParsedPoint>,
}

/// Result of a load attempt. A duplicate name is not an error: the parsed
/// summary is returned so callers can report it, but nothing is stored.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(TrackRecord),
    DuplicateName(TrackRecord),
}

impl LoadOutcome {
    pub fn record(&self) -> &TrackRecord {
        match self {
            Self::Loaded(record) | Self::DuplicateName(record) => record,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Holds every loaded track plus a merged, time-sorted sample index.
///
/// Samples keep their original timestamps; the effective `time` used for
/// matching is `original_time + offset_seconds` of the owning track.
#[derive(Debug, Default)]
pub struct TrackStore {
    tracks: Vec<TrackRecord>,
    points: Vec<TrackPoint>,
    main_offset_seconds: i64,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a parsed track. A track whose name matches an existing one is
    /// silently discarded. New tracks inherit the store-wide main offset.
    pub fn load_track(&mut self, parsed: ParsedTrack, source_file: &str) -> LoadOutcome {
        let bounds =
            TrackBounds::from_coordinates(parsed.points.iter().map(|p| (p.latitude, p.longitude)));
        let record = TrackRecord {
            name: parsed.name.clone(),
            source_file: source_file.to_string(),
            offset_seconds: self.main_offset_seconds,
            bounds,
            point_count: parsed.points.len(),
        };

        if self.tracks.iter().any(|t| t.name == parsed.name) {
            tracing::debug!(name = %parsed.name, "track name already loaded, discarding");
            return LoadOutcome::DuplicateName(record);
        }

        let track_index = self.tracks.len();
        let offset = Duration::seconds(self.main_offset_seconds);
        for point in &parsed.points {
            // Samples without a timestamp cannot participate in matching.
            let Some(original_time) = point.time else {
                continue;
            };
            self.points.push(TrackPoint {
                latitude: point.latitude,
                longitude: point.longitude,
                elevation: point.elevation,
                original_time,
                time: original_time + offset,
                track_index,
            });
        }
        self.tracks.push(record.clone());
        self.sort_points();

        LoadOutcome::Loaded(record)
    }

    /// Set the store-wide default offset and apply it to every loaded track,
    /// overwriting any per-track override.
    pub fn set_main_offset(&mut self, seconds: i64) {
        self.main_offset_seconds = seconds;
        for track in &mut self.tracks {
            track.offset_seconds = seconds;
        }
        for point in &mut self.points {
            point.apply_offset(seconds);
        }
        self.sort_points();
    }

    /// Set the offset of exactly one track, leaving the others untouched.
    pub fn set_track_offset(&mut self, track_index: usize, seconds: i64) -> Result<()> {
        let track = self
            .tracks
            .get_mut(track_index)
            .ok_or_else(|| Error::NotFound(format!("track index {track_index} out of range")))?;
        track.offset_seconds = seconds;
        for point in &mut self.points {
            if point.track_index == track_index {
                point.apply_offset(seconds);
            }
        }
        self.sort_points();
        Ok(())
    }

    pub fn main_offset(&self) -> i64 {
        self.main_offset_seconds
    }

    /// Closest sample by effective time within `±window_minutes`, or `None`.
    /// Ties break toward the earliest sample in the merged, time-sorted order.
    pub fn find_closest_point(
        &self,
        target: DateTime<Utc>,
        window_minutes: i64,
    ) -> Option<&TrackPoint> {
        let window = Duration::minutes(window_minutes);
        let earliest = target - window;
        let latest = target + window;

        self.points
            .iter()
            .filter(|point| point.time >= earliest && point.time <= latest)
            .min_by_key(|point| (point.time - target).abs())
    }

    /// Same lookup for a naive instant, treated as UTC.
    pub fn find_closest_point_naive(
        &self,
        target: NaiveDateTime,
        window_minutes: i64,
    ) -> Option<&TrackPoint> {
        self.find_closest_point(target.and_utc(), window_minutes)
    }

    /// Remove the given tracks (by index into the current list) together with
    /// their samples. Remaining samples keep their order and times.
    pub fn remove_tracks(&mut self, indices: &[usize]) -> Result<()> {
        for &index in indices {
            if index >= self.tracks.len() {
                return Err(Error::NotFound(format!("track index {index} out of range")));
            }
        }

        let keep: Vec<bool> = (0..self.tracks.len())
            .map(|i| !indices.contains(&i))
            .collect();

        // Surviving tracks shift down; remap each point's owner index.
        let mut remapped = vec![usize::MAX; self.tracks.len()];
        let mut next = 0;
        for (old_index, kept) in keep.iter().enumerate() {
            if *kept {
                remapped[old_index] = next;
                next += 1;
            }
        }

        let mut old_index = 0;
        self.tracks.retain(|_| {
            let kept = keep[old_index];
            old_index += 1;
            kept
        });
        self.points.retain_mut(|point| {
            if keep[point.track_index] {
                point.track_index = remapped[point.track_index];
                true
            } else {
                false
            }
        });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.points.clear();
    }

    pub fn has_data(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    fn sort_points(&mut self) {
        // Stable: equal effective times keep their load order, which is what
        // the tie-break in find_closest_point relies on.
        self.points.sort_by_key(|point| point.time);
    }
}

/// Parse a `±HH:MM:SS` offset into signed seconds. Unparseable input yields
/// zero offset rather than an error, matching the tolerant behavior users
/// expect from the offset entry field.
pub fn parse_offset(text: &str) -> i64 {
    let trimmed = text.trim();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let parts: Vec<&str> = rest.split(':').collect();
    if parts.len() != 3 {
        return 0;
    }

    match (
        parts[0].parse::<i64>(),
        parts[1].parse::<i64>(),
        parts[2].parse::<i64>(),
    ) {
        (Ok(hours), Ok(minutes), Ok(seconds))
            if hours >= 0 && (0..60).contains(&minutes) && (0..60).contains(&seconds) =>
        {
            sign * (hours * 3600 + minutes * 60 + seconds)
        }
        _ => 0,
    }
}

/// Canonical `±HH:MM:SS` representation; round-trips through [`parse_offset`].
pub fn format_offset(seconds: i64) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        abs / 3600,
        (abs % 3600) / 60,
        abs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, second).unwrap()
    }

    fn timed_point(hour: u32, minute: u32, latitude: f64) -> ParsedPoint {
        ParsedPoint {
            latitude,
            longitude: -75.0,
            elevation: Some(120.0),
            time: Some(utc(hour, minute, 0)),
        }
    }

    fn track(name: &str, points: Vec<ParsedPoint>) -> ParsedTrack {
        ParsedTrack {
            name: name.to_string(),
            points,
        }
    }

    #[test]
    fn test_load_track_and_bounds() {
        let mut store = TrackStore::new();
        let outcome = store.load_track(
            track(
                "morning",
                vec![timed_point(10, 0, 45.0), timed_point(10, 5, 46.0)],
            ),
            "morning.gpx",
        );

        assert!(outcome.is_loaded());
        assert_eq!(store.track_count(), 1);
        assert_eq!(store.point_count(), 2);
        let bounds = outcome.record().bounds.unwrap();
        assert_eq!(bounds.north, 46.0);
        assert_eq!(bounds.south, 45.0);
    }

    #[test]
    fn test_duplicate_name_is_discarded() {
        let mut store = TrackStore::new();
        store.load_track(track("ride", vec![timed_point(10, 0, 45.0)]), "a.gpx");
        let outcome = store.load_track(track("ride", vec![timed_point(11, 0, 46.0)]), "b.gpx");

        assert!(!outcome.is_loaded());
        assert_eq!(outcome.record().name, "ride");
        assert_eq!(store.track_count(), 1);
        assert_eq!(store.point_count(), 1);
    }

    #[test]
    fn test_untimed_points_are_not_indexed() {
        let mut store = TrackStore::new();
        let mut points = vec![timed_point(10, 0, 45.0)];
        points.push(ParsedPoint {
            latitude: 47.0,
            longitude: -73.0,
            elevation: None,
            time: None,
        });
        let outcome = store.load_track(track("partial", points), "partial.gpx");

        // The untimed sample still counts toward the summary and bounds.
        assert_eq!(outcome.record().point_count, 2);
        assert_eq!(outcome.record().bounds.unwrap().north, 47.0);
        assert_eq!(store.point_count(), 1);
    }

    #[test]
    fn test_find_closest_point() {
        let mut store = TrackStore::new();
        store.load_track(
            track(
                "ride",
                vec![
                    timed_point(9, 57, 1.0), // T-3min
                    timed_point(10, 0, 2.0), // T
                    timed_point(10, 4, 3.0), // T+4min
                ],
            ),
            "ride.gpx",
        );

        // Target T+1min: the sample at T is closest.
        let hit = store.find_closest_point(utc(10, 1, 0), 5).unwrap();
        assert_eq!(hit.latitude, 2.0);

        // Outside the window on both sides.
        assert!(store.find_closest_point(utc(11, 0, 0), 5).is_none());
        assert!(store.find_closest_point(utc(9, 30, 0), 5).is_none());
    }

    #[test]
    fn test_find_closest_point_tie_breaks_to_earliest() {
        let mut store = TrackStore::new();
        store.load_track(
            track(
                "ride",
                vec![timed_point(9, 58, 1.0), timed_point(10, 2, 2.0)],
            ),
            "ride.gpx",
        );

        // Equidistant by two minutes: the earlier sample wins.
        let hit = store.find_closest_point(utc(10, 0, 0), 5).unwrap();
        assert_eq!(hit.latitude, 1.0);
    }

    #[test]
    fn test_find_closest_point_empty_store() {
        let store = TrackStore::new();
        assert!(store.find_closest_point(utc(10, 0, 0), 5).is_none());
    }

    #[test]
    fn test_naive_target_treated_as_utc() {
        let mut store = TrackStore::new();
        store.load_track(track("ride", vec![timed_point(10, 0, 1.0)]), "ride.gpx");

        let naive = utc(10, 1, 0).naive_utc();
        assert!(store.find_closest_point_naive(naive, 5).is_some());
    }

    #[test]
    fn test_main_offset_shifts_every_track() {
        let mut store = TrackStore::new();
        store.load_track(track("out", vec![timed_point(10, 0, 1.0)]), "out.gpx");
        store.load_track(track("back", vec![timed_point(14, 0, 2.0)]), "back.gpx");

        store.set_main_offset(3600);

        for record in store.tracks() {
            assert_eq!(record.offset_seconds, 3600);
        }
        // A target at the unshifted time no longer matches...
        assert!(store.find_closest_point(utc(10, 0, 0), 5).is_none());
        // ...while the shifted instant does.
        let hit = store.find_closest_point(utc(11, 0, 0), 5).unwrap();
        assert_eq!(hit.latitude, 1.0);
        assert_eq!(hit.original_time, utc(10, 0, 0));
    }

    #[test]
    fn test_main_offset_overwrites_track_offset() {
        let mut store = TrackStore::new();
        store.load_track(track("out", vec![timed_point(10, 0, 1.0)]), "out.gpx");
        store.set_track_offset(0, 7200).unwrap();
        assert_eq!(store.tracks()[0].offset_seconds, 7200);

        store.set_main_offset(60);
        assert_eq!(store.tracks()[0].offset_seconds, 60);
        assert!(store.find_closest_point(utc(10, 1, 0), 5).is_some());
    }

    #[test]
    fn test_track_offset_leaves_other_tracks_alone() {
        let mut store = TrackStore::new();
        store.load_track(track("out", vec![timed_point(10, 0, 1.0)]), "out.gpx");
        store.load_track(track("back", vec![timed_point(14, 0, 2.0)]), "back.gpx");

        store.set_track_offset(1, 1800).unwrap();

        assert_eq!(store.tracks()[0].offset_seconds, 0);
        assert_eq!(store.tracks()[1].offset_seconds, 1800);
        assert!(store.find_closest_point(utc(10, 0, 0), 5).is_some());
        assert_eq!(
            store.find_closest_point(utc(14, 30, 0), 5).unwrap().latitude,
            2.0
        );
    }

    #[test]
    fn test_track_offset_out_of_range() {
        let mut store = TrackStore::new();
        assert!(matches!(
            store.set_track_offset(0, 60),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_new_track_inherits_main_offset() {
        let mut store = TrackStore::new();
        store.set_main_offset(900);
        let outcome = store.load_track(track("late", vec![timed_point(10, 0, 1.0)]), "late.gpx");

        assert_eq!(outcome.record().offset_seconds, 900);
        assert!(store.find_closest_point(utc(10, 15, 0), 5).is_some());
    }

    #[test]
    fn test_remove_tracks_remaps_indices() {
        let mut store = TrackStore::new();
        store.load_track(track("a", vec![timed_point(10, 0, 1.0)]), "a.gpx");
        store.load_track(track("b", vec![timed_point(11, 0, 2.0)]), "b.gpx");
        store.load_track(track("c", vec![timed_point(12, 0, 3.0)]), "c.gpx");

        store.remove_tracks(&[1]).unwrap();

        assert_eq!(store.track_count(), 2);
        assert_eq!(store.point_count(), 2);
        assert!(store.find_closest_point(utc(11, 0, 0), 5).is_none());

        // Offsetting the remapped second track still moves the right samples.
        store.set_track_offset(1, 3600).unwrap();
        assert_eq!(
            store.find_closest_point(utc(13, 0, 0), 5).unwrap().latitude,
            3.0
        );
    }

    #[test]
    fn test_remove_tracks_invalid_index() {
        let mut store = TrackStore::new();
        store.load_track(track("a", vec![timed_point(10, 0, 1.0)]), "a.gpx");
        assert!(store.remove_tracks(&[3]).is_err());
        assert_eq!(store.track_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = TrackStore::new();
        store.load_track(track("a", vec![timed_point(10, 0, 1.0)]), "a.gpx");
        store.clear();
        assert!(!store.has_data());
        assert_eq!(store.track_count(), 0);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+02:30:00"), 2 * 3600 + 30 * 60);
        assert_eq!(parse_offset("-01:15:00"), -(3600 + 15 * 60));
        assert_eq!(parse_offset("00:00:00"), 0);
        assert_eq!(parse_offset(" +00:00:42 "), 42);
    }

    #[test]
    fn test_parse_offset_tolerates_garbage() {
        assert_eq!(parse_offset(""), 0);
        assert_eq!(parse_offset("not an offset"), 0);
        assert_eq!(parse_offset("1:2"), 0);
        assert_eq!(parse_offset("00:99:00"), 0);
    }

    #[test]
    fn test_offset_round_trip() {
        assert_eq!(format_offset(9000), "+02:30:00");
        assert_eq!(format_offset(-4500), "-01:15:00");
        assert_eq!(format_offset(0), "+00:00:00");

        for seconds in [0, 1, 59, 60, 3599, 3600, 9000, -4500, 86400 + 61, -359999] {
            assert_eq!(parse_offset(&format_offset(seconds)), seconds);
        }
    }
}
