//! Photo ledger: the record collection, the final-coordinate cascade, and
//! filename derivation with collision resolution

use std::collections::HashMap;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use phototag_types::{
    Error, PhotoFilter, PhotoMetadataUpdate, PhotoRecord, Result, SortKey, NO_COORDINATE,
};
use serde::Serialize;

use crate::tracks::TrackStore;

/// Matching window on either side of a photo's capture time.
pub const MATCH_WINDOW_MINUTES: i64 = 5;

/// Counts from a bulk track-matching pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// Photos that received track coordinates
    pub matched: usize,
    /// Photos whose previous track coordinates were cleared (no sample in window)
    pub cleared: usize,
}

/// Ordered collection of photo records.
///
/// Records are addressed by ordinal index; `revision` changes whenever the
/// ordering does, so position-keyed caches know to invalidate.
#[derive(Debug, Default)]
pub struct PhotoLedger {
    photos: Vec<PhotoRecord>,
    sort_key: SortKey,
    revision: u64,
}

impl PhotoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from scanned records, applying the sort order and
    /// resolving name collisions.
    pub fn from_records(records: Vec<PhotoRecord>, sort_key: SortKey) -> Self {
        let mut ledger = Self {
            photos: records,
            sort_key,
            revision: 0,
        };
        ledger.apply_sort();
        ledger.deduplicate_names();
        ledger
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Bumped on every reordering; thumbnail caches key off this.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn photos(&self, filter: PhotoFilter) -> Vec<&PhotoRecord> {
        self.photos.iter().filter(|r| filter.matches(r)).collect()
    }

    pub fn photo(&self, index: usize) -> Result<&PhotoRecord> {
        self.photos
            .get(index)
            .ok_or_else(|| Error::NotFound(format!("photo index {index} out of range")))
    }

    fn photo_mut(&mut self, index: usize) -> Result<&mut PhotoRecord> {
        self.photos
            .get_mut(index)
            .ok_or_else(|| Error::NotFound(format!("photo index {index} out of range")))
    }

    /// Set the manual position; manual wins the cascade unconditionally.
    pub fn set_manual_location(
        &mut self,
        index: usize,
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
    ) -> Result<()> {
        let record = self.photo_mut(index)?;
        record.manual_latitude = latitude;
        record.manual_longitude = longitude;
        record.manual_altitude = altitude;
        record.resolve_final();
        Ok(())
    }

    /// Clear the manual position; the cascade falls through to track
    /// coordinates if present, else the embedded ones.
    pub fn delete_manual_location(&mut self, index: usize) -> Result<()> {
        let record = self.photo_mut(index)?;
        record.manual_latitude = NO_COORDINATE;
        record.manual_longitude = NO_COORDINATE;
        record.manual_altitude = None;
        record.resolve_final();
        Ok(())
    }

    /// Set track-derived coordinates. Never overrides a manual position:
    /// the cascade keeps manual on top.
    pub fn update_gpx_location(
        &mut self,
        index: usize,
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
    ) -> Result<()> {
        let record = self.photo_mut(index)?;
        record.gpx_latitude = latitude;
        record.gpx_longitude = longitude;
        record.gpx_altitude = altitude;
        record.resolve_final();
        Ok(())
    }

    /// Match every photo against the track store within the fixed window.
    ///
    /// A hit writes the sample's coordinates into `gpx_*`; a miss clears
    /// `gpx_*`. Either way the cascade is re-derived, so repeated calls with
    /// unchanged tracks and offsets leave the ledger unchanged.
    pub fn match_all_with_tracks(&mut self, tracks: &TrackStore) -> MatchReport {
        let mut report = MatchReport::default();
        if self.photos.is_empty() || !tracks.has_data() {
            return report;
        }

        for record in &mut self.photos {
            let capture_time = record.best_time();
            match tracks.find_closest_point(capture_time, MATCH_WINDOW_MINUTES) {
                Some(point) => {
                    record.gpx_latitude = point.latitude;
                    record.gpx_longitude = point.longitude;
                    record.gpx_altitude = point.elevation;
                    report.matched += 1;
                }
                None => {
                    record.gpx_latitude = NO_COORDINATE;
                    record.gpx_longitude = NO_COORDINATE;
                    record.gpx_altitude = None;
                    report.cleared += 1;
                }
            }
            record.resolve_final();
        }

        tracing::debug!(
            matched = report.matched,
            cleared = report.cleared,
            "track matching pass complete"
        );
        report
    }

    pub fn update_tag(&mut self, index: usize, tagged: bool) -> Result<()> {
        self.photo_mut(index)?.tagged = tagged;
        Ok(())
    }

    /// Tag or untag a set of photos. Indices are validated up front so the
    /// operation either applies completely or not at all.
    pub fn bulk_tag(&mut self, indices: &[usize], tagged: bool) -> Result<()> {
        for &index in indices {
            if index >= self.photos.len() {
                return Err(Error::NotFound(format!("photo index {index} out of range")));
            }
        }
        for &index in indices {
            self.photos[index].tagged = tagged;
        }
        Ok(())
    }

    /// Apply the user-editable overlay fields present in the update.
    pub fn update_metadata(&mut self, index: usize, update: PhotoMetadataUpdate) -> Result<()> {
        let record = self.photo_mut(index)?;
        if let Some(new_time) = update.new_time {
            record.new_time = Some(new_time);
        }
        if let Some(title) = update.new_title {
            record.new_title = title;
        }
        if let Some(keywords) = update.new_keywords {
            record.new_keywords = keywords;
        }
        if let Some(city) = update.new_city {
            record.new_city = city;
        }
        if let Some(sublocation) = update.new_sublocation {
            record.new_sublocation = sublocation;
        }
        if let Some(state) = update.new_state {
            record.new_state = state;
        }
        if let Some(country) = update.new_country {
            record.new_country = country;
        }
        if let Some(datestamp) = update.new_gps_datestamp {
            record.new_gps_datestamp = datestamp;
        }
        if let Some(timestamp) = update.new_gps_timestamp {
            record.new_gps_timestamp = timestamp;
        }
        if let Some(offset_time) = update.new_offset_time {
            record.new_offset_time = offset_time;
        }
        Ok(())
    }

    pub fn apply_keywords_all(&mut self, keywords: &str) {
        for record in &mut self.photos {
            record.new_keywords = keywords.to_string();
        }
    }

    pub fn clear_keywords_all(&mut self) {
        for record in &mut self.photos {
            record.new_keywords.clear();
        }
    }

    /// Regenerate every destination filename from the format and resolve
    /// collisions.
    pub fn apply_filename_format(&mut self, pattern: &str) {
        for record in &mut self.photos {
            record.new_name = generate_filename(record, pattern);
        }
        self.deduplicate_names();
    }

    /// Case-insensitive collision resolution over the generated names.
    ///
    /// Within each group of records sharing a lowercase-normalized name the
    /// first (in current order) keeps its name; each later one gets a
    /// lowercase letter appended before the extension: a, b, c, ... and
    /// bijectively on (aa, ab, ...) past 'z'. Deterministic for a fixed
    /// ordering; callers re-run it after any bulk rename or re-sort.
    pub fn deduplicate_names(&mut self) {
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        for record in &mut self.photos {
            if record.new_name.is_empty() {
                continue;
            }
            let key = record.new_name.to_lowercase();
            let seen = occurrences.entry(key).or_insert(0);
            if *seen > 0 {
                record.new_name = append_before_extension(&record.new_name, &letter_suffix(*seen - 1));
            }
            *seen += 1;
        }
    }

    /// Change the sort order and re-sort. Downstream consumers address
    /// records by ordinal index, so the revision counter is bumped.
    /// Collision letters depend on ordering, so dedup runs again.
    pub fn set_sort_order(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
        self.apply_sort();
        self.deduplicate_names();
    }

    fn apply_sort(&mut self) {
        match self.sort_key {
            SortKey::Name => self.photos.sort_by(|a, b| a.filename.cmp(&b.filename)),
            SortKey::Time => self
                .photos
                .sort_by_key(|record| (record.best_time(), record.creation_time)),
        }
        self.revision += 1;
    }
}

/// Format a record's resolved timestamp (capture time if present, else
/// creation time) with a strftime-style pattern, keeping the original file
/// extension. An invalid pattern falls back to the original filename.
pub fn generate_filename(record: &PhotoRecord, pattern: &str) -> String {
    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return record.filename.clone();
    }

    let stem = record
        .best_time()
        .format_with_items(items.into_iter())
        .to_string();

    match Path::new(&record.filename)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(extension) => format!("{stem}.{extension}"),
        None => stem,
    }
}

/// Suffix for the n-th duplicate (0-based): a..z, then aa, ab, ...
fn letter_suffix(index: usize) -> String {
    let mut suffix = String::new();
    let mut n = index;
    loop {
        suffix.insert(0, (b'a' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    suffix
}

fn append_before_extension(name: &str, suffix: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{}{}", &name[..dot], suffix, &name[dot..]),
        _ => format!("{name}{suffix}"),
    }
}
