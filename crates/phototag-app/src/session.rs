//! Session state: the explicit owner of ledger, track store, and catalog.
//!
//! All combined operations live here so that every mutation leaves the
//! cascade invariant restored before it returns. There are no process-wide
//! singletons; callers own a `Session` and pass it by reference.

use std::path::Path;

use phototag_infra::{parse_gpx, parse_positions};
use phototag_store::{LoadOutcome, MatchReport, PhotoLedger, PositionCatalog, TrackStore};
use phototag_types::{PhotoRecord, Result};

use crate::config::AppConfig;
use crate::scan;

#[derive(Debug, Default)]
pub struct Session {
    pub ledger: PhotoLedger,
    pub tracks: TrackStore,
    pub positions: PositionCatalog,
    pub config: AppConfig,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            ledger: PhotoLedger::new(),
            tracks: TrackStore::new(),
            positions: PositionCatalog::new(),
            config,
        }
    }

    /// Scan a folder into a fresh ledger and, when tracks are loaded, run a
    /// full matching pass before returning.
    pub fn scan_folder(&mut self, folder: &Path, recursive: bool) -> Result<usize> {
        let records = scan::scan_folder(folder, recursive, &self.config.filename_format)?;
        let count = records.len();
        self.ledger = PhotoLedger::from_records(records, self.config.sort_by);
        self.config.folder_path = folder.display().to_string();
        if self.tracks.has_data() {
            self.ledger.match_all_with_tracks(&self.tracks);
        }
        Ok(count)
    }

    /// Parse and load one track file, then re-match the whole ledger.
    /// A duplicate track name is a no-op apart from the returned summary.
    pub fn load_track(&mut self, content: &str, source_name: &str) -> Result<LoadOutcome> {
        let parsed = parse_gpx(content, source_name)?;
        let outcome = self.tracks.load_track(parsed, source_name);
        if outcome.is_loaded() {
            self.ledger.match_all_with_tracks(&self.tracks);
        }
        Ok(outcome)
    }

    pub fn remove_tracks(&mut self, indices: &[usize]) -> Result<MatchReport> {
        self.tracks.remove_tracks(indices)?;
        Ok(self.ledger.match_all_with_tracks(&self.tracks))
    }

    pub fn clear_tracks(&mut self) -> MatchReport {
        self.tracks.clear();
        self.ledger.match_all_with_tracks(&self.tracks)
    }

    pub fn set_main_offset(&mut self, seconds: i64) -> MatchReport {
        self.tracks.set_main_offset(seconds);
        self.ledger.match_all_with_tracks(&self.tracks)
    }

    pub fn set_track_offset(&mut self, track_index: usize, seconds: i64) -> Result<MatchReport> {
        self.tracks.set_track_offset(track_index, seconds)?;
        Ok(self.ledger.match_all_with_tracks(&self.tracks))
    }

    /// Re-sort the ledger, then regenerate and re-deduplicate destination
    /// names so collision letters follow the new ordering.
    pub fn set_sort_order(&mut self, sort_key: phototag_types::SortKey) {
        self.config.sort_by = sort_key;
        self.ledger.set_sort_order(sort_key);
        self.ledger.apply_filename_format(&self.config.filename_format);
    }

    /// Apply a filename format (persisting it as the configured one).
    pub fn apply_filename_format(&mut self, pattern: &str) {
        self.config.filename_format = pattern.to_string();
        self.ledger.apply_filename_format(pattern);
    }

    pub fn load_positions(&mut self, yaml_text: &str, source_name: &str) -> Result<usize> {
        let records = parse_positions(yaml_text, source_name)?;
        Ok(self.positions.add_records(records))
    }

    pub fn remove_positions_by_file(&mut self, source_name: &str) -> usize {
        self.positions.remove_by_source_file(source_name)
    }

    /// Lazy single-photo match used by the detail view: fills `gpx_*` for a
    /// photo that has none yet, without touching the rest of the ledger.
    pub fn match_photo(&mut self, index: usize) -> Result<Option<&PhotoRecord>> {
        if !self.tracks.has_data() {
            return Ok(None);
        }
        let capture_time = self.ledger.photo(index)?.best_time();
        let hit = self
            .tracks
            .find_closest_point(capture_time, phototag_store::MATCH_WINDOW_MINUTES)
            .map(|point| (point.latitude, point.longitude, point.elevation));
        if let Some((latitude, longitude, elevation)) = hit {
            self.ledger
                .update_gpx_location(index, latitude, longitude, elevation)?;
            return Ok(Some(self.ledger.photo(index)?));
        }
        Ok(None)
    }
}
