//! Photo export: copy, metadata rewrite, file-time adjustment

use std::path::{Path, PathBuf};

use phototag_infra::metadata_writer::{write_metadata, ExportFields};
use phototag_infra::file_times;
use phototag_store::PhotoLedger;
use phototag_types::{PhotoFilter, PhotoRecord, Result};
use serde::Serialize;

/// Which photos to export.
pub type ExportSelection = PhotoFilter;

/// One failed record in a batch export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportFailure {
    pub filename: String,
    pub reason: String,
}

/// Partial-success report for a batch export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    pub exported: usize,
    pub failed: Vec<ExportFailure>,
}

/// Export the selected photos into `destination`.
///
/// The destination folder must be creatable (structural error otherwise);
/// failures on individual photos are recorded and the batch continues.
pub fn export_photos(
    ledger: &PhotoLedger,
    destination: &Path,
    selection: ExportSelection,
) -> Result<ExportReport> {
    std::fs::create_dir_all(destination)?;

    let photos = ledger.photos(selection);
    let total = photos.len();
    let mut report = ExportReport::default();

    for (position, record) in photos.into_iter().enumerate() {
        match export_photo(record, destination) {
            Ok(path) => {
                report.exported += 1;
                tracing::info!(
                    target_path = %path.display(),
                    progress = format!("{}/{}", position + 1, total),
                    "exported photo"
                );
            }
            Err(e) => {
                tracing::warn!(filename = %record.filename, error = %e, "export failed");
                report.failed.push(ExportFailure {
                    filename: record.filename.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    Ok(report)
}

/// Export a single photo: copy under its generated name, rewrite embedded
/// metadata from the resolved field set, then align the file times.
pub fn export_photo(record: &PhotoRecord, destination: &Path) -> Result<PathBuf> {
    let target_name = if record.new_name.is_empty() {
        record.filename.as_str()
    } else {
        record.new_name.as_str()
    };
    let target = destination.join(target_name);

    std::fs::copy(&record.full_path, &target)?;

    let fields = ExportFields::from_record(record);
    write_metadata(&target, &fields)?;

    // File-time adjustment is cosmetic; a failure here does not undo the export.
    if let Some(capture_time) = fields.capture_time {
        if let Err(e) = file_times::set_file_times(&target, capture_time) {
            tracing::warn!(target_path = %target.display(), error = %e, "could not set file times");
        }
    }

    Ok(target)
}
