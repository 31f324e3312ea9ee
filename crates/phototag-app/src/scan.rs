//! Folder scanning and photo record construction

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use phototag_infra::PhotoMetadata;
use phototag_store::generate_filename;
use phototag_types::{Error, PhotoRecord, Result, NO_COORDINATE};
use walkdir::WalkDir;

/// Extensions admitted by the scanner.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "heic"];

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Scan a folder for photos and build one record per image file.
///
/// A missing folder is an error; anything that goes wrong while extracting
/// metadata from an individual file only degrades that record to defaults.
pub fn scan_folder(
    folder: &Path,
    recursive: bool,
    filename_format: &str,
) -> Result<Vec<PhotoRecord>> {
    if !folder.is_dir() {
        return Err(Error::NotFound(format!(
            "folder does not exist: {}",
            folder.display()
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut records = Vec::new();
    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_image(path) {
            continue;
        }
        records.push(build_record(path, filename_format));
    }

    tracing::info!(
        folder = %folder.display(),
        recursive,
        count = records.len(),
        "scanned photo folder"
    );
    Ok(records)
}

fn build_record(path: &Path, filename_format: &str) -> PhotoRecord {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let mut record = PhotoRecord::new(filename, PathBuf::from(path), creation_time(path));

    if let Some(metadata) = PhotoMetadata::from_file(path) {
        record.exif_capture_time = metadata.captured_at;
        if let Some(latitude) = metadata.latitude {
            record.exif_latitude = latitude;
        }
        if let Some(longitude) = metadata.longitude {
            record.exif_longitude = longitude;
        }
        record.exif_altitude = metadata.altitude;
        record.exif_title = metadata.title.unwrap_or_default();
        record.exif_keywords = metadata.keywords.unwrap_or_default();
        record.exif_gps_datestamp = metadata.gps_datestamp.unwrap_or_default();
        record.exif_gps_timestamp = metadata.gps_timestamp.unwrap_or_default();
        record.exif_offset_time = metadata.offset_time.unwrap_or_default();
    }

    // A lone latitude or longitude is useless; treat it as absent.
    if record.exif_latitude == NO_COORDINATE || record.exif_longitude == NO_COORDINATE {
        record.exif_latitude = NO_COORDINATE;
        record.exif_longitude = NO_COORDINATE;
    }

    record.resolve_final();
    record.new_name = generate_filename(&record, filename_format);
    record
}

/// Filesystem creation time, falling back to the modification time on
/// filesystems that do not expose a birth time.
fn creation_time(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.created().or_else(|_| m.modified()).ok())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_folder_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            scan_folder(&missing, false, "%Y%m%d"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_scan_skips_non_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"not really a jpeg").unwrap();
        std::fs::write(dir.path().join("PHOTO2.JPG"), b"also not a jpeg").unwrap();

        let records = scan_folder(dir.path(), false, "%Y%m%d").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_scan_recursion() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("top.jpg"), b"x").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("deep.jpg"), b"x").unwrap();

        assert_eq!(scan_folder(dir.path(), false, "%Y%m%d").unwrap().len(), 1);
        assert_eq!(scan_folder(dir.path(), true, "%Y%m%d").unwrap().len(), 2);
    }

    #[test]
    fn test_unreadable_metadata_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"garbage bytes").unwrap();

        let records = scan_folder(dir.path(), false, "%Y%m%d_%H%M%S").unwrap();
        let record = &records[0];

        assert_eq!(record.filename, "photo.jpg");
        assert!(record.exif_capture_time.is_none());
        assert_eq!(record.exif_latitude, NO_COORDINATE);
        assert!(record.final_location().is_none());
        // The generated name still comes from the creation-time fallback.
        assert!(record.new_name.ends_with(".jpg"));
        assert_ne!(record.new_name, record.filename);
    }
}
