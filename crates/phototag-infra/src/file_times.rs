//! Filesystem timestamp adjustment for exported photos

use std::path::Path;

use chrono::{DateTime, Utc};
use filetime::FileTime;
use phototag_types::Result;

/// Set access and modification times to the resolved capture time.
///
/// Creation time (birthtime) cannot be set portably and is left alone.
pub fn set_file_times(path: &Path, timestamp: DateTime<Utc>) -> Result<()> {
    let file_time = FileTime::from_unix_time(timestamp.timestamp(), 0);
    filetime::set_file_times(path, file_time, file_time)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_set_file_times() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"data").unwrap();

        let timestamp = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        set_file_times(&path, timestamp).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        let modified = FileTime::from_last_modification_time(&metadata);
        assert_eq!(modified.unix_seconds(), timestamp.timestamp());
    }

    #[test]
    fn test_set_file_times_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jpg");
        let timestamp = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert!(set_file_times(&path, timestamp).is_err());
    }
}
