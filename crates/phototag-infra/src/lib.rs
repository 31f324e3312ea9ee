//! File-format boundary for phototag.
//!
//! Readers never fail hard on corrupt metadata (they return partial
//! results); writers are best-effort per field. Structural parse failures
//! of track and position files are real errors.

pub mod exif_reader;
pub mod file_times;
pub mod gpx_loader;
pub mod metadata_writer;
pub mod positions_loader;
pub mod thumbnails;

pub use exif_reader::PhotoMetadata;
pub use gpx_loader::parse_gpx;
pub use metadata_writer::{write_metadata, ExportFields};
pub use positions_loader::parse_positions;
