//! Core types and error definitions for phototag

pub mod error;
pub mod geo;
pub mod photo;
pub mod position;
pub mod track;

pub use error::{Error, Result};
pub use geo::{has_coordinates, GeoPosition, NO_COORDINATE};
pub use photo::{PhotoFilter, PhotoMetadataUpdate, PhotoRecord, SortKey};
pub use position::PositionRecord;
pub use track::{TrackBounds, TrackPoint, TrackRecord};
