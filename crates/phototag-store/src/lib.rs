//! In-memory stores for photos, GPS tracks, and predefined positions.
//!
//! The photo ledger owns the final-coordinate cascade and filename
//! derivation; the track store owns time offsets and nearest-time lookup.

pub mod ledger;
pub mod positions;
pub mod tracks;

pub use ledger::{generate_filename, MatchReport, PhotoLedger, MATCH_WINDOW_MINUTES};
pub use positions::PositionCatalog;
pub use tracks::{format_offset, parse_offset, LoadOutcome, ParsedPoint, ParsedTrack, TrackStore};
