//! Application service layer - session state, scanning, export, config,
//! and the external geocoding/elevation providers

pub mod config;
pub mod elevation;
pub mod export;
pub mod geocode;
pub mod scan;
pub mod session;

pub use config::AppConfig;
pub use elevation::ElevationService;
pub use export::{ExportReport, ExportSelection};
pub use geocode::{GeocodingService, LocationFields};
pub use session::Session;
