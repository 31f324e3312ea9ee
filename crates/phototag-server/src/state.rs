//! Shared application state behind the HTTP handlers

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use phototag_app::{ElevationService, GeocodingService, Session};
use tokio::sync::{Mutex, RwLock};

/// Position-keyed thumbnail cache.
///
/// Entries are addressed by (photo index, size) and are only valid for one
/// ledger revision; a lookup with a newer revision drops everything.
#[derive(Debug, Default)]
pub struct ThumbnailCache {
    revision: u64,
    entries: HashMap<(usize, u32), Vec<u8>>,
}

impl ThumbnailCache {
    pub fn get(&mut self, revision: u64, index: usize, size: u32) -> Option<Vec<u8>> {
        self.validate(revision);
        self.entries.get(&(index, size)).cloned()
    }

    pub fn insert(&mut self, revision: u64, index: usize, size: u32, bytes: Vec<u8>) {
        self.validate(revision);
        self.entries.insert((index, size), bytes);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn validate(&mut self, revision: u64) {
        if self.revision != revision {
            self.entries.clear();
            self.revision = revision;
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub thumbnails: Arc<Mutex<ThumbnailCache>>,
    pub geocoder: Arc<GeocodingService>,
    pub elevation: Arc<ElevationService>,
    pub config_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        session: Session,
        config_path: PathBuf,
        geocoder: GeocodingService,
        elevation: ElevationService,
    ) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            thumbnails: Arc::new(Mutex::new(ThumbnailCache::default())),
            geocoder: Arc::new(geocoder),
            elevation: Arc::new(elevation),
            config_path: Arc::new(config_path),
        }
    }

    /// Persist the config file when auto-save is enabled.
    pub fn save_config(&self, session: &Session) {
        if !session.config.auto_save_config {
            return;
        }
        if let Err(e) = session.config.save(&self.config_path) {
            tracing::warn!(path = %self.config_path.display(), error = %e, "could not save config");
        }
    }
}
