//! Reverse geocoding with provider fallback
//!
//! Providers are tried in rotation (Nominatim, then Photon). Every failure
//! path degrades to `None`; a slow or broken provider never becomes a
//! ledger error.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use phototag_types::{has_coordinates, Error, Result};
use serde::Serialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("phototag/", env!("CARGO_PKG_VERSION"));

/// Location fields resolved from coordinates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationFields {
    pub city: Option<String>,
    pub sublocation: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Provider {
    Nominatim,
    Photon,
}

const PROVIDERS: &[Provider] = &[Provider::Nominatim, Provider::Photon];

pub struct GeocodingService {
    client: reqwest::Client,
    current_provider: AtomicUsize,
}

impl GeocodingService {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ExternalService(e.to_string()))?;
        Ok(Self {
            client,
            current_provider: AtomicUsize::new(0),
        })
    }

    /// Resolve location fields for a coordinate pair, or `None` when the
    /// input carries no coordinates or every provider fails.
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Option<LocationFields> {
        if !has_coordinates(latitude, longitude) {
            return None;
        }

        for _ in 0..PROVIDERS.len() {
            let index = self.current_provider.load(Ordering::Relaxed);
            let provider = PROVIDERS[index % PROVIDERS.len()];

            let outcome = match provider {
                Provider::Nominatim => self.nominatim(latitude, longitude).await,
                Provider::Photon => self.photon(latitude, longitude).await,
            };

            match outcome {
                Ok(Some(fields)) => return Some(fields),
                Ok(None) => {
                    tracing::debug!(?provider, "provider returned no address");
                }
                Err(e) => {
                    tracing::warn!(?provider, error = %e, "reverse geocoding failed");
                }
            }
            self.current_provider
                .store((index + 1) % PROVIDERS.len(), Ordering::Relaxed);
        }
        None
    }

    async fn nominatim(&self, latitude: f64, longitude: f64) -> Result<Option<LocationFields>> {
        let response = self
            .client
            .get("https://nominatim.openstreetmap.org/reverse")
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "18".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::ExternalService(format!(
                "nominatim returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;
        let Some(address) = body.get("address") else {
            return Ok(None);
        };

        let fields = LocationFields {
            city: first_string(address, &["city", "town", "village", "municipality", "hamlet"]),
            sublocation: first_string(address, &["suburb", "neighbourhood", "quarter"]),
            state: first_string(address, &["state", "province", "region"]),
            country: first_string(address, &["country"]),
        };
        Ok(some_if_any(fields))
    }

    async fn photon(&self, latitude: f64, longitude: f64) -> Result<Option<LocationFields>> {
        let response = self
            .client
            .get("https://photon.komoot.io/reverse")
            .query(&[("lat", latitude.to_string()), ("lon", longitude.to_string())])
            .send()
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::ExternalService(format!(
                "photon returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;
        let Some(properties) = body
            .get("features")
            .and_then(|f| f.get(0))
            .and_then(|f| f.get("properties"))
        else {
            return Ok(None);
        };

        let fields = LocationFields {
            city: first_string(properties, &["city", "town", "village"]),
            sublocation: first_string(properties, &["district", "locality"]),
            state: first_string(properties, &["state"]),
            country: first_string(properties, &["country"]),
        };
        Ok(some_if_any(fields))
    }
}

fn first_string(value: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

fn some_if_any(fields: LocationFields) -> Option<LocationFields> {
    if fields.city.is_some()
        || fields.sublocation.is_some()
        || fields.state.is_some()
        || fields.country.is_some()
    {
        Some(fields)
    } else {
        None
    }
}
