//! Elevation lookup with selectable provider
//!
//! Like geocoding, every failure degrades to `None`.

use std::time::Duration;

use phototag_types::{has_coordinates, Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ElevationService {
    client: reqwest::Client,
}

impl ElevationService {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::ExternalService(e.to_string()))?;
        Ok(Self { client })
    }

    /// Fetch the elevation in meters from the named provider
    /// ("open-elevation" or "opentopodata"); "none" disables lookups.
    pub async fn lookup(&self, latitude: f64, longitude: f64, provider: &str) -> Option<f64> {
        if !has_coordinates(latitude, longitude) {
            return None;
        }

        let outcome = match provider {
            "open-elevation" => self.open_elevation(latitude, longitude).await,
            "opentopodata" => self.opentopodata(latitude, longitude).await,
            "none" => return None,
            other => {
                tracing::warn!(provider = other, "unknown elevation provider");
                return None;
            }
        };

        match outcome {
            Ok(elevation) => elevation,
            Err(e) => {
                tracing::warn!(provider, error = %e, "elevation lookup failed");
                None
            }
        }
    }

    async fn open_elevation(&self, latitude: f64, longitude: f64) -> Result<Option<f64>> {
        let url = "https://api.open-elevation.com/api/v1/lookup";
        self.fetch_first_result(url, latitude, longitude).await
    }

    async fn opentopodata(&self, latitude: f64, longitude: f64) -> Result<Option<f64>> {
        let url = "https://api.opentopodata.org/v1/srtm90m";
        self.fetch_first_result(url, latitude, longitude).await
    }

    /// Both providers use the same response shape:
    /// `{"results": [{"elevation": <meters>}]}`.
    async fn fetch_first_result(
        &self,
        url: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<f64>> {
        let response = self
            .client
            .get(url)
            .query(&[("locations", format!("{latitude},{longitude}"))])
            .send()
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::ExternalService(format!(
                "elevation provider returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;
        Ok(body
            .get("results")
            .and_then(|r| r.get(0))
            .and_then(|r| r.get("elevation"))
            .and_then(|e| e.as_f64()))
    }
}
