//! Open-Meteo geocoding client.
//!
//! Resolution talks to geocoding through the [`GeocodeLookup`] trait so the
//! candidate fallback chain can be exercised with canned results in tests.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Public Open-Meteo geocoding endpoint (no API key required).
pub const DEFAULT_BASE_URL: &str = "https://geocoding-api.open-meteo.com";

/// One place returned by the geocoding service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeocodeMatch {
    pub name: String,
    /// First-level administrative division (state/province).
    pub admin1: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodeMatch {
    /// "name, admin1, country" with absent parts omitted.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        for extra in [&self.admin1, &self.country] {
            if let Some(value) = extra {
                if !value.is_empty() {
                    parts.push(value.as_str());
                }
            }
        }
        parts.join(", ")
    }
}

/// Free-text place search with an optional ISO country-code bias.
#[async_trait]
pub trait GeocodeLookup: Send + Sync {
    async fn search(&self, name: &str, country_bias: Option<&str>) -> Result<Vec<GeocodeMatch>>;
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodeMatch>>,
}

/// HTTP client for the Open-Meteo geocoding API.
pub struct OpenMeteoGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build geocoding HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeocodeLookup for OpenMeteoGeocoder {
    async fn search(&self, name: &str, country_bias: Option<&str>) -> Result<Vec<GeocodeMatch>> {
        let mut url = format!(
            "{}/v1/search?name={}&count=5&language=en&format=json",
            self.base_url,
            urlencoding::encode(name)
        );
        if let Some(code) = country_bias {
            url.push_str("&countryCode=");
            url.push_str(code);
        }

        tracing::debug!(%name, ?country_bias, "Geocoding place name");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Geocoding request failed for \"{name}\""))?
            .error_for_status()
            .context("Geocoding service returned an error status")?;

        let body: GeocodingResponse = response
            .json()
            .await
            .context("Failed to parse OpenMeteo geocoding response")?;

        Ok(body.results.unwrap_or_default())
    }
}
