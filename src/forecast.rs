//! Open-Meteo forecast client for current conditions.
//!
//! The weather tool reports in imperial units, so the request asks the API
//! for Fahrenheit and miles per hour directly. Every field of
//! [`CurrentConditions`] is optional: the service is free to omit any of
//! them and the caller decides what is fatal.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Public Open-Meteo forecast endpoint (no API key required).
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

/// Current weather at a point, as far as the service reported it.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CurrentConditions {
    #[serde(rename = "temperature_2m")]
    pub temperature_f: Option<f64>,
    #[serde(rename = "apparent_temperature")]
    pub feels_like_f: Option<f64>,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity_percent: Option<f64>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed_mph: Option<f64>,
    #[serde(rename = "weather_code")]
    pub weather_code: Option<u8>,
}

/// Current-conditions lookup by coordinates.
#[async_trait]
pub trait ForecastLookup: Send + Sync {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
}

/// HTTP client for the Open-Meteo forecast API.
pub struct OpenMeteoForecast {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoForecast {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build forecast HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ForecastLookup for OpenMeteoForecast {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions> {
        let url = format!(
            "{}/v1/forecast?latitude={latitude}&longitude={longitude}\
             &current=temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,weather_code\
             &temperature_unit=fahrenheit&wind_speed_unit=mph",
            self.base_url
        );

        tracing::debug!(latitude, longitude, "Fetching current conditions");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Forecast request failed for ({latitude}, {longitude})"))?
            .error_for_status()
            .context("Forecast service returned an error status")?;

        let body: ForecastResponse = response
            .json()
            .await
            .context("Failed to parse OpenMeteo forecast response")?;

        Ok(body.current.unwrap_or_default())
    }
}

/// WMO weather interpretation codes as reported by Open-Meteo, phrased for
/// mid-sentence use in a conditions summary.
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "fog",
        48 => "depositing rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        56 => "light freezing drizzle",
        57 => "dense freezing drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        66 => "light freezing rain",
        67 => "heavy freezing rain",
        71 => "slight snow fall",
        73 => "moderate snow fall",
        75 => "heavy snow fall",
        77 => "snow grains",
        80 => "slight rain showers",
        81 => "moderate rain showers",
        82 => "violent rain showers",
        85 => "slight snow showers",
        86 => "heavy snow showers",
        95 => "thunderstorm",
        96 => "thunderstorm with slight hail",
        99 => "thunderstorm with heavy hail",
        _ => "unknown conditions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn current_parses_reported_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "34.7304"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("wind_speed_unit", "mph"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": {
                    "temperature_2m": 72.4,
                    "apparent_temperature": 70.1,
                    "relative_humidity_2m": 45.0,
                    "wind_speed_10m": 8.3,
                    "weather_code": 2
                }
            })))
            .mount(&server)
            .await;

        let forecast = OpenMeteoForecast::new(&server.uri(), Duration::from_secs(10)).unwrap();
        let current = forecast.current(34.7304, -86.5861).await.unwrap();
        assert_eq!(current.temperature_f, Some(72.4));
        assert_eq!(current.feels_like_f, Some(70.1));
        assert_eq!(current.humidity_percent, Some(45.0));
        assert_eq!(current.wind_speed_mph, Some(8.3));
        assert_eq!(current.weather_code, Some(2));
    }

    #[tokio::test]
    async fn partial_payload_leaves_missing_fields_unset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": { "relative_humidity_2m": 80.0 }
            })))
            .mount(&server)
            .await;

        let forecast = OpenMeteoForecast::new(&server.uri(), Duration::from_secs(10)).unwrap();
        let current = forecast.current(0.0, 0.0).await.unwrap();
        assert_eq!(current.temperature_f, None);
        assert_eq!(current.humidity_percent, Some(80.0));
    }

    #[tokio::test]
    async fn missing_current_block_yields_empty_conditions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"latitude": 0.0})))
            .mount(&server)
            .await;

        let forecast = OpenMeteoForecast::new(&server.uri(), Duration::from_secs(10)).unwrap();
        assert_eq!(
            forecast.current(0.0, 0.0).await.unwrap(),
            CurrentConditions::default()
        );
    }

    #[test]
    fn weather_codes_have_descriptions() {
        assert_eq!(weather_code_to_description(0), "clear sky");
        assert_eq!(weather_code_to_description(2), "partly cloudy");
        assert_eq!(weather_code_to_description(95), "thunderstorm");
        assert_eq!(weather_code_to_description(42), "unknown conditions");
    }
}
