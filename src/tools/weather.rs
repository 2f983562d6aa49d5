//! The `get_weather` tool.
//!
//! Resolves a free-text location, fetches current conditions for the
//! winning coordinates, and reports the outcome as a plain mapping. All
//! failure modes on this path are recovered into the mapping — the tool
//! invocation itself only fails if the report cannot be serialized.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::SkycastError;
use crate::forecast::{CurrentConditions, ForecastLookup, weather_code_to_description};
use crate::geocode::GeocodeLookup;
use crate::location_resolver::{LocationResolver, ResolutionOutcome};
use crate::tools::Tool;

/// Result contract of one weather lookup.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherReport {
    Ok {
        location: String,
        #[serde(rename = "temperatureF")]
        temperature_f: f64,
        #[serde(rename = "feelsLikeF")]
        feels_like_f: Option<f64>,
        #[serde(rename = "humidityPercent")]
        humidity_percent: Option<f64>,
        summary: String,
        #[serde(rename = "suggestedQueries")]
        suggested_queries: Vec<String>,
    },
    NotFound {
        message: String,
        #[serde(rename = "suggestedQueries")]
        suggested_queries: Vec<String>,
    },
    Error {
        message: String,
        #[serde(rename = "suggestedQueries")]
        suggested_queries: Vec<String>,
    },
}

/// Current-weather lookup for a free-text location.
pub struct WeatherTool {
    geocoder: Arc<dyn GeocodeLookup>,
    forecast: Arc<dyn ForecastLookup>,
}

impl WeatherTool {
    pub fn new(geocoder: Arc<dyn GeocodeLookup>, forecast: Arc<dyn ForecastLookup>) -> Self {
        Self { geocoder, forecast }
    }

    /// Resolve and fetch, folding every failure into the report.
    pub async fn report(&self, location: &str) -> WeatherReport {
        let (place, suggestions) =
            match LocationResolver::resolve(self.geocoder.as_ref(), location).await {
                ResolutionOutcome::Resolved { place, suggestions } => (place, suggestions),
                ResolutionOutcome::NotFound { suggestions } => {
                    return WeatherReport::NotFound {
                        message: format!(
                            "No places matched \"{}\". Try one of the suggested queries.",
                            location.trim()
                        ),
                        suggested_queries: suggestions,
                    };
                }
                ResolutionOutcome::Failed {
                    message,
                    suggestions,
                } => {
                    return WeatherReport::Error {
                        message,
                        suggested_queries: suggestions,
                    };
                }
            };

        let display_name = place.display_name();
        debug!(place = %display_name, "Fetching current weather");

        let current = match self.forecast.current(place.latitude, place.longitude).await {
            Ok(current) => current,
            Err(error) => {
                return WeatherReport::Error {
                    message: format!(
                        "Found {display_name} but the weather service request failed: {error:#}"
                    ),
                    suggested_queries: suggestions,
                };
            }
        };

        let Some(temperature) = current.temperature_f else {
            return WeatherReport::Error {
                message: format!("Found {display_name} but couldn't read current weather there."),
                suggested_queries: suggestions,
            };
        };

        WeatherReport::Ok {
            location: display_name,
            temperature_f: temperature,
            feels_like_f: current.feels_like_f,
            humidity_percent: current.humidity_percent,
            summary: summarize(temperature, &current),
            suggested_queries: suggestions,
        }
    }
}

/// One-line conditions summary: temperature first, then whichever details
/// the service reported, parenthesized and comma-joined.
fn summarize(temperature: f64, current: &CurrentConditions) -> String {
    let mut details = Vec::new();
    if let Some(feels_like) = current.feels_like_f {
        details.push(format!("feels like {feels_like:.0}\u{b0}F"));
    }
    if let Some(humidity) = current.humidity_percent {
        details.push(format!("{humidity:.0}% humidity"));
    }
    if let Some(wind) = current.wind_speed_mph {
        details.push(format!("wind {wind:.0} mph"));
    }
    if let Some(code) = current.weather_code {
        details.push(weather_code_to_description(code).to_string());
    }

    if details.is_empty() {
        format!("{temperature:.0}\u{b0}F")
    } else {
        format!("{temperature:.0}\u{b0}F ({})", details.join(", "))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Get the current weather for a given location"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "Place to look up, e.g. \"Huntsville, AL\" or \"Paris, France\""
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, args: Value) -> crate::Result<Value> {
        let location = args
            .get("location")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let report = self.report(location).await;
        serde_json::to_value(&report)
            .map_err(|e| SkycastError::general(format!("Failed to serialize weather report: {e}")))
    }
}
