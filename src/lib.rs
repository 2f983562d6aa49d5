//! `skycast` - weather and internet-search tools for a conversational agent
//!
//! This library provides the tool implementations behind an agent runtime:
//! free-text location resolution with geocoding fallback, current-weather
//! reporting, and Tavily-backed internet search, exposed through a uniform
//! tool registry and a small HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod location;
pub mod location_resolver;
pub mod telemetry;
pub mod tools;
pub mod web;

// Re-export core types for public API
pub use api::ApiState;
pub use config::SkycastConfig;
pub use error::SkycastError;
pub use forecast::{CurrentConditions, ForecastLookup, OpenMeteoForecast};
pub use geocode::{GeocodeLookup, GeocodeMatch, OpenMeteoGeocoder};
pub use location::{Candidate, LocationQuery};
pub use location_resolver::{LocationResolver, ResolutionOutcome};
pub use tools::{Tool, ToolRegistry, WeatherTool};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
