//! Agent-facing tools.
//!
//! Every tool takes a JSON object of arguments and returns a
//! JSON-serializable mapping; the hosting framework discovers tools through
//! the registry and calls them by name. Tools that recover from their own
//! failures (the weather tool) encode the failure in the returned mapping;
//! the rest surface a [`SkycastError`] the HTTP layer turns into a status
//! code.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::SkycastError;
use crate::config::SkycastConfig;
use crate::forecast::OpenMeteoForecast;
use crate::geocode::OpenMeteoGeocoder;

pub mod search;
pub mod weather;

pub use search::{CrawlTool, ExtractTool, SearchTool, TavilyClient};
pub use weather::WeatherTool;

/// One callable tool exposed to the agent host.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name the host calls it by.
    fn name(&self) -> &'static str;

    /// One-line description shown to the model.
    fn description(&self) -> &'static str;

    /// JSON schema of the accepted arguments.
    fn parameters(&self) -> Value;

    /// Run the tool with a JSON object of arguments.
    async fn execute(&self, args: Value) -> crate::Result<Value>;
}

/// The set of tools this service exposes, in listing order.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Build the registry from configuration. The weather tool is always
    /// registered; search tools only when a Tavily API key is available.
    pub fn new(config: &SkycastConfig) -> crate::Result<Self> {
        let geocoder = OpenMeteoGeocoder::new(&config.geocoding.base_url, config.geocoding.timeout())
            .map_err(|e| SkycastError::config(format!("{e:#}")))?;
        let forecast = OpenMeteoForecast::new(&config.forecast.base_url, config.forecast.timeout())
            .map_err(|e| SkycastError::config(format!("{e:#}")))?;

        let mut tools: Vec<Arc<dyn Tool>> = vec![Arc::new(WeatherTool::new(
            Arc::new(geocoder),
            Arc::new(forecast),
        ))];

        match TavilyClient::new(&config.search) {
            Ok(client) => {
                let client = Arc::new(client);
                tools.push(Arc::new(SearchTool::new(client.clone())));
                tools.push(Arc::new(ExtractTool::new(client.clone())));
                tools.push(Arc::new(CrawlTool::new(client)));
            }
            Err(error) => {
                warn!("Search tools disabled: {error}");
            }
        }

        Ok(Self { tools })
    }

    /// Build a registry from an explicit tool list (used in tests).
    #[must_use]
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_always_has_the_weather_tool() {
        let registry = ToolRegistry::new(&SkycastConfig::default()).unwrap();
        assert!(registry.get("get_weather").is_some());
        assert!(registry.get("no_such_tool").is_none());
    }

    #[test]
    fn registry_includes_search_tools_when_key_is_configured() {
        let mut config = SkycastConfig::default();
        config.search.api_key = Some("tvly-test-key".to_string());
        let registry = ToolRegistry::new(&config).unwrap();
        assert!(registry.get("search_internet").is_some());
        assert!(registry.get("extract_site").is_some());
        assert!(registry.get("crawl_site").is_some());
        assert_eq!(registry.len(), 4);
    }
}
