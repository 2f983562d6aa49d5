//! Internet search tools backed by the Tavily API.
//!
//! Three thin passthrough tools: plain search, single-page extraction, and
//! instructed crawling. Responses are forwarded to the caller as-is; the
//! agent host decides what to do with them.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::RetryTransientMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde_json::{Value, json};

use crate::SkycastError;
use crate::config::SearchConfig;
use crate::tools::Tool;

/// HTTP client for the Tavily search API.
///
/// Transient failures are retried with exponential backoff; this path is
/// not subject to the weather resolver's no-retry rule.
pub struct TavilyClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl TavilyClient {
    /// Build a client from configuration, falling back to the
    /// `TAVILY_API_KEY` environment variable for the key.
    pub fn new(config: &SearchConfig) -> crate::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| env::var("TAVILY_API_KEY").ok())
            .ok_or_else(|| {
                SkycastError::config(
                    "Missing Tavily API key: set search.api_key or the TAVILY_API_KEY env var",
                )
            })?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn post(&self, path: &str, body: Value) -> crate::Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SkycastError::api(format!("Search request failed: {e}")))?;

        let response = response
            .error_for_status()
            .map_err(|e| SkycastError::api(format!("Search service returned an error: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| SkycastError::api(format!("Failed to parse search response: {e}")))
    }

    pub async fn search(&self, query: &str) -> crate::Result<Value> {
        self.post("/search", json!({ "query": query })).await
    }

    pub async fn extract(&self, website: &str) -> crate::Result<Value> {
        self.post("/extract", json!({ "urls": [website] })).await
    }

    pub async fn crawl(&self, website: &str, instructions: &str) -> crate::Result<Value> {
        self.post(
            "/crawl",
            json!({ "url": website, "instructions": instructions }),
        )
        .await
    }
}

fn required_str<'a>(args: &'a Value, key: &str, tool: &str) -> crate::Result<&'a str> {
    args.get(key).and_then(Value::as_str).ok_or_else(|| {
        SkycastError::validation(format!("{tool} requires a \"{key}\" string argument"))
    })
}

/// Search the internet for a given query.
pub struct SearchTool {
    client: Arc<TavilyClient>,
}

impl SearchTool {
    pub fn new(client: Arc<TavilyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &'static str {
        "search_internet"
    }

    fn description(&self) -> &'static str {
        "Search the internet for a given query"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> crate::Result<Value> {
        let query = required_str(&args, "query", self.name())?;
        self.client.search(query).await
    }
}

/// Extract information from a given website.
pub struct ExtractTool {
    client: Arc<TavilyClient>,
}

impl ExtractTool {
    pub fn new(client: Arc<TavilyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ExtractTool {
    fn name(&self) -> &'static str {
        "extract_site"
    }

    fn description(&self) -> &'static str {
        "Extract information from a given website"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "website": { "type": "string", "description": "URL to extract" }
            },
            "required": ["website"]
        })
    }

    async fn execute(&self, args: Value) -> crate::Result<Value> {
        let website = required_str(&args, "website", self.name())?;
        self.client.extract(website).await
    }
}

/// Crawl a website following the given instructions.
pub struct CrawlTool {
    client: Arc<TavilyClient>,
}

impl CrawlTool {
    pub fn new(client: Arc<TavilyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CrawlTool {
    fn name(&self) -> &'static str {
        "crawl_site"
    }

    fn description(&self) -> &'static str {
        "Crawl a website and gather information following the given instructions"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "website": { "type": "string", "description": "URL to crawl" },
                "instructions": { "type": "string", "description": "What to look for" }
            },
            "required": ["website", "instructions"]
        })
    }

    async fn execute(&self, args: Value) -> crate::Result<Value> {
        let website = required_str(&args, "website", self.name())?;
        let instructions = required_str(&args, "instructions", self.name())?;
        self.client.crawl(website, instructions).await
    }
}
