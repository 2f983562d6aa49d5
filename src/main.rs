use anyhow::Result;

use skycast::api::ApiState;
use skycast::config::SkycastConfig;
use skycast::tools::ToolRegistry;
use skycast::{telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = SkycastConfig::load()?;
    telemetry::init(&config.logging)?;

    tracing::info!(version = skycast::VERSION, "Starting skycast");

    let registry = ToolRegistry::new(&config)?;
    let state = ApiState::new(registry);
    web::run(state, config.server.port).await
}
