mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use lander::config::{FileConfig, Settings};
use lander::monitoring::TracingConfig;
use lander::render::Renderer;
use lander::runtime::DockerSource;
use lander::server::{self, Dashboard, DashboardConfig};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file = match cli.config_file() {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let overrides = cli
        .overrides()
        .context("Can't start the server without a valid configuration")?;
    let (settings, defaults) = Settings::resolve(file, overrides)
        .context("Can't start the server without a valid configuration")?;

    TracingConfig::new(&settings.log_level, settings.json_logs).init_tracing()?;

    info!("🚀 Lander starting up...");
    if let Some(path) = cli.config_file() {
        info!("Loaded configuration file: {}", path.display());
    }
    settings.report(&defaults);

    let source = DockerSource::connect(&settings.docker)?;
    let renderer = Renderer::load(settings.template.as_deref())?;
    let dashboard = Arc::new(Dashboard::new(
        Arc::new(source),
        renderer,
        DashboardConfig::from(&settings),
    ));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    server::serve(dashboard, settings.listen, shutdown).await?;
    Ok(())
}
