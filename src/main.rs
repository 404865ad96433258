//! Circulation desk shell
//!
//! Loads configuration, installs logging, seeds a library and prints its
//! statistics as JSON.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use circulation_desk::{config::AppConfig, services::SeedData, Library, SystemClock};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("circulation_desk={}", config.logging.level).into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting circulation desk v{}", env!("CARGO_PKG_VERSION"));

    let mut library = Library::from_config(&config.library, Arc::new(SystemClock))?;

    if let Some(path) = &config.library.seed_file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path))?;
        SeedData::from_json(&json)
            .with_context(|| format!("Invalid seed file {}", path))?
            .apply(&mut library, config.library.default_loan_limit)?;
    }

    tracing::info!("{}", library);

    println!("{}", serde_json::to_string_pretty(&library.stats())?);

    Ok(())
}
