//! Configuration management for the circulation desk

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::{loan::DEFAULT_LOAN_DAYS, member::DEFAULT_LOAN_LIMIT};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LibraryConfig {
    pub name: String,
    pub default_loan_days: u32,
    pub default_loan_limit: u32,
    /// JSON file with books and members to load at startup
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables, e.g. CIRCULATION_LIBRARY__NAME
            .add_source(
                Environment::with_prefix("CIRCULATION")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("logging.level", env::var("LOG_LEVEL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: "Central Library".to_string(),
            default_loan_days: DEFAULT_LOAN_DAYS,
            default_loan_limit: DEFAULT_LOAN_LIMIT,
            seed_file: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library: LibraryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
