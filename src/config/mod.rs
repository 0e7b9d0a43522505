pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use crate::utils::{error::Result, validation::Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "review-scraper")]
#[command(about = "Look up review counts and ratings for merchant domains")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Base URL the domain is appended to")]
    pub review_url: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true)]
    pub cache_ttl_seconds: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, help = "Socket address to listen on")]
        bind: Option<String>,
    },
    /// Look up a single domain and print the result as JSON
    Lookup { domain: String },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file (if any), applies command line overrides and
    /// validates the result.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(review_url) = &self.review_url {
            config.source.review_url = review_url.clone();
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.source.timeout_seconds = timeout_seconds;
        }
        if let Some(ttl_seconds) = self.cache_ttl_seconds {
            config.cache.ttl_seconds = ttl_seconds;
        }
        if let Command::Serve {
            bind: Some(bind_address),
        } = &self.command
        {
            config.server.bind_address = bind_address.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
