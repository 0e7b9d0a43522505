use clap::Parser;
use review_scraper::app::{response::ReviewResponse, server};
use review_scraper::utils::logger;
use review_scraper::{build_review_service, CliConfig, Command};
use std::sync::Arc;

const EXIT_CONFIG_ERROR: i32 = 1;
const EXIT_LOOKUP_FAILED: i32 = 2;
const EXIT_RUNTIME_ERROR: i32 = 3;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting review-scraper");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    let service = match build_review_service(&config) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("❌ Failed to initialise review service: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(EXIT_RUNTIME_ERROR);
        }
    };

    match cli.command {
        Command::Serve { .. } => {
            if let Err(e) = server::start_server(Arc::new(service), &config.server).await {
                tracing::error!("❌ Review API failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(EXIT_RUNTIME_ERROR);
            }
        }
        Command::Lookup { domain } => match service.get_review(&domain).await {
            Ok(Some(snapshot)) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&ReviewResponse::from(snapshot))?
                );
            }
            Ok(None) => {
                eprintln!("❌ Nothing to look up for a blank domain");
                std::process::exit(EXIT_LOOKUP_FAILED);
            }
            Err(e) => {
                tracing::error!("❌ Lookup for {} failed: {}", domain, e);
                eprintln!("❌ {}", e);
                std::process::exit(EXIT_LOOKUP_FAILED);
            }
        },
    }

    Ok(())
}
