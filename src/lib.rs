pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{InMemoryCacheStore, ReqwestPageClient};
pub use app::{build_review_service, DefaultReviewService};
pub use config::AppConfig;
pub use crate::core::{extractor::extract, scraper::ReviewScraper, service::ReviewService};
pub use domain::model::{format_rating, ReviewSnapshot};
pub use utils::error::{Result, ReviewError};
