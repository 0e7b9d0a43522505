use crate::adapters::http::DEFAULT_USER_AGENT;
use crate::core::{CacheWriteMode, ConfigProvider};
use crate::utils::error::{Result, ReviewError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_REVIEW_URL: &str = "https://www.trustpilot.com/review/";
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong while fetching the review";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;
pub const DEFAULT_PURGE_INTERVAL_SECONDS: u64 = 60;
/// Upper bound for every duration setting: one year.
pub const MAX_DURATION_SECONDS: u64 = 365 * 24 * 60 * 60;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("Failed to compile env var pattern - this is a bug")
});

/// Process configuration. Every section and key is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Returned to API callers for every failure other than "not found".
    pub default_error_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Prefix the domain is appended to, verbatim.
    pub review_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub write_mode: CacheWriteMode,
    /// How often expired entries are swept from the in-memory store.
    pub purge_interval_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            default_error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            review_url: DEFAULT_REVIEW_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            write_mode: CacheWriteMode::default(),
            purge_interval_seconds: DEFAULT_PURGE_INTERVAL_SECONDS,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReviewError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReviewError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REVIEW_URL})
    ///
    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind_address", &self.server.bind_address)?;
        validation::validate_non_empty_string(
            "server.default_error_message",
            &self.server.default_error_message,
        )?;
        validation::validate_url("source.review_url", &self.source.review_url)?;
        validation::validate_number_range(
            "source.timeout_seconds",
            self.source.timeout_seconds,
            1,
            MAX_DURATION_SECONDS,
        )?;
        validation::validate_non_empty_string("source.user_agent", &self.source.user_agent)?;
        validation::validate_number_range(
            "cache.ttl_seconds",
            self.cache.ttl_seconds,
            1,
            MAX_DURATION_SECONDS,
        )?;
        validation::validate_number_range(
            "cache.purge_interval_seconds",
            self.cache.purge_interval_seconds,
            1,
            MAX_DURATION_SECONDS,
        )?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn review_url(&self) -> &str {
        &self.source.review_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    fn cache_write_mode(&self) -> CacheWriteMode {
        self.cache.write_mode
    }
}

impl CacheConfig {
    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_seconds)
    }
}
