use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Review for domain: {domain} was not found")]
    NotFound { domain: String },

    #[error("Review source responded with status {status}")]
    RemoteError { status: u16, body: String },

    #[error("Review request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Failed to parse review page: {reason}")]
    ParsingFailure { reason: String },

    #[error("Review request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Cache store error: {message}")]
    Cache { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl ReviewError {
    pub fn not_found(domain: &str) -> Self {
        Self::NotFound {
            domain: domain.to_string(),
        }
    }

    pub fn parsing(reason: impl Into<String>) -> Self {
        Self::ParsingFailure {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. }
        )
    }

    /// HTTP status the API layer answers with.
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else {
            500
        }
    }

    /// Message safe to hand to an external caller. Only `NotFound` carries its
    /// own text; everything else collapses to `default_message`.
    pub fn public_message(&self, default_message: &str) -> String {
        if self.is_not_found() {
            self.to_string()
        } else {
            default_message.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;
