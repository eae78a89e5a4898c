//! # Error Types
//!
//! Unified error handling for the menu client, the cache store and the synchronizer.

use thiserror::Error;

/// Result type used across the crate
pub type Result<T> = std::result::Result<T, MenuSyncError>;

/// Everything that can stop a menu synchronization run
#[derive(Debug, Error)]
pub enum MenuSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error for {url}: {reason}")]
    Network {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Unexpected response shape from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid period name: {0}")]
    InvalidPeriodName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl MenuSyncError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a network error from a transport failure
    pub fn transport(url: impl Into<String>, error: &reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            status: error.status().map(|s| s.as_u16()),
            reason: error.to_string(),
        }
    }

    /// Create a network error for a non-success HTTP status
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::Network {
            url: url.into(),
            status: Some(status),
            reason: format!("upstream responded with HTTP {status}"),
        }
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if the error is transient (worth a later re-run)
    ///
    /// The synchronizer never retries by itself; this only feeds the log line
    /// the entrypoint writes before exiting.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            MenuSyncError::Network { status, .. } => match status {
                Some(code) => *code == 429 || *code >= 500,
                None => true,
            },
            MenuSyncError::Database(sqlx::Error::PoolTimedOut)
            | MenuSyncError::Database(sqlx::Error::Io(_)) => true,
            _ => false,
        }
    }
}

impl From<config::ConfigError> for MenuSyncError {
    fn from(error: config::ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_status_is_recoverable() {
        let error = MenuSyncError::http_status("https://example.test/menu", 429);
        assert!(error.is_recoverable());
        assert!(error.to_string().contains("HTTP 429"));
    }

    #[test]
    fn test_client_errors_are_not_recoverable() {
        assert!(!MenuSyncError::http_status("https://example.test/menu", 404).is_recoverable());
        assert!(!MenuSyncError::InvalidPeriodName("brunch".to_string()).is_recoverable());
        assert!(!MenuSyncError::not_found("location Hall Z").is_recoverable());
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = MenuSyncError::Decode {
            url: "https://example.test/periods".to_string(),
            source,
        };
        assert!(std::error::Error::source(&error).is_some());
    }
}
