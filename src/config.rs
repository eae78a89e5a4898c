//! # Configuration
//!
//! Layered configuration for a synchronization run.
//!
//! Precedence (highest to lowest):
//! 1. `MENU_SYNC_*` environment variables (`__` separates nested keys)
//! 2. Config file (`config/menu-sync.toml`, or the path given on the command line)
//! 3. Built-in defaults from [`crate::constants`]
//!
//! The database URL is read from `DATABASE_URL` unless the file sets
//! `database.url`. Command-line window flags are applied by the binary after
//! loading.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::constants::{defaults, env, provider};
use crate::error::{MenuSyncError, Result};
use crate::sync::throttle::RateLimitPolicy;

const DEFAULT_CONFIG_FILE: &str = "config/menu-sync";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSyncConfig {
    /// DineOnCampus site to scrape
    pub site_id: String,
    /// Location names to scrape; ignored when `all_locations` is set
    pub halls: Vec<String>,
    pub all_locations: bool,
    pub window: WindowConfig,
    pub rate_limit: RateLimitConfig,
    pub provider: ProviderConfig,
    pub database: DatabaseConfig,
}

/// Days kept in sync around today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub back_days: u32,
    pub forward_days: u32,
}

/// Pause between upstream calls: `min_secs` plus up to `jitter_secs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub min_secs: u64,
    pub jitter_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Pick a different browser user agent for every request
    pub rotate_user_agent: bool,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[redacted]"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Default for MenuSyncConfig {
    fn default() -> Self {
        Self {
            site_id: defaults::SITE_ID.to_string(),
            halls: defaults::DINING_HALLS.iter().map(|h| h.to_string()).collect(),
            all_locations: false,
            window: WindowConfig {
                back_days: defaults::BACK_DAYS,
                forward_days: defaults::FORWARD_DAYS,
            },
            rate_limit: RateLimitConfig {
                min_secs: defaults::SLEEP_MIN_SECS,
                jitter_secs: defaults::SLEEP_JITTER_SECS,
            },
            provider: ProviderConfig {
                base_url: provider::DEFAULT_BASE_URL.to_string(),
                timeout_ms: provider::DEFAULT_TIMEOUT_MS,
                rotate_user_agent: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: defaults::MAX_DB_CONNECTIONS,
            },
        }
    }
}

impl MenuSyncConfig {
    /// Load configuration from the process environment and config file
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(config_file, vars)
    }

    /// Load configuration against an explicit set of environment variables.
    /// Tests use this to avoid touching the process environment.
    pub fn load_with_env(config_file: Option<&Path>, vars: HashMap<String, String>) -> Result<Self> {
        let file_source = match config_file {
            Some(path) => {
                debug!("Loading config from: {}", path.display());
                File::from(path).required(true)
            }
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let database_url = vars.get(env::DATABASE_URL).cloned();

        let environment = Environment::with_prefix(env::CONFIG_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("halls")
            .try_parsing(true)
            .source(Some(vars));

        let mut config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file_source)
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        if config.database.url.is_none() {
            config.database.url = database_url.filter(|url| !url.trim().is_empty());
        }

        config.validate()?;
        debug!(config = ?config, "Loaded menu sync configuration");
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.site_id.trim().is_empty() {
            return Err(MenuSyncError::config_error("site_id must not be empty"));
        }

        if !self.all_locations && self.halls.iter().all(|h| h.trim().is_empty()) {
            return Err(MenuSyncError::config_error(
                "halls must name at least one location unless all_locations is set",
            ));
        }

        reqwest::Url::parse(&self.provider.base_url).map_err(|e| {
            MenuSyncError::config_error(format!(
                "Invalid provider.base_url '{}': {e}",
                self.provider.base_url
            ))
        })?;

        if self.provider.timeout_ms == 0 {
            return Err(MenuSyncError::config_error(
                "provider.timeout_ms must be greater than 0",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(MenuSyncError::config_error(
                "database.max_connections must be greater than 0",
            ));
        }

        Ok(())
    }

    /// The database connection string; missing is a configuration error
    pub fn database_url(&self) -> Result<&str> {
        self.database.url.as_deref().ok_or_else(|| {
            MenuSyncError::config_error(format!(
                "{} is not set, cannot connect to database",
                env::DATABASE_URL
            ))
        })
    }

    /// Location allow-list, or `None` to scrape every location on the site
    pub fn hall_filter(&self) -> Option<&[String]> {
        if self.all_locations {
            None
        } else {
            Some(&self.halls)
        }
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            Duration::from_secs(self.rate_limit.min_secs),
            Duration::from_secs(self.rate_limit.jitter_secs),
        )
    }
}
