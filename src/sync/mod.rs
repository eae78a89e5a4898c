//! # Menu Synchronization
//!
//! - [`synchronizer`] - the per-cell crawl and cache rewrite
//! - [`window`] - the rolling range of days kept in sync
//! - [`throttle`] - randomized pauses between upstream calls

pub mod synchronizer;
pub mod throttle;
pub mod window;

pub use synchronizer::{select_locations, CacheSynchronizer, SyncOptions, SyncReport};
pub use throttle::{RateLimitPolicy, RecordingSleeper, Sleeper, TokioSleeper};
pub use window::SyncWindow;

use tracing::info;

use crate::client::DineocClient;
use crate::config::MenuSyncConfig;
use crate::database::{run_migrations, CacheStore, DatabaseConnection};
use crate::error::Result;

/// Connect, optionally migrate, and run one synchronization pass
pub async fn run_from_config(config: &MenuSyncConfig, migrate: bool) -> Result<SyncReport> {
    let database_url = config.database_url()?;
    let db = DatabaseConnection::connect(database_url, config.database.max_connections).await?;

    if migrate {
        run_migrations(db.pool()).await?;
    }

    let client = DineocClient::new(&config.provider)?;
    let synchronizer = CacheSynchronizer::new(
        client,
        CacheStore::new(db.pool().clone()),
        SyncOptions::from_config(config),
    );

    let result = synchronizer.run().await;
    db.close().await;
    info!(success = result.is_ok(), "Database connection closed");
    result
}
