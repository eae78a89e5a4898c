//! # Database Operations
//!
//! Postgres access for the menu cache.
//!
//! - [`connection`] - pool setup and health check
//! - [`migrations`] - embedded schema migrations
//! - [`cache_store`] - per-cell transactional writes and the consumer reads
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use menu_sync::database::{run_migrations, CacheStore, DatabaseConnection};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseConnection::connect("postgresql://localhost/foodfinder", 2).await?;
//! run_migrations(db.pool()).await?;
//!
//! let store = CacheStore::new(db.pool().clone());
//! let pruned = store.prune_before(chrono::NaiveDate::from_ymd_opt(2024, 2, 23).unwrap()).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache_store;
pub mod connection;
pub mod migrations;

pub use cache_store::{CacheStore, CellWrite};
pub use connection::DatabaseConnection;
pub use migrations::{run_migrations, MIGRATOR};
