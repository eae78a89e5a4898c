#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Menu Sync
//!
//! Menu synchronization pipeline for the FoodFinder campus dining app.
//!
//! ## Overview
//!
//! The crate pulls menus from the DineOnCampus API and keeps a Postgres
//! cache of them, keyed by (day, location, meal period). The web API and the
//! preference notifier read that cache; this crate is its only writer.
//!
//! ## Architecture
//!
//! ```text
//! CacheSynchronizer -> PeriodResolver -> MenuProvider (DineocClient) -> upstream
//!        |
//!        +-> CacheStore (one transaction per cell) -> "DocCache"
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - upstream client, payload parsing, period resolution
//! - [`sync`] - the synchronizer, retention window and throttle
//! - [`database`] - connection, migrations and the cache store
//! - [`models`] - periods, locations, meals and cache rows
//! - [`config`] - layered configuration
//! - [`error`] - structured error handling
//! - [`logging`] - tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use menu_sync::config::MenuSyncConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MenuSyncConfig::load(None)?;
//! let report = menu_sync::sync::run_from_config(&config, false).await?;
//! println!("synced {} cells", report.cells_synced);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Database tests use `#[sqlx::test]` and need `DATABASE_URL` pointing at a
//! Postgres server where the test user may create databases:
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod sync;
pub mod test_helpers;
pub mod utils;

pub use client::{DineocClient, MenuProvider, PeriodMenu, PeriodResolver};
pub use config::MenuSyncConfig;
pub use database::CacheStore;
pub use error::{MenuSyncError, Result};
pub use models::{Building, CacheCell, CacheEntry, Location, Meal, Menu, Period, PeriodId, PeriodIdSpec, PeriodResolution};
pub use sync::{CacheSynchronizer, RateLimitPolicy, SyncOptions, SyncReport, SyncWindow};
