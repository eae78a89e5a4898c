//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::PgPool;
use std::time::Duration;

use menu_sync::config::WindowConfig;
use menu_sync::database::CacheStore;
use menu_sync::models::{CacheCell, CacheEntry, Meal, Period};
use menu_sync::sync::{CacheSynchronizer, RateLimitPolicy, RecordingSleeper, SyncOptions};
use menu_sync::test_helpers::{date, ScriptedProvider};

pub const SITE_ID: &str = "site-1";

/// Date the fixture runs treat as "today"
pub fn today() -> NaiveDate {
    date("2024-03-01")
}

/// Two kept locations in two buildings plus one location that is filtered out
pub fn campus() -> ScriptedProvider {
    ScriptedProvider::new()
        .with_building("Hall A", &[("L1", "Hall A Grill"), ("L2", "Hall A Cafe")])
        .with_building("Hall B", &[("L3", "Hall B Deli")])
}

pub fn options(back_days: u32, forward_days: u32) -> SyncOptions {
    SyncOptions {
        site_id: SITE_ID.to_string(),
        halls: Some(vec!["Hall A Grill".to_string(), "hall b deli".to_string()]),
        window: WindowConfig {
            back_days,
            forward_days,
        },
        rate_limit: RateLimitPolicy::new(Duration::from_secs(5), Duration::from_secs(10)),
    }
}

pub fn synchronizer(
    provider: ScriptedProvider,
    pool: &PgPool,
    options: SyncOptions,
) -> CacheSynchronizer<ScriptedProvider, RecordingSleeper> {
    CacheSynchronizer::with_sleeper(
        provider,
        CacheStore::new(pool.clone()),
        options,
        RecordingSleeper::new(),
    )
}

pub fn cell(day: &str, location: &str, period: Period) -> CacheCell {
    CacheCell::new(date(day), location, period)
}

/// Seed a cell directly through the store
pub async fn seed(pool: &PgPool, cell: &CacheCell, meals: &[Meal]) {
    CacheStore::new(pool.clone())
        .replace_cell(cell, meals)
        .await
        .expect("seeding a cache cell");
}

/// Meal names in a cell, sorted
pub async fn cell_meals(pool: &PgPool, cell: &CacheCell) -> Vec<String> {
    CacheStore::new(pool.clone())
        .menu_for_cell(cell)
        .await
        .expect("reading a cache cell")
        .into_iter()
        .map(|entry| entry.meal)
        .collect()
}

/// The whole table in a stable order
pub async fn all_rows(pool: &PgPool) -> Vec<CacheEntry> {
    sqlx::query_as::<_, CacheEntry>(
        r#"
        SELECT day, location, mealtime, meal, mealid
        FROM "DocCache"
        ORDER BY day, location, mealtime, meal, mealid
        "#,
    )
    .fetch_all(pool)
    .await
    .expect("reading the cache table")
}
