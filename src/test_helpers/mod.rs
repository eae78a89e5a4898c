//! # Test Helpers
//!
//! Shared fixtures for unit and integration tests: a scripted upstream
//! provider and small constructors for dates and meals.

pub mod scripted_provider;

pub use scripted_provider::{ProviderCall, ScriptedProvider};

use chrono::NaiveDate;

use crate::models::Meal;

/// Parse a `YYYY-MM-DD` literal
///
/// # Panics
/// On a malformed literal; test input only.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date literal must be YYYY-MM-DD")
}

/// Meals named `{prefix} 0..count` with IDs `{prefix}-0..count`
pub fn meals(prefix: &str, count: usize) -> Vec<Meal> {
    (0..count)
        .map(|i| Meal::new(format!("{prefix}-{i}"), format!("{prefix} {i}")))
        .collect()
}
