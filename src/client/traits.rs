//! # Menu Provider Trait
//!
//! The seam between the synchronizer and the upstream dining API. The
//! production implementation is [`crate::client::DineocClient`]; tests use
//! [`crate::test_helpers::ScriptedProvider`].

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Building, Meal, Menu, PeriodId, PeriodIdSpec};

#[async_trait]
pub trait MenuProvider: Send + Sync {
    /// Fetch the site's building and location catalog
    async fn list_buildings(&self, site_id: &str) -> Result<Vec<Building>>;

    /// Fetch the period identifiers for one location on one date.
    ///
    /// The identifiers are only good for this (location, date) pair and must
    /// not be cached across calls.
    async fn list_period_ids(&self, location_id: &str, date: NaiveDate) -> Result<PeriodIdSpec>;

    /// Fetch one period's menu, keeping the provider's period label
    async fn fetch_period_menu(
        &self,
        location_id: &str,
        period_id: &PeriodId,
        date: NaiveDate,
    ) -> Result<Menu>;

    /// Fetch one period's meals as a single ordered list.
    ///
    /// An empty period payload is an empty list, not an error.
    async fn fetch_menu(
        &self,
        location_id: &str,
        period_id: &PeriodId,
        date: NaiveDate,
    ) -> Result<Vec<Meal>> {
        Ok(self
            .fetch_period_menu(location_id, period_id, date)
            .await?
            .options)
    }
}
