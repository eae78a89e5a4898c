//! # Period Resolver
//!
//! Turns canonical period names into the provider's call-scoped period IDs.
//! An invalid name is an error; a valid period the provider does not offer
//! that day is not, and resolves to [`PeriodResolution::NotOffered`].

use chrono::NaiveDate;
use tracing::debug;

use super::payloads::find_location_id;
use super::traits::MenuProvider;
use crate::error::Result;
use crate::models::{Meal, Menu, Period, PeriodResolution};

/// Meals for one cell, or the fact that nothing was published
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodMenu {
    NotOffered,
    Published(Vec<Meal>),
}

impl PeriodMenu {
    pub fn meals(&self) -> &[Meal] {
        match self {
            PeriodMenu::NotOffered => &[],
            PeriodMenu::Published(meals) => meals,
        }
    }

    pub fn into_meals(self) -> Vec<Meal> {
        match self {
            PeriodMenu::NotOffered => Vec::new(),
            PeriodMenu::Published(meals) => meals,
        }
    }

    pub fn is_offered(&self) -> bool {
        matches!(self, PeriodMenu::Published(_))
    }
}

pub struct PeriodResolver<'a, P: MenuProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: MenuProvider + ?Sized> PeriodResolver<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Resolve a period given by name. Unknown names fail before any request.
    pub async fn resolve(
        &self,
        location_id: &str,
        date: NaiveDate,
        period_name: &str,
    ) -> Result<PeriodResolution> {
        let period: Period = period_name.parse()?;
        self.resolve_period(location_id, date, period).await
    }

    pub async fn resolve_period(
        &self,
        location_id: &str,
        date: NaiveDate,
        period: Period,
    ) -> Result<PeriodResolution> {
        let spec = self.provider.list_period_ids(location_id, date).await?;
        Ok(spec.resolution(period))
    }

    /// Resolve the period and fetch its meals if it is offered
    pub async fn menu_for(
        &self,
        location_id: &str,
        period: Period,
        date: NaiveDate,
    ) -> Result<PeriodMenu> {
        match self.resolve_period(location_id, date, period).await? {
            PeriodResolution::Offered(period_id) => {
                let meals = self
                    .provider
                    .fetch_menu(location_id, &period_id, date)
                    .await?;
                Ok(PeriodMenu::Published(meals))
            }
            PeriodResolution::NotOffered => {
                debug!(
                    location_id = location_id,
                    period = %period,
                    date = %date,
                    "Period not offered"
                );
                Ok(PeriodMenu::NotOffered)
            }
        }
    }

    /// Look up a location ID by building and location name (case-insensitive)
    pub async fn resolve_location(
        &self,
        site_id: &str,
        building_name: &str,
        location_name: &str,
    ) -> Result<String> {
        let buildings = self.provider.list_buildings(site_id).await?;
        find_location_id(&buildings, building_name, location_name)
    }

    /// Fetch a menu entirely by names.
    ///
    /// A period that is not offered yields an empty [`Menu`].
    pub async fn menu_by_names(
        &self,
        building_name: &str,
        location_name: &str,
        period_name: &str,
        site_id: &str,
        date: NaiveDate,
    ) -> Result<Menu> {
        let period: Period = period_name.parse()?;
        let location_id = self
            .resolve_location(site_id, building_name, location_name)
            .await?;

        match self.resolve_period(&location_id, date, period).await? {
            PeriodResolution::Offered(period_id) => {
                self.provider
                    .fetch_period_menu(&location_id, &period_id, date)
                    .await
            }
            PeriodResolution::NotOffered => Ok(Menu::empty(date)),
        }
    }
}
