//! In-memory [`MenuProvider`] with a scripted catalog, period lists and menus.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::client::payloads::period_ids_from;
use crate::client::MenuProvider;
use crate::error::{MenuSyncError, Result};
use crate::models::{Building, Location, Meal, Menu, PeriodId, PeriodIdSpec};

/// One request the synchronizer made, in the order it was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    ListBuildings {
        site_id: String,
    },
    ListPeriodIds {
        location_id: String,
        date: NaiveDate,
    },
    FetchMenu {
        location_id: String,
        period_id: String,
        date: NaiveDate,
    },
}

type DayKey = (String, NaiveDate);

/// Scripted upstream.
///
/// Periods are registered per (location, date) with the name the provider
/// would use, so spelling variants go through the same matching as real
/// responses. Anything not registered is "not offered".
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    buildings: Vec<Building>,
    periods: HashMap<DayKey, Vec<(String, String)>>,
    menus: HashMap<String, Menu>,
    failing_periods: HashSet<DayKey>,
    failing_menus: HashSet<String>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_building(mut self, name: &str, locations: &[(&str, &str)]) -> Self {
        self.buildings.push(Building {
            name: name.to_string(),
            locations: locations
                .iter()
                .map(|(id, name)| Location {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        });
        self
    }

    /// Offer a period and the meals its menu returns
    pub fn with_period(
        mut self,
        location_id: &str,
        date: NaiveDate,
        provider_name: &str,
        period_id: &str,
        meals: Vec<Meal>,
    ) -> Self {
        self.periods
            .entry((location_id.to_string(), date))
            .or_default()
            .push((provider_name.to_string(), period_id.to_string()));
        self.menus.insert(
            period_id.to_string(),
            Menu {
                date,
                period_name: provider_name.to_string(),
                options: meals,
            },
        );
        self
    }

    /// Make the periods request for this location and date fail
    pub fn failing_periods(mut self, location_id: &str, date: NaiveDate) -> Self {
        self.failing_periods.insert((location_id.to_string(), date));
        self
    }

    /// Make the menu request for this period ID fail
    pub fn failing_menu(mut self, period_id: &str) -> Self {
        self.failing_menus.insert(period_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of menu requests made
    pub fn menu_fetches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ProviderCall::FetchMenu { .. }))
            .count()
    }

    fn record(&self, call: ProviderCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl MenuProvider for ScriptedProvider {
    async fn list_buildings(&self, site_id: &str) -> Result<Vec<Building>> {
        self.record(ProviderCall::ListBuildings {
            site_id: site_id.to_string(),
        });
        Ok(self.buildings.clone())
    }

    async fn list_period_ids(&self, location_id: &str, date: NaiveDate) -> Result<PeriodIdSpec> {
        self.record(ProviderCall::ListPeriodIds {
            location_id: location_id.to_string(),
            date,
        });

        let key = (location_id.to_string(), date);
        if self.failing_periods.contains(&key) {
            return Err(MenuSyncError::http_status(
                format!("scripted://locations/{location_id}/periods/?date={date}"),
                503,
            ));
        }

        let listed = self.periods.get(&key).cloned().unwrap_or_default();
        Ok(period_ids_from(listed))
    }

    async fn fetch_period_menu(
        &self,
        location_id: &str,
        period_id: &PeriodId,
        date: NaiveDate,
    ) -> Result<Menu> {
        self.record(ProviderCall::FetchMenu {
            location_id: location_id.to_string(),
            period_id: period_id.to_string(),
            date,
        });

        if self.failing_menus.contains(period_id.as_str()) {
            return Err(MenuSyncError::http_status(
                format!("scripted://locations/{location_id}/menu?period={period_id}"),
                503,
            ));
        }

        Ok(self
            .menus
            .get(period_id.as_str())
            .cloned()
            .unwrap_or_else(|| Menu::empty(date)))
    }
}
