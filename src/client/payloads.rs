//! # Provider Payloads
//!
//! Response shapes of the DineOnCampus endpoints and the functions that turn
//! them into crate models. Kept free of I/O so they can be exercised on
//! captured bodies.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{MenuSyncError, Result};
use crate::models::{Building, Meal, Period, PeriodId, PeriodIdSpec};
use crate::utils::serde::{deserialize_null_default, deserialize_string_id};

/// `sites/{siteId}/locations-public`
#[derive(Debug, Deserialize)]
struct BuildingsResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    buildings: Vec<Building>,
}

/// `locations/{locationId}/periods/`
#[derive(Debug, Deserialize)]
struct PeriodsResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    periods: Vec<ProviderPeriod>,
}

#[derive(Debug, Deserialize)]
struct ProviderPeriod {
    #[serde(deserialize_with = "deserialize_string_id")]
    id: String,
    name: String,
}

/// `locations/{locationId}/menu`
#[derive(Debug, Deserialize)]
struct MenuResponse {
    #[serde(default)]
    period: Option<MenuPeriod>,
}

#[derive(Debug, Deserialize)]
struct MenuPeriod {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    items: Vec<Meal>,
}

/// A period's menu with the category level removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedMenu {
    pub period_name: String,
    pub meals: Vec<Meal>,
}

pub fn parse_buildings(body: &str) -> serde_json::Result<Vec<Building>> {
    let response: BuildingsResponse = serde_json::from_str(body)?;
    Ok(response.buildings)
}

pub fn parse_period_ids(body: &str) -> serde_json::Result<PeriodIdSpec> {
    let response: PeriodsResponse = serde_json::from_str(body)?;
    Ok(period_ids_from(
        response.periods.into_iter().map(|p| (p.name, p.id)),
    ))
}

/// Build a [`PeriodIdSpec`] from `(provider name, provider id)` pairs.
///
/// Names outside the four canonical periods (e.g. "Late Night") are skipped.
pub fn period_ids_from<I, N, S>(periods: I) -> PeriodIdSpec
where
    I: IntoIterator<Item = (N, S)>,
    N: AsRef<str>,
    S: Into<String>,
{
    let mut spec = PeriodIdSpec::default();
    for (name, id) in periods {
        match Period::from_provider_name(name.as_ref()) {
            Some(period) => spec.set(period, PeriodId::new(id)),
            None => debug!(period_name = name.as_ref(), "Ignoring non-canonical period"),
        }
    }
    spec
}

/// Parse a menu body, keeping meals in category order then item order
pub fn parse_menu(body: &str) -> serde_json::Result<FlattenedMenu> {
    let response: MenuResponse = serde_json::from_str(body)?;
    let Some(period) = response.period else {
        return Ok(FlattenedMenu::default());
    };

    let meals = period
        .categories
        .into_iter()
        .flat_map(|category| category.items)
        .collect();

    Ok(FlattenedMenu {
        period_name: period.name,
        meals,
    })
}

/// Find a location's ID by building and location name, ignoring case.
pub fn find_location_id(
    buildings: &[Building],
    building_name: &str,
    location_name: &str,
) -> Result<String> {
    let building_name = building_name.to_lowercase();
    let location_name = location_name.to_lowercase();

    buildings
        .iter()
        .filter(|b| b.name.to_lowercase() == building_name)
        .flat_map(|b| b.locations.iter())
        .find(|l| l.name.to_lowercase() == location_name)
        .map(|l| l.id.clone())
        .ok_or_else(|| {
            MenuSyncError::not_found(format!(
                "location '{location_name}' in building '{building_name}'"
            ))
        })
}

/// Location ID to display name, across every building
pub fn location_names(buildings: &[Building]) -> HashMap<String, String> {
    buildings
        .iter()
        .flat_map(|b| b.locations.iter())
        .map(|l| (l.id.clone(), l.name.clone()))
        .collect()
}
