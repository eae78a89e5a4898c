use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::serde::{deserialize_null_default, deserialize_string_id};

/// A campus building and the dining venues inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    #[serde(rename = "buildingName")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub locations: Vec<Location>,
}

/// A dining venue as the provider identifies it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "deserialize_string_id")]
    pub id: String,
    pub name: String,
}

/// One menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(deserialize_with = "deserialize_string_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "desc", default)]
    pub description: Option<String>,
}

impl Meal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}

/// A single period's menu as published for one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub date: NaiveDate,
    /// Period name as the provider labels it; empty when no period was offered
    pub period_name: String,
    pub options: Vec<Meal>,
}

impl Menu {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            period_name: String::new(),
            options: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
