use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::period::Period;

/// CacheEntry is one meal published for a cell.
/// Maps to the `"DocCache"` table; rows carry no identity of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, FromRow)]
pub struct CacheEntry {
    pub day: NaiveDate,
    pub location: String,
    pub mealtime: i16,
    pub meal: String,
    pub mealid: String,
}

impl CacheEntry {
    pub fn period(&self) -> Option<Period> {
        Period::from_code(self.mealtime)
    }
}

/// Key of one unit of synchronization: a location's period on one day
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheCell {
    pub day: NaiveDate,
    pub location: String,
    pub period: Period,
}

impl CacheCell {
    pub fn new(day: NaiveDate, location: impl Into<String>, period: Period) -> Self {
        Self {
            day,
            location: location.into(),
            period,
        }
    }

    pub fn mealtime(&self) -> i16 {
        self.period.code()
    }
}

impl fmt::Display for CacheCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.location, self.period)
    }
}
