//! Canonical meal periods and the provider's call-scoped period identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MenuSyncError;

/// One of the four meal periods the cache is partitioned by.
///
/// The integer code is what lands in the `mealtime` column, so the mapping
/// must never change once rows exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Breakfast,
    Lunch,
    Dinner,
    Everyday,
}

impl Period {
    /// All periods in code order; this is also the crawl order.
    pub const ALL: [Period; 4] = [
        Period::Breakfast,
        Period::Lunch,
        Period::Dinner,
        Period::Everyday,
    ];

    /// Code stored in the `mealtime` column
    pub const fn code(self) -> i16 {
        match self {
            Period::Breakfast => 0,
            Period::Lunch => 1,
            Period::Dinner => 2,
            Period::Everyday => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Period::Breakfast => "breakfast",
            Period::Lunch => "lunch",
            Period::Dinner => "dinner",
            Period::Everyday => "everyday",
        }
    }

    /// Lenient match used for names coming back from the provider.
    ///
    /// The provider spells the all-day period "Every Day" while callers use
    /// "everyday"; both are accepted, in any case.
    pub fn from_provider_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "breakfast" => Some(Period::Breakfast),
            "lunch" => Some(Period::Lunch),
            "dinner" => Some(Period::Dinner),
            "everyday" | "every day" => Some(Period::Everyday),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = MenuSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_provider_name(s).ok_or_else(|| MenuSyncError::InvalidPeriodName(s.to_string()))
    }
}

/// Provider-issued identifier for one period at one location on one date.
///
/// Only valid for the (location, date) pair it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodId(String);

impl PeriodId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Period identifiers returned by one periods call.
///
/// A `None` slot means the provider does not offer that period for the
/// location and date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodIdSpec {
    breakfast: Option<PeriodId>,
    lunch: Option<PeriodId>,
    dinner: Option<PeriodId>,
    everyday: Option<PeriodId>,
}

impl PeriodIdSpec {
    pub fn get(&self, period: Period) -> Option<&PeriodId> {
        self.slot(period).as_ref()
    }

    /// Record the identifier for a period. A later entry with the same name
    /// replaces an earlier one.
    pub fn set(&mut self, period: Period, id: PeriodId) {
        *self.slot_mut(period) = Some(id);
    }

    pub fn resolution(&self, period: Period) -> PeriodResolution {
        match self.get(period) {
            Some(id) => PeriodResolution::Offered(id.clone()),
            None => PeriodResolution::NotOffered,
        }
    }

    /// Periods that have an identifier, in code order
    pub fn offered(&self) -> Vec<Period> {
        Period::ALL
            .into_iter()
            .filter(|p| self.get(*p).is_some())
            .collect()
    }

    fn slot(&self, period: Period) -> &Option<PeriodId> {
        match period {
            Period::Breakfast => &self.breakfast,
            Period::Lunch => &self.lunch,
            Period::Dinner => &self.dinner,
            Period::Everyday => &self.everyday,
        }
    }

    fn slot_mut(&mut self, period: Period) -> &mut Option<PeriodId> {
        match period {
            Period::Breakfast => &mut self.breakfast,
            Period::Lunch => &mut self.lunch,
            Period::Dinner => &mut self.dinner,
            Period::Everyday => &mut self.everyday,
        }
    }
}

impl FromIterator<(Period, PeriodId)> for PeriodIdSpec {
    fn from_iter<I: IntoIterator<Item = (Period, PeriodId)>>(iter: I) -> Self {
        let mut spec = PeriodIdSpec::default();
        for (period, id) in iter {
            spec.set(period, id);
        }
        spec
    }
}

/// Outcome of looking up one period for a location and date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodResolution {
    Offered(PeriodId),
    NotOffered,
}

impl PeriodResolution {
    pub fn period_id(&self) -> Option<&PeriodId> {
        match self {
            PeriodResolution::Offered(id) => Some(id),
            PeriodResolution::NotOffered => None,
        }
    }

    pub fn is_offered(&self) -> bool {
        matches!(self, PeriodResolution::Offered(_))
    }
}
