use chrono::{Days, NaiveDate};

use crate::config::WindowConfig;

/// Inclusive range of days the cache is kept in sync for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SyncWindow {
    /// `[today - back_days, today + forward_days]`
    pub fn around(today: NaiveDate, back_days: u32, forward_days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(back_days)))
            .unwrap_or(NaiveDate::MIN);
        let end = today
            .checked_add_days(Days::new(u64::from(forward_days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn from_config(today: NaiveDate, config: &WindowConfig) -> Self {
        Self::around(today, config.back_days, config.forward_days)
    }

    /// Every day in the window, oldest first
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|d| *d <= self.end).collect()
    }

    pub fn len(&self) -> usize {
        self.days().len()
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}
