//! # Data Models
//!
//! Provider-side types (buildings, locations, meals, periods) and the
//! persisted cache row.

pub mod cache_entry;
pub mod dining;
pub mod period;

pub use cache_entry::{CacheCell, CacheEntry};
pub use dining::{Building, Location, Meal, Menu};
pub use period::{Period, PeriodId, PeriodIdSpec, PeriodResolution};
