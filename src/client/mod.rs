//! # Menu Provider Client
//!
//! Everything that talks to the upstream dining provider.
//!
//! - [`traits`] - the [`MenuProvider`] seam used by the synchronizer
//! - [`dineoc`] - HTTP implementation for the DineOnCampus API
//! - [`payloads`] - response parsing and catalog lookups
//! - [`resolver`] - period-name to period-ID resolution

pub mod dineoc;
pub mod payloads;
pub mod resolver;
pub mod traits;

pub use dineoc::{DineocClient, UserAgentPolicy};
pub use payloads::{find_location_id, location_names};
pub use resolver::{PeriodMenu, PeriodResolver};
pub use traits::MenuProvider;
