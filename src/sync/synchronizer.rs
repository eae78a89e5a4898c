//! # Cache Synchronizer
//!
//! Crawls every (location, period, date) cell in the retention window and
//! rewrites the cache one cell at a time.
//!
//! ## Run Outline
//!
//! 1. Fetch the site catalog and pick the locations to scrape
//! 2. Prune rows older than the window start (one statement)
//! 3. For each location, each period in code order, each day oldest first:
//!    resolve the period ID, fetch the menu if offered, replace the cell in
//!    one transaction, then pause per the rate-limit policy
//!
//! The run fails fast. The first error stops the crawl and is returned;
//! cells committed before it stay committed and cells after it are not
//! touched. Re-running converges because each cell write is a full replace.

use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, error, info, instrument, warn};

use super::throttle::{RateLimitPolicy, Sleeper, TokioSleeper};
use super::window::SyncWindow;
use crate::client::{MenuProvider, PeriodMenu, PeriodResolver};
use crate::config::{MenuSyncConfig, WindowConfig};
use crate::database::CacheStore;
use crate::error::Result;
use crate::models::{Building, CacheCell, Location, Period};

/// What a run is asked to do
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub site_id: String,
    /// Location names to keep; `None` scrapes every location
    pub halls: Option<Vec<String>>,
    pub window: WindowConfig,
    pub rate_limit: RateLimitPolicy,
}

impl SyncOptions {
    pub fn from_config(config: &MenuSyncConfig) -> Self {
        Self {
            site_id: config.site_id.clone(),
            halls: config.hall_filter().map(<[String]>::to_vec),
            window: config.window,
            rate_limit: config.rate_limit_policy(),
        }
    }
}

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub locations: usize,
    pub days: usize,
    /// Cells whose transaction committed
    pub cells_synced: usize,
    /// Cells whose period the provider did not offer
    pub cells_not_offered: usize,
    pub meals_inserted: u64,
    pub rows_replaced: u64,
    pub rows_pruned: u64,
}

pub struct CacheSynchronizer<P, S = TokioSleeper> {
    provider: P,
    store: CacheStore,
    sleeper: S,
    options: SyncOptions,
}

impl<P: MenuProvider> CacheSynchronizer<P, TokioSleeper> {
    pub fn new(provider: P, store: CacheStore, options: SyncOptions) -> Self {
        Self::with_sleeper(provider, store, options, TokioSleeper)
    }
}

impl<P: MenuProvider, S: Sleeper> CacheSynchronizer<P, S> {
    pub fn with_sleeper(provider: P, store: CacheStore, options: SyncOptions, sleeper: S) -> Self {
        Self {
            provider,
            store,
            sleeper,
            options,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Synchronize the window around the local date
    pub async fn run(&self) -> Result<SyncReport> {
        self.run_for(Local::now().date_naive()).await
    }

    /// Synchronize the window around `today`
    #[instrument(skip(self), fields(site_id = %self.options.site_id))]
    pub async fn run_for(&self, today: NaiveDate) -> Result<SyncReport> {
        let window = SyncWindow::from_config(today, &self.options.window);
        let days = window.days();

        info!(
            back_days = self.options.window.back_days,
            forward_days = self.options.window.forward_days,
            start = %window.start,
            end = %window.end,
            "Starting menu sync"
        );

        let buildings = self.provider.list_buildings(&self.options.site_id).await?;
        let locations = select_locations(&buildings, self.options.halls.as_deref());
        if locations.is_empty() {
            warn!(
                buildings = buildings.len(),
                "No provider locations matched the configured halls"
            );
        }

        let mut report = SyncReport {
            locations: locations.len(),
            days: days.len(),
            ..SyncReport::default()
        };

        report.rows_pruned = self.store.prune_before(window.start).await?;

        let resolver = PeriodResolver::new(&self.provider);
        let total_cells = locations.len() * Period::ALL.len() * days.len();
        let mut processed = 0;

        for location in &locations {
            for period in Period::ALL {
                for day in &days {
                    let cell = CacheCell::new(*day, location.id.clone(), period);

                    if let Err(e) = self.sync_cell(&resolver, &cell, &mut report).await {
                        error!(
                            cell = %cell,
                            location_name = %location.name,
                            cells_synced = report.cells_synced,
                            error = %e,
                            "Menu sync aborted"
                        );
                        return Err(e);
                    }

                    processed += 1;
                    if processed < total_cells {
                        self.sleeper.sleep(self.options.rate_limit.next_delay()).await;
                    }
                }
            }
        }

        info!(
            locations = report.locations,
            cells_synced = report.cells_synced,
            cells_not_offered = report.cells_not_offered,
            meals_inserted = report.meals_inserted,
            rows_pruned = report.rows_pruned,
            "Menu sync complete"
        );
        Ok(report)
    }

    async fn sync_cell(
        &self,
        resolver: &PeriodResolver<'_, P>,
        cell: &CacheCell,
        report: &mut SyncReport,
    ) -> Result<()> {
        let menu = resolver
            .menu_for(&cell.location, cell.period, cell.day)
            .await?;
        if !menu.is_offered() {
            report.cells_not_offered += 1;
        }

        let write = self.store.replace_cell(cell, menu.meals()).await?;

        report.cells_synced += 1;
        report.meals_inserted += write.inserted;
        report.rows_replaced += write.deleted;

        debug!(
            cell = %cell,
            offered = matches!(menu, PeriodMenu::Published(_)),
            inserted = write.inserted,
            deleted = write.deleted,
            "Synced cell"
        );
        Ok(())
    }
}

/// Locations to scrape, in catalog order.
///
/// With an allow-list, a location is kept when its name matches an entry
/// ignoring case and surrounding whitespace. A location listed under more
/// than one building is kept once.
pub fn select_locations(buildings: &[Building], halls: Option<&[String]>) -> Vec<Location> {
    let wanted: Option<HashSet<String>> =
        halls.map(|names| names.iter().map(|n| n.trim().to_lowercase()).collect());

    let mut seen = HashSet::new();
    buildings
        .iter()
        .flat_map(|b| b.locations.iter())
        .filter(|l| match &wanted {
            Some(names) => names.contains(&l.name.trim().to_lowercase()),
            None => true,
        })
        .filter(|l| seen.insert(l.id.clone()))
        .cloned()
        .collect()
}
