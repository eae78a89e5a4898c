//! # Constants
//!
//! Provider endpoints, defaults for the sync window and throttle, and the
//! campus venues the synchronizer scrapes unless configured otherwise.

/// DineOnCampus API details
pub mod provider {
    pub const DEFAULT_BASE_URL: &str = "https://apiv4.dineoncampus.com/";
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

    /// Date format the provider expects in query strings
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    pub const ACCEPT_JSON: &str = "application/json";

    /// Browser user agents. Requests without one are rejected by the
    /// provider's bot protection.
    pub const USER_AGENTS: &[&str] = &[
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:143.0) Gecko/20100101 Firefox/143.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.6; rv:142.0) Gecko/20100101 Firefox/142.0",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.5 Safari/605.1.15",
        "Mozilla/5.0 (X11; Linux x86_64; rv:143.0) Gecko/20100101 Firefox/143.0",
    ];
}

/// Defaults for a synchronization run
pub mod defaults {
    /// University of Minnesota site on DineOnCampus
    pub const SITE_ID: &str = "61d7515eb63f1e0e970debbe";

    pub const BACK_DAYS: u32 = 7;
    pub const FORWARD_DAYS: u32 = 14;

    pub const SLEEP_MIN_SECS: u64 = 5;
    pub const SLEEP_JITTER_SECS: u64 = 10;

    pub const MAX_DB_CONNECTIONS: u32 = 2;

    pub const DINING_HALLS: &[&str] = &[
        "Comstock Dining Hall",
        "17th Ave. Dining Hall",
        "Pioneer Dining Hall",
        "Sanford Dining Hall",
        "Middlebrook Dining Hall",
        "Bailey Dining Hall",
    ];
}

/// Environment variable names
pub mod env {
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const CONFIG_PREFIX: &str = "MENU_SYNC";
    pub const ENVIRONMENT: &str = "MENU_SYNC_ENV";
    pub const LOG_FORMAT: &str = "MENU_SYNC_LOG_FORMAT";
}
