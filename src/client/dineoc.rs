//! # DineOnCampus API Client
//!
//! HTTP client for the public DineOnCampus JSON API. Stateless apart from the
//! connection pool inside `reqwest::Client`.
//!
//! Every request carries `Accept: application/json` and a browser user agent;
//! the provider's bot protection rejects requests without them.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::payloads::{self, FlattenedMenu};
use super::traits::MenuProvider;
use crate::config::ProviderConfig;
use crate::constants::provider::{ACCEPT_JSON, DATE_FORMAT, USER_AGENTS};
use crate::error::{MenuSyncError, Result};
use crate::models::{Building, Menu, PeriodId, PeriodIdSpec};

/// How the `User-Agent` header is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAgentPolicy {
    /// Always send the first agent in the pool
    Fixed,
    /// Pick a random agent from the pool for every request
    Rotating,
}

impl UserAgentPolicy {
    pub fn pick(self) -> &'static str {
        match self {
            UserAgentPolicy::Fixed => USER_AGENTS[0],
            UserAgentPolicy::Rotating => USER_AGENTS[fastrand::usize(..USER_AGENTS.len())],
        }
    }
}

#[derive(Clone)]
pub struct DineocClient {
    client: Client,
    base_url: Url,
    user_agents: UserAgentPolicy,
}

impl std::fmt::Debug for DineocClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DineocClient")
            .field("base_url", &self.base_url.as_str())
            .field("user_agents", &self.user_agents)
            .finish()
    }
}

impl DineocClient {
    /// Create a client; fails on an unusable base URL
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            MenuSyncError::config_error(format!("Invalid provider base URL: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MenuSyncError::config_error(format!(
                "Provider base URL cannot carry a path: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                MenuSyncError::config_error(format!("Failed to create HTTP client: {e}"))
            })?;

        let user_agents = if config.rotate_user_agent {
            UserAgentPolicy::Rotating
        } else {
            UserAgentPolicy::Fixed
        };

        info!(
            base_url = %base_url,
            timeout_ms = config.timeout_ms,
            user_agents = ?user_agents,
            "Created DineOnCampus client"
        );

        Ok(Self {
            client,
            base_url,
            user_agents,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `sites/{siteId}/locations-public?for_menus=true`
    pub fn buildings_url(&self, site_id: &str) -> Url {
        let mut url = self.endpoint(&["sites", site_id, "locations-public"]);
        url.query_pairs_mut().append_pair("for_menus", "true");
        url
    }

    /// `locations/{locationId}/periods/?date=YYYY-MM-DD`
    pub fn periods_url(&self, location_id: &str, date: NaiveDate) -> Url {
        let mut url = self.endpoint(&["locations", location_id, "periods", ""]);
        url.query_pairs_mut()
            .append_pair("date", &date.format(DATE_FORMAT).to_string());
        url
    }

    /// `locations/{locationId}/menu?date=YYYY-MM-DD&period={periodId}`
    pub fn menu_url(&self, location_id: &str, period_id: &PeriodId, date: NaiveDate) -> Url {
        let mut url = self.endpoint(&["locations", location_id, "menu"]);
        url.query_pairs_mut()
            .append_pair("date", &date.format(DATE_FORMAT).to_string())
            .append_pair("period", period_id.as_str());
        url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are always available
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a provider endpoint and return the body of a 2xx response
    async fn get_body(&self, url: &Url) -> Result<String> {
        let user_agent = self.user_agents.pick();
        debug!(url = %url, user_agent = user_agent, "Requesting provider endpoint");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, ACCEPT_JSON)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| MenuSyncError::transport(url.as_str(), &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Provider returned non-success status");
            return Err(MenuSyncError::http_status(url.as_str(), status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| MenuSyncError::transport(url.as_str(), &e))
    }

    fn decode<T>(url: &Url, parsed: serde_json::Result<T>) -> Result<T> {
        parsed.map_err(|source| MenuSyncError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl MenuProvider for DineocClient {
    async fn list_buildings(&self, site_id: &str) -> Result<Vec<Building>> {
        let url = self.buildings_url(site_id);
        let body = self.get_body(&url).await?;
        let buildings = Self::decode(&url, payloads::parse_buildings(&body))?;

        debug!(site_id = site_id, buildings = buildings.len(), "Fetched building catalog");
        Ok(buildings)
    }

    async fn list_period_ids(&self, location_id: &str, date: NaiveDate) -> Result<PeriodIdSpec> {
        let url = self.periods_url(location_id, date);
        let body = self.get_body(&url).await?;
        let spec = Self::decode(&url, payloads::parse_period_ids(&body))?;

        debug!(
            location_id = location_id,
            date = %date,
            offered = ?spec.offered(),
            "Fetched period identifiers"
        );
        Ok(spec)
    }

    async fn fetch_period_menu(
        &self,
        location_id: &str,
        period_id: &PeriodId,
        date: NaiveDate,
    ) -> Result<Menu> {
        let url = self.menu_url(location_id, period_id, date);
        let body = self.get_body(&url).await?;
        let FlattenedMenu { period_name, meals } = Self::decode(&url, payloads::parse_menu(&body))?;

        debug!(
            location_id = location_id,
            date = %date,
            period_name = %period_name,
            meals = meals.len(),
            "Fetched menu"
        );
        Ok(Menu {
            date,
            period_name,
            options: meals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::provider::DEFAULT_BASE_URL;

    fn client(base_url: &str) -> DineocClient {
        DineocClient::new(&ProviderConfig {
            base_url: base_url.to_string(),
            timeout_ms: 1_000,
            rotate_user_agent: false,
        })
        .unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_buildings_url() {
        let url = client(DEFAULT_BASE_URL).buildings_url("SITE1");
        assert_eq!(
            url.as_str(),
            "https://apiv4.dineoncampus.com/sites/SITE1/locations-public?for_menus=true"
        );
    }

    #[test]
    fn test_periods_url_keeps_trailing_slash() {
        let url = client(DEFAULT_BASE_URL).periods_url("L1", date());
        assert_eq!(
            url.as_str(),
            "https://apiv4.dineoncampus.com/locations/L1/periods/?date=2024-03-01"
        );
    }

    #[test]
    fn test_menu_url() {
        let url = client(DEFAULT_BASE_URL).menu_url("L1", &PeriodId::new("p1"), date());
        assert_eq!(
            url.as_str(),
            "https://apiv4.dineoncampus.com/locations/L1/menu?date=2024-03-01&period=p1"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let url = client("http://localhost:9000/proxy/").menu_url("L1", &PeriodId::new("p1"), date());
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/proxy/locations/L1/menu?date=2024-03-01&period=p1"
        );
    }

    #[test]
    fn test_ids_are_escaped() {
        let url = client(DEFAULT_BASE_URL).periods_url("a/b c", date());
        assert!(url.path().contains("a%2Fb%20c"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = DineocClient::new(&ProviderConfig {
            base_url: "mailto:menus@example.com".to_string(),
            timeout_ms: 1_000,
            rotate_user_agent: false,
        });
        assert!(matches!(result, Err(MenuSyncError::Config(_))));
    }

    #[test]
    fn test_user_agent_policy() {
        assert_eq!(UserAgentPolicy::Fixed.pick(), USER_AGENTS[0]);
        for _ in 0..50 {
            let agent = UserAgentPolicy::Rotating.pick();
            assert!(USER_AGENTS.contains(&agent));
            assert!(agent.starts_with("Mozilla/5.0"));
        }
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = client("http://127.0.0.1:9/");
        let err = client.list_buildings("SITE1").await.unwrap_err();
        assert!(matches!(err, MenuSyncError::Network { status: None, .. }));
        assert!(err.is_recoverable());
    }
}
