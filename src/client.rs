//! Typed accessors for the read side of the updown.io REST API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use reqwest::header;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::types::{Check, Downtime, Metrics, Node, Recipient, StatusPage};

/// Base URL of the public updown.io API.
pub const DEFAULT_API_URL: &str = "https://updown.io/api";

const DEFAULT_USER_AGENT: &str = concat!("updown-rs/", env!("CARGO_PKG_VERSION"));

/// Outbound format for `from`/`to` date-range query parameters. Offset-aware
/// on purpose; inbound dates follow the stricter rule in [`crate::date`].
const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// The downtime endpoint serves fixed pages of 100 records.
const DOWNTIME_PAGE_SIZE: usize = 100;

/// Hard cap on pages fetched per downtime listing, as a bound against
/// runaway pagination.
const DOWNTIME_MAX_PAGES: u32 = 99;

/// Options for [`Client::metrics`].
#[derive(Debug, Clone, Default)]
pub struct MetricsOptions {
    /// Start of the query window.
    pub from: Option<DateTime<Utc>>,
    /// End of the query window.
    pub to: Option<DateTime<Utc>>,
    /// Grouping dimension, e.g. `"host"` or `"time"`.
    pub group_by: Option<String>,
}

impl MetricsOptions {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(group) = self.group_by.as_deref() {
            if !group.is_empty() {
                query.push(("group", group.to_string()));
            }
        }

        if let Some(from) = self.from {
            query.push(("from", from.format(QUERY_TIME_FORMAT).to_string()));
        }

        if let Some(to) = self.to {
            query.push(("to", to.format(QUERY_TIME_FORMAT).to_string()));
        }

        query
    }
}

/// updown.io API client.
///
/// Every accessor sends exactly one GET request (the downtime listing sends
/// one per page), authenticated with the `X-API-Key` header, and decodes
/// the JSON response into its typed result. There are no retries and no
/// caching. The call counter is best-effort: it is kept with relaxed
/// atomics and exact counts are not guaranteed if one client is shared
/// across concurrent callers.
#[derive(Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    user_agent: String,
    calls: AtomicU64,
}

impl Client {
    /// Creates a client for the public API.
    ///
    /// Fails with [`Error::EmptyApiKey`] when the key is empty; no client
    /// value is produced in that case.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::EmptyApiKey);
        }

        let http = reqwest::Client::builder()
            .gzip(true)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            http,
            base_url: DEFAULT_API_URL.to_string(),
            api_key,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            calls: AtomicU64::new(0),
        })
    }

    /// Points the client at a different base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the underlying HTTP client, keeping everything else.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Sets the outbound `User-Agent` to `app/version` plus the library
    /// identifier. Empty arguments restore the default identifier.
    pub fn set_user_agent(&mut self, app: &str, version: &str) {
        if app.is_empty() || version.is_empty() {
            self.user_agent = DEFAULT_USER_AGENT.to_string();
        } else {
            self.user_agent = format!("{app}/{version} ({DEFAULT_USER_AGENT})");
        }
    }

    /// Total number of API requests sent by this client.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// All checks on the account.
    ///
    /// `GET /checks`
    pub async fn checks(&self) -> Result<Vec<Check>, Error> {
        self.get_json("/checks", &[]).await
    }

    /// A single check. With `with_metrics`, the response embeds the
    /// check's aggregated metrics.
    ///
    /// `GET /checks/:token`
    pub async fn check(&self, token: &str, with_metrics: bool) -> Result<Check, Error> {
        require_token(token)?;

        let mut query = Vec::new();
        if with_metrics {
            query.push(("metrics", "true".to_string()));
        }

        self.get_json(&format!("/checks/{token}"), &query).await
    }

    /// All downtimes of a check, newest first as served by the API. With
    /// `detailed`, each downtime embeds per-node probe results.
    ///
    /// Pages of 100 are fetched until a short page, capped at 99 pages as
    /// a bound against runaway pagination.
    ///
    /// `GET /checks/:token/downtimes`
    pub async fn downtimes(&self, token: &str, detailed: bool) -> Result<Vec<Downtime>, Error> {
        require_token(token)?;

        let endpoint = format!("/checks/{token}/downtimes");
        let mut result = Vec::new();

        for page in 1..=DOWNTIME_MAX_PAGES {
            let mut query = vec![("page", page.to_string())];
            if detailed {
                query.push(("results", "true".to_string()));
            }

            let mut downtimes: Vec<Downtime> = self.get_json(&endpoint, &query).await?;
            let full_page = downtimes.len() == DOWNTIME_PAGE_SIZE;
            result.append(&mut downtimes);

            if !full_page {
                break;
            }
        }

        Ok(result)
    }

    /// Aggregated metrics for a check over the window in `options`.
    ///
    /// `GET /checks/:token/metrics`
    pub async fn metrics(&self, token: &str, options: &MetricsOptions) -> Result<Metrics, Error> {
        require_token(token)?;
        self.get_json(&format!("/checks/{token}/metrics"), &options.to_query())
            .await
    }

    /// All monitoring nodes, keyed by node identifier.
    ///
    /// `GET /nodes`
    pub async fn nodes(&self) -> Result<HashMap<String, Node>, Error> {
        self.get_json("/nodes", &[]).await
    }

    /// Addresses of all monitoring nodes, both families interleaved.
    ///
    /// `GET /nodes/ips`
    pub async fn node_ips(&self) -> Result<Vec<String>, Error> {
        self.get_json("/nodes/ips", &[]).await
    }

    /// IPv4 addresses of all monitoring nodes.
    ///
    /// `GET /nodes/ipv4`
    pub async fn node_ips_v4(&self) -> Result<Vec<String>, Error> {
        self.get_json("/nodes/ipv4", &[]).await
    }

    /// IPv6 addresses of all monitoring nodes.
    ///
    /// `GET /nodes/ipv6`
    pub async fn node_ips_v6(&self) -> Result<Vec<String>, Error> {
        self.get_json("/nodes/ipv6", &[]).await
    }

    /// All alert recipients / notification channels on the account.
    ///
    /// `GET /recipients`
    pub async fn recipients(&self) -> Result<Vec<Recipient>, Error> {
        self.get_json("/recipients", &[]).await
    }

    /// All status pages on the account.
    ///
    /// `GET /status-pages`
    pub async fn status_pages(&self) -> Result<Vec<StatusPage>, Error> {
        self.get_json("/status-pages", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "sending API request");

        let mut request = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.user_agent)
            .header("X-API-Key", &self.api_key);

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(Error::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(Error::Transport)?;
        serde_json::from_slice(&body).map_err(Error::Decode)
    }
}

fn require_token(token: &str) -> Result<(), Error> {
    if token.is_empty() {
        Err(Error::EmptyToken)
    } else {
        Ok(())
    }
}
