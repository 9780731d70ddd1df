//! Data model for API responses and webhook payload bodies.
//!
//! Field names follow the wire format (lowercase with underscores); the
//! handful of Rust-side renames (`down` → `is_down`, `apdex_t` →
//! `apdex_target`, ...) are declared with `#[serde(rename)]`. Objects can
//! arrive partial — webhooks send `"check": {}` — so structs default every
//! missing field, and scalar fields the API nulls out decode to their
//! default value.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::date::{parse_api_time, Timestamp};

/// Decodes an explicit JSON `null` to the field type's default value.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A monitored check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Check {
    pub token: String,
    pub url: String,
    pub alias: String,
    pub last_status: u16,
    pub uptime: f64,
    #[serde(rename = "down")]
    pub is_down: bool,
    pub down_since: Timestamp,
    pub up_since: Timestamp,
    #[serde(deserialize_with = "null_default")]
    pub error: String,
    /// Check interval in seconds.
    pub period: u32,
    #[serde(rename = "apdex_t")]
    pub apdex_target: f64,
    pub string_match: String,
    #[serde(rename = "enabled")]
    pub is_enabled: bool,
    #[serde(rename = "published")]
    pub is_published: bool,
    pub last_check_at: Timestamp,
    pub next_check_at: Timestamp,
    pub created_at: Timestamp,
    pub mute_until: Timestamp,
    pub favicon_url: String,
    pub http_verb: String,
    pub http_body: String,
    pub recipients: Vec<String>,
    pub disabled_locations: Vec<String>,
    pub custom_headers: HashMap<String, String>,
    pub ssl: Option<SslStatus>,
    /// Only populated when the check was requested with metrics.
    pub metrics: Option<Metrics>,
}

/// Certificate status attached to a check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SslStatus {
    pub tested_at: Timestamp,
    pub expires_at: Timestamp,
    #[serde(rename = "valid")]
    pub is_valid: bool,
    #[serde(deserialize_with = "null_default")]
    pub error: String,
}

/// A recorded interval during which a check was failing.
///
/// `ended_at` is unset while the downtime is ongoing; `duration` is only
/// meaningful once it ended. `down_results`/`up_results` are populated only
/// by the downtime-listing endpoint when detailed results are requested,
/// never by webhook payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Downtime {
    pub id: String,
    pub details_url: String,
    #[serde(deserialize_with = "null_default")]
    pub error: String,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    /// Duration in seconds; 0 until the downtime ended.
    #[serde(deserialize_with = "null_default")]
    pub duration: u64,
    #[serde(rename = "partial", deserialize_with = "null_default")]
    pub is_partial: bool,
    pub down_results: Vec<DowntimeCheck>,
    pub up_results: Vec<DowntimeCheck>,
}

/// One monitoring node's probe around a downtime boundary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DowntimeCheck {
    pub id: String,
    pub status: String,
    pub details_url: String,
    pub request: Option<DowntimeRequest>,
    pub response: Option<DowntimeResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DowntimeRequest {
    pub sent_at: Timestamp,
    pub http_method: String,
    pub http_version: String,
    pub sent_headers: HashMap<String, String>,
    /// Identifier of the node that sent the probe.
    pub node: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DowntimeResponse {
    pub received_at: Timestamp,
    pub final_url: String,
    pub code: u16,
    pub ip: String,
    pub received_headers: HashMap<String, String>,
}

/// Aggregated metrics for a check over a query window.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub uptime: f64,
    pub apdex: f64,
    pub timings: Option<TimingStats>,
    pub requests: Option<RequestStats>,
}

/// Average request phase timings, in milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimingStats {
    pub redirect: u32,
    #[serde(rename = "namelookup")]
    pub name_lookup: u32,
    pub connection: u32,
    pub handshake: u32,
    pub response: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestStats {
    pub samples: u64,
    pub failures: u64,
    pub satisfied: u64,
    pub tolerated: u64,
    pub by_response_time: ResponseTimeStats,
}

/// Response time histogram buckets (cumulative, milliseconds).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponseTimeStats {
    #[serde(rename = "under125")]
    pub under_125: u64,
    #[serde(rename = "under250")]
    pub under_250: u64,
    #[serde(rename = "under500")]
    pub under_500: u64,
    #[serde(rename = "under1000")]
    pub under_1000: u64,
    #[serde(rename = "under2000")]
    pub under_2000: u64,
    #[serde(rename = "under4000")]
    pub under_4000: u64,
    #[serde(rename = "under8000")]
    pub under_8000: u64,
    #[serde(rename = "under16000")]
    pub under_16000: u64,
    #[serde(rename = "under32000")]
    pub under_32000: u64,
}

/// A monitoring node (the servers that run the probes and send webhooks).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Node {
    pub ip: String,
    #[serde(rename = "ip6")]
    pub ipv6: String,
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub lat: f64,
    #[serde(rename = "lng")]
    pub lon: f64,
}

/// An alert recipient / notification channel on the account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Recipient {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub value: String,
}

/// A public or private status page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusPage {
    pub token: String,
    pub url: String,
    pub name: String,
    pub description: String,
    pub visibility: String,
    #[serde(deserialize_with = "null_default")]
    pub access_key: String,
    /// Tokens of the checks shown on the page.
    pub checks: Vec<String>,
}

/// An SSL certificate as reported in webhook payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Cert {
    pub subject: String,
    pub issuer: String,
    pub from: Timestamp,
    pub to: Timestamp,
    pub algorithm: String,
}

/// Certificate state carried by `check.ssl_invalid` / `ssl_valid` /
/// `ssl_expiration` events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SslAlert {
    pub cert: Cert,
    #[serde(deserialize_with = "null_default")]
    pub error: String,
    pub days_before_expiration: u32,
}

/// Certificate pair carried by `check.ssl_renewed` events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SslRenewal {
    pub new_cert: Cert,
    pub old_cert: Cert,
}

/// One apdex measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApdexSample {
    pub time: DateTime<Utc>,
    pub apdex: f64,
}

/// Recent apdex series carried by `check.performance_drop` events.
///
/// The wire format is an unordered JSON object keyed by timestamp strings;
/// decoding materializes it as a series sorted ascending by time. `null` and
/// `{}` both decode to an empty series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceMetrics {
    pub samples: Vec<ApdexSample>,
}

impl<'de> Deserialize<'de> for PerformanceMetrics {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ApdexValue {
            #[serde(default)]
            apdex: f64,
        }

        let raw = Option::<HashMap<String, ApdexValue>>::deserialize(deserializer)?;

        let mut samples = Vec::new();
        for (key, value) in raw.unwrap_or_default() {
            let time = parse_api_time(&key).map_err(serde::de::Error::custom)?;
            samples.push(ApdexSample {
                time,
                apdex: value.apdex,
            });
        }

        // Map iteration order is arbitrary; callers rely on time order.
        samples.sort_by_key(|sample| sample.time);

        Ok(Self { samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn performance_metrics_sorted_ascending() {
        // Keys deliberately out of order.
        let metrics: PerformanceMetrics = serde_json::from_str(
            r#"{
              "2023-03-12T07:00:00Z": { "apdex": 0.51 },
              "2023-03-12T02:00:00Z": { "apdex": 0.975 },
              "2023-03-12T04:00:00Z": { "apdex": 0.98 },
              "2023-03-12T03:00:00Z": { "apdex": 1 },
              "2023-03-12T06:00:00Z": { "apdex": 1 },
              "2023-03-12T05:00:00Z": { "apdex": 1 }
            }"#,
        )
        .unwrap();

        assert_eq!(metrics.samples.len(), 6);
        assert_eq!(metrics.samples[0].apdex, 0.975);
        assert_eq!(metrics.samples[0].time.timestamp(), 1678586400);
        assert_eq!(metrics.samples[5].apdex, 0.51);
        assert_eq!(metrics.samples[5].time.timestamp(), 1678604400);
        assert!(metrics
            .samples
            .windows(2)
            .all(|pair| pair[0].time <= pair[1].time));
    }

    #[test]
    fn performance_metrics_null_and_empty() {
        let metrics: PerformanceMetrics = serde_json::from_str("null").unwrap();
        assert!(metrics.samples.is_empty());

        let metrics: PerformanceMetrics = serde_json::from_str("{}").unwrap();
        assert!(metrics.samples.is_empty());
    }

    #[test]
    fn performance_metrics_rejects_bad_key() {
        // Wrong delimiter between date and time.
        let result = serde_json::from_str::<PerformanceMetrics>(
            r#"{"2023-03-12K02:00:00Z": { "apdex": 0.975 }}"#,
        );
        assert!(result.is_err());

        assert!(serde_json::from_str::<PerformanceMetrics>("ABCD").is_err());
    }

    #[test]
    fn downtime_null_scalars_decode_to_defaults() {
        let downtime: Downtime = serde_json::from_str(
            r#"{
              "id": "67af0c5479903903b4c091b2",
              "details_url": "https://updown.io/downtimes/67af0c5479903903b4c091b2",
              "error": null,
              "started_at": "2025-02-14T09:16:44Z",
              "ended_at": null,
              "duration": null,
              "partial": null
            }"#,
        )
        .unwrap();

        assert_eq!(downtime.error, "");
        assert!(!downtime.ended_at.is_set());
        assert_eq!(downtime.duration, 0);
        assert!(!downtime.is_partial);
        assert!(downtime.down_results.is_empty());
    }

    #[test]
    fn check_decodes_empty_object() {
        let check: Check = serde_json::from_str("{}").unwrap();
        assert_eq!(check.token, "");
        assert!(!check.is_down);
        assert!(check.ssl.is_none());
        assert!(check.metrics.is_none());
    }

    #[test]
    fn status_page_null_access_key() {
        let page: StatusPage = serde_json::from_str(
            r#"{"token": "3ji4k", "visibility": "public", "access_key": null, "checks": ["ngg8"]}"#,
        )
        .unwrap();
        assert_eq!(page.access_key, "");
        assert_eq!(page.checks, vec!["ngg8"]);
    }
}
