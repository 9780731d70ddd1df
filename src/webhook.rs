//! Webhook payload decoder.
//!
//! updown.io delivers notifications as a JSON array where each element's
//! shape depends on its `event` tag. The shape to decode into is therefore
//! data-dependent, so [`parse_webhook`] makes two passes over the input:
//! a lightweight pass that reads only the tag of each element, then a
//! second pass that materializes each recognized element into the concrete
//! payload for its tag. Elements with unrecognized tags are dropped
//! silently; a recognized element with an invalid body fails the whole
//! call, so a decode never returns partial results.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use tracing::debug;

use crate::date::Timestamp;
use crate::error::Error;
use crate::types::{Check, Downtime, PerformanceMetrics, SslAlert, SslRenewal};

/// The closed set of webhook event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `check.down` — a check went down (after confirmation).
    Down,
    /// `check.up` — a check recovered.
    Up,
    /// `check.ssl_invalid` — the served certificate is considered invalid.
    SslInvalid,
    /// `check.ssl_valid` — the certificate is valid again.
    SslValid,
    /// `check.ssl_expiration` — the certificate approaches its expiration date.
    SslExpiration,
    /// `check.ssl_renewed` — the certificate was renewed close to expiration.
    SslRenewed,
    /// `check.performance_drop` — apdex dropped sharply below recent levels.
    PerformanceDrop,
}

impl EventKind {
    /// Maps a wire tag to its kind; `None` for tags outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "check.down" => Some(Self::Down),
            "check.up" => Some(Self::Up),
            "check.ssl_invalid" => Some(Self::SslInvalid),
            "check.ssl_valid" => Some(Self::SslValid),
            "check.ssl_expiration" => Some(Self::SslExpiration),
            "check.ssl_renewed" => Some(Self::SslRenewed),
            "check.performance_drop" => Some(Self::PerformanceDrop),
            _ => None,
        }
    }

    /// The wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "check.down",
            Self::Up => "check.up",
            Self::SslInvalid => "check.ssl_invalid",
            Self::SslValid => "check.ssl_valid",
            Self::SslExpiration => "check.ssl_expiration",
            Self::SslRenewed => "check.ssl_renewed",
            Self::PerformanceDrop => "check.performance_drop",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `check.down` and `check.up` notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct DowntimeEvent {
    #[serde(default)]
    pub time: Timestamp,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub check: Check,
    pub downtime: Downtime,
}

/// Body of `check.ssl_invalid`, `check.ssl_valid` and
/// `check.ssl_expiration` notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct SslEvent {
    #[serde(default)]
    pub time: Timestamp,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub check: Check,
    pub ssl: SslAlert,
}

/// Body of `check.ssl_renewed` notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct SslRenewedEvent {
    #[serde(default)]
    pub time: Timestamp,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub check: Check,
    pub ssl: SslRenewal,
}

/// Body of `check.performance_drop` notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceDropEvent {
    #[serde(default)]
    pub time: Timestamp,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub check: Check,
    /// Human-readable drop percentage, e.g. `"47%"`.
    #[serde(default)]
    pub apdex_dropped: String,
    /// Recent apdex series, sorted ascending by time.
    #[serde(default)]
    pub last_metrics: PerformanceMetrics,
}

/// One decoded webhook notification, tagged by its event kind.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    /// A check went down; carries the opening downtime record.
    Down(DowntimeEvent),
    /// A check recovered; carries the closed downtime record.
    Up(DowntimeEvent),
    /// The served certificate is considered invalid.
    SslInvalid(SslEvent),
    /// The certificate is valid again.
    SslValid(SslEvent),
    /// The certificate approaches its expiration date.
    SslExpiration(SslEvent),
    /// The certificate was renewed; carries the old and new certificates.
    SslRenewed(SslRenewedEvent),
    /// Apdex dropped sharply; carries the recent apdex series.
    PerformanceDrop(PerformanceDropEvent),
}

impl WebhookEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Down(_) => EventKind::Down,
            Self::Up(_) => EventKind::Up,
            Self::SslInvalid(_) => EventKind::SslInvalid,
            Self::SslValid(_) => EventKind::SslValid,
            Self::SslExpiration(_) => EventKind::SslExpiration,
            Self::SslRenewed(_) => EventKind::SslRenewed,
            Self::PerformanceDrop(_) => EventKind::PerformanceDrop,
        }
    }

    /// Notification time common to all kinds.
    pub fn time(&self) -> Timestamp {
        match self {
            Self::Down(ev) | Self::Up(ev) => ev.time,
            Self::SslInvalid(ev) | Self::SslValid(ev) | Self::SslExpiration(ev) => ev.time,
            Self::SslRenewed(ev) => ev.time,
            Self::PerformanceDrop(ev) => ev.time,
        }
    }

    /// Human-readable description common to all kinds.
    pub fn description(&self) -> &str {
        match self {
            Self::Down(ev) | Self::Up(ev) => &ev.description,
            Self::SslInvalid(ev) | Self::SslValid(ev) | Self::SslExpiration(ev) => &ev.description,
            Self::SslRenewed(ev) => &ev.description,
            Self::PerformanceDrop(ev) => &ev.description,
        }
    }

    /// The check the notification refers to.
    pub fn check(&self) -> &Check {
        match self {
            Self::Down(ev) | Self::Up(ev) => &ev.check,
            Self::SslInvalid(ev) | Self::SslValid(ev) | Self::SslExpiration(ev) => &ev.check,
            Self::SslRenewed(ev) => &ev.check,
            Self::PerformanceDrop(ev) => &ev.check,
        }
    }
}

/// Tag-only view of an element, for the first pass.
#[derive(Deserialize)]
struct TagProbe {
    #[serde(default)]
    event: String,
}

/// Decodes a webhook payload into typed events, in input order.
///
/// Elements whose `event` tag is outside the closed set contribute nothing
/// to the output, so the result can be shorter than the input array. A
/// syntactically invalid payload, or a recognized element whose body fails
/// to decode, yields [`Error::MalformedPayload`].
pub fn parse_webhook(data: &[u8]) -> Result<Vec<WebhookEvent>, Error> {
    // First pass: discriminators only. This is also where array-level
    // syntax errors surface.
    let tags: Vec<TagProbe> = serde_json::from_slice(data).map_err(Error::MalformedPayload)?;

    // Second pass: keep each element as raw JSON so that only recognized
    // elements get materialized into a concrete shape.
    let elements: Vec<&RawValue> =
        serde_json::from_slice(data).map_err(Error::MalformedPayload)?;

    let mut events = Vec::with_capacity(tags.len());

    for (probe, raw) in tags.iter().zip(elements.iter()) {
        let Some(kind) = EventKind::from_tag(&probe.event) else {
            debug!(tag = %probe.event, "dropping webhook element with unrecognized event tag");
            continue;
        };

        let event = match kind {
            EventKind::Down => WebhookEvent::Down(decode_element(raw)?),
            EventKind::Up => WebhookEvent::Up(decode_element(raw)?),
            EventKind::SslInvalid => WebhookEvent::SslInvalid(decode_element(raw)?),
            EventKind::SslValid => WebhookEvent::SslValid(decode_element(raw)?),
            EventKind::SslExpiration => WebhookEvent::SslExpiration(decode_element(raw)?),
            EventKind::SslRenewed => WebhookEvent::SslRenewed(decode_element(raw)?),
            EventKind::PerformanceDrop => WebhookEvent::PerformanceDrop(decode_element(raw)?),
        };

        events.push(event);
    }

    Ok(events)
}

fn decode_element<T: DeserializeOwned>(raw: &RawValue) -> Result<T, Error> {
    serde_json::from_str(raw.get()).map_err(Error::MalformedPayload)
}
