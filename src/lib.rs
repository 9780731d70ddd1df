#![forbid(unsafe_code)]

//! Client for the [updown.io](https://updown.io) monitoring service.
//!
//! Two loosely coupled pieces:
//!
//! - [`Client`] — typed accessors for the read side of the REST API
//!   (checks, downtimes, metrics, monitoring nodes, recipients, status
//!   pages), authenticated with an API key.
//! - [`parse_webhook`] — decoder for the JSON arrays updown.io POSTs to
//!   webhook recipients, turning each element into a typed
//!   [`WebhookEvent`] based on its `event` tag.

pub mod client;
pub mod date;
pub mod error;
pub mod types;
pub mod webhook;

pub use client::{Client, MetricsOptions, DEFAULT_API_URL};
pub use date::Timestamp;
pub use error::Error;
pub use types::{
    ApdexSample, Cert, Check, Downtime, DowntimeCheck, DowntimeRequest, DowntimeResponse, Metrics,
    Node, PerformanceMetrics, Recipient, RequestStats, ResponseTimeStats, SslAlert, SslRenewal,
    SslStatus, StatusPage, TimingStats,
};
pub use webhook::{
    parse_webhook, DowntimeEvent, EventKind, PerformanceDropEvent, SslEvent, SslRenewedEvent,
    WebhookEvent,
};
