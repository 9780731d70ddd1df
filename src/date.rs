//! Fixed-format timestamps as the API transmits them.
//!
//! Every date field in API responses and webhook payloads is either a
//! string matching `YYYY-MM-DDTHH:MM:SSZ` (UTC, second precision, literal
//! `Z`) or `null` meaning "not set". This is a stricter rule than general
//! ISO-8601: offsets and fractional seconds are rejected. Outbound query
//! parameters use a different, offset-aware format; see
//! [`crate::client::MetricsOptions`].

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Wire format for inbound timestamps.
pub(crate) const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// An instant that may be unset.
///
/// `null` on the wire decodes to the unset state, distinguishable from any
/// real instant via [`Timestamp::is_set`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
    /// The underlying instant, or `None` when the field was `null` or absent.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Whether the wire carried a real instant.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Seconds since the Unix epoch; 0 when unset.
    pub fn unix(&self) -> i64 {
        self.0.map(|dt| dt.timestamp()).unwrap_or(0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(Some(dt))
    }
}

/// Parses a timestamp string in the strict API format.
///
/// Trailing input is an error, so `2023-03-12T02:00:00Z01` and friends are
/// rejected along with wrong delimiters, offsets, and sub-second precision.
pub(crate) fn parse_api_time(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, API_TIME_FORMAT).map(|dt| dt.and_utc())
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self(None)),
            Some(raw) => parse_api_time(&raw)
                .map(|dt| Self(Some(dt)))
                .map_err(serde::de::Error::custom),
        }
    }
}
