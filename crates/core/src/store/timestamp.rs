//! Timestamp normalization at the store boundary.
//!
//! Date fields arrive in whichever representation the document was written
//! with: an RFC 3339 string, or the store's epoch map (`seconds`/`nanos`).
//! `DocTimestamp` captures the union once so transforms never re-inspect
//! the raw shape.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;

use crate::Error;

/// A date field as it may appear in a stored document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DocTimestamp {
    /// RFC 3339 string, e.g. `"2021-01-01T00:00:00Z"`.
    Rfc3339(String),
    /// Store-native epoch map, e.g. `{"seconds": 1609459200, "nanos": 0}`.
    Epoch {
        seconds: i64,
        #[serde(default)]
        nanos: u32,
    },
}

impl DocTimestamp {
    /// Convert to a UTC instant.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, Error> {
        match self {
            Self::Rfc3339(text) => DateTime::parse_from_rfc3339(text)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|e| Error::Timestamp(format!("{text}: {e}"))),
            Self::Epoch { seconds, nanos } => Utc
                .timestamp_opt(*seconds, *nanos)
                .single()
                .ok_or_else(|| Error::Timestamp(format!("epoch {seconds}s {nanos}ns out of range"))),
        }
    }

    /// Normalized RFC 3339 rendering (UTC, second precision).
    pub fn to_rfc3339(&self) -> Result<String, Error> {
        Ok(self.to_utc()?.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}
