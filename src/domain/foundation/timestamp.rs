//! UTC instants as they appear in snapshots, frames and rate-limit headers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point in time, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Whole seconds since the Unix epoch. Values past chrono's range clamp
    /// to the epoch.
    pub fn from_unix_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    /// Whole seconds since the Unix epoch, zero for earlier instants.
    pub fn as_unix_secs(&self) -> u64 {
        u64::try_from(self.0.timestamp()).unwrap_or(0)
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
