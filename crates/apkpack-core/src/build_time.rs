//! The single timestamp stamped on every archive entry.
//!
//! Honors [`SOURCE_DATE_EPOCH`](https://reproducible-builds.org/specs/source-date-epoch/)
//! so that two builds of the same tree produce identical bytes.

use chrono::{DateTime, Utc};

use crate::error::{PackError, Result};

/// Environment variable overriding the build time.
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

/// A whole-second build timestamp at or after the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BuildTime(DateTime<Utc>);

impl BuildTime {
    /// Build time from Unix seconds.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidTimestamp`] for values chrono cannot
    /// represent.
    pub fn from_unix(secs: u64) -> Result<Self> {
        i64::try_from(secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(Self)
            .ok_or_else(|| PackError::InvalidTimestamp(secs.to_string()))
    }

    /// The current time, truncated to whole seconds.
    pub fn now() -> Self {
        let now = Utc::now();
        Self(DateTime::from_timestamp(now.timestamp().max(0), 0).unwrap_or(DateTime::UNIX_EPOCH))
    }

    /// Parse a `SOURCE_DATE_EPOCH` value. `None` or an empty string means now.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidTimestamp`] if the value is not a
    /// non-negative integer.
    pub fn from_source_date_epoch(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::now()),
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|_| PackError::InvalidTimestamp(raw.to_string()))?;
                Self::from_unix(secs)
            }
        }
    }

    /// Read `SOURCE_DATE_EPOCH` from the process environment.
    ///
    /// # Errors
    ///
    /// See [`BuildTime::from_source_date_epoch`].
    pub fn from_env() -> Result<Self> {
        Self::from_source_date_epoch(std::env::var(SOURCE_DATE_EPOCH).ok().as_deref())
    }

    /// Seconds since the Unix epoch, as stored in tar headers.
    pub fn unix_secs(&self) -> u64 {
        self.0.timestamp() as u64
    }

    /// Milliseconds since the Unix epoch, as written to `builddate`.
    pub fn unix_millis(&self) -> u64 {
        self.0.timestamp_millis() as u64
    }
}

impl std::fmt::Display for BuildTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
