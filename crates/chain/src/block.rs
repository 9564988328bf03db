//! Latest-block time reporting.

use chrono::{DateTime, Utc};

/// Number and timestamp of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTime {
    /// Block number.
    pub number: u64,
    /// Block timestamp in seconds since the Unix epoch.
    pub timestamp: u64,
}

impl BlockTime {
    /// Timestamp rendered as an HTTP-style UTC date, e.g.
    /// `Tue, 18 Oct 2026 12:00:00 GMT`.
    ///
    /// Returns `None` when the timestamp is outside chrono's range.
    #[must_use]
    pub fn utc_string(&self) -> Option<String> {
        let secs = i64::try_from(self.timestamp).ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
    }
}

impl std::fmt::Display for BlockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.utc_string() {
            Some(date) => write!(f, "Block datetime: {date} ({})", self.timestamp),
            None => write!(f, "Block datetime: {}", self.timestamp),
        }
    }
}
