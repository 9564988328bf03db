//! Duration parsing errors.

use thiserror::Error;

/// Usage hint appended to every format error.
pub const FORMAT_HINT: &str = "Example: 1h30m, 2d, 45m";

/// Errors returned by [`parse_duration`](crate::parse_duration).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The input produced no positive, representable number of seconds.
    #[error("Invalid time format. Example: 1h30m, 2d, 45m")]
    InvalidFormat {
        /// The trimmed input that was rejected.
        input: String,
    },
}

impl DurationError {
    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::InvalidFormat { input } => input,
        }
    }
}
