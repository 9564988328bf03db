//! Compound duration parser.
//!
//! Inputs are scanned left to right for `<number><unit>` tokens, where the
//! number is a run of ASCII digits with an optional fractional part. Every
//! token is converted to seconds and truncated on its own, so `1.9s` is worth
//! one second no matter what follows it. Characters between tokens are
//! skipped without complaint.

use std::sync::LazyLock;

use regex::Regex;

use crate::{DurationError, DurationUnit};

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)([0-9]+(?:\.[0-9]+)?)([ywdhms])").expect("valid duration token pattern")
});

/// One `<number><unit>` token found in a duration string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationToken {
    /// Numeric magnitude as written.
    pub magnitude: f64,
    /// Unit letter that followed the magnitude.
    pub unit: DurationUnit,
}

impl DurationToken {
    /// Contribution of this token in whole seconds, truncated toward zero.
    ///
    /// Returns `None` when the value cannot be represented as a `u64`.
    #[must_use]
    pub fn seconds(&self) -> Option<u64> {
        let seconds = (self.magnitude * self.unit.seconds() as f64).trunc();
        if !seconds.is_finite() || seconds < 0.0 || seconds >= u64::MAX as f64 {
            return None;
        }
        Some(seconds as u64)
    }
}

/// Iterates over the tokens recognised in `input`.
///
/// Leading and trailing whitespace is ignored. Unrecognised characters are
/// skipped.
pub fn tokens(input: &str) -> impl Iterator<Item = DurationToken> + '_ {
    TOKEN_PATTERN.captures_iter(input.trim()).filter_map(|caps| {
        let magnitude = caps.get(1)?.as_str().parse::<f64>().ok()?;
        let unit = caps.get(2)?.as_str().chars().next().and_then(DurationUnit::from_char)?;
        Some(DurationToken { magnitude, unit })
    })
}

/// Parses a compound duration such as `1h30m` or `2w3d` into whole seconds.
///
/// # Errors
///
/// Returns [`DurationError::InvalidFormat`] when no token is recognised, when
/// the total is zero, or when the total does not fit in a `u64`.
pub fn parse_duration(input: &str) -> Result<u64, DurationError> {
    let trimmed = input.trim();
    let invalid = || DurationError::InvalidFormat { input: trimmed.to_string() };

    let mut total: u64 = 0;
    for token in tokens(trimmed) {
        let seconds = token.seconds().ok_or_else(invalid)?;
        total = total.checked_add(seconds).ok_or_else(invalid)?;
    }

    if total == 0 {
        return Err(invalid());
    }
    Ok(total)
}

/// Parses a duration given as separate command-line words.
///
/// Words are concatenated without a separator before parsing, so
/// `["1h", "30m"]` is read as `1h30m`.
///
/// # Errors
///
/// See [`parse_duration`].
pub fn parse_duration_args<S: AsRef<str>>(words: &[S]) -> Result<u64, DurationError> {
    let joined: String = words.iter().map(AsRef::as_ref).collect();
    parse_duration(&joined)
}
