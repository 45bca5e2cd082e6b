//! Error types.
//!
//! Short input, non-finite values inside a window and negative variance from
//! round-off are not errors: they surface as `None` positions or a clamped zero.
//! Everything here is a caller mistake detected before any computation runs.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Window/period of zero (or otherwise unusable).
    #[error("invalid window {window}: {reason}")]
    InvalidWindow { window: usize, reason: &'static str },

    /// Deviation multiplier that is negative or not finite.
    #[error("invalid multiplier {name}={value}: must be finite and >= 0")]
    InvalidMultiplier { name: &'static str, value: f64 },

    /// Series that must be index-aligned have different lengths.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Bar timestamp not strictly greater than its predecessor.
    #[error("bar {index} is not strictly after bar {}", .index - 1)]
    UnorderedTimestamps { index: usize },

    /// Bar with a NaN or infinite OHLC field.
    #[error("bar {index} has a non-finite price")]
    NonFiniteBar { index: usize },

    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejects a zero window.
pub(crate) fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(Error::InvalidWindow {
            window,
            reason: "window must be at least 1",
        });
    }
    Ok(())
}

/// Rejects negative or non-finite band multipliers.
pub(crate) fn check_multiplier(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidMultiplier { name, value });
    }
    Ok(())
}

/// Rejects `actual` when it differs from `expected`.
pub(crate) fn check_aligned(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::LengthMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_window_message() {
        let err = check_window(0).unwrap_err();
        assert_eq!(err.to_string(), "invalid window 0: window must be at least 1");
        assert!(check_window(1).is_ok());
    }

    #[test]
    fn test_invalid_multiplier() {
        assert!(check_multiplier("dev_up", 0.0).is_ok());
        assert!(check_multiplier("dev_up", 2.5).is_ok());
        assert_eq!(
            check_multiplier("dev_down", -1.0),
            Err(Error::InvalidMultiplier { name: "dev_down", value: -1.0 })
        );
        assert!(check_multiplier("dev_up", f64::NAN).is_err());
        assert!(check_multiplier("dev_up", f64::INFINITY).is_err());
    }

    #[test]
    fn test_unordered_message() {
        let err = Error::UnorderedTimestamps { index: 4 };
        assert_eq!(err.to_string(), "bar 4 is not strictly after bar 3");
    }

    #[test]
    fn test_length_mismatch() {
        assert!(check_aligned(3, 3).is_ok());
        assert_eq!(
            check_aligned(3, 2),
            Err(Error::LengthMismatch { expected: 3, actual: 2 })
        );
    }
}
