//! Error taxonomy for the analytics core.
//!
//! Numeric degeneracies (zero-range candles, zero-volume windows, flat
//! series) are absorbed by documented fallbacks inside the indicator layer
//! and never appear here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// The series is shorter than the operation's minimum window.
    /// Recoverable: wait for more candles or treat the output as void.
    #[error("{operation} needs at least {required} candles, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    /// Caller bug: non-positive price, NEUTRAL direction for risk, malformed
    /// series, out-of-range oracle value. Not retryable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AnalyticsError {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    pub(crate) fn insufficient(operation: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            operation,
            required,
            actual,
        }
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = AnalyticsError::insufficient("regime classification", 50, 12);
        assert_eq!(
            err.to_string(),
            "regime classification needs at least 50 candles, got 12"
        );
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn invalid_input_is_not_insufficient() {
        assert!(!AnalyticsError::InvalidInput("x".into()).is_insufficient_data());
    }
}
