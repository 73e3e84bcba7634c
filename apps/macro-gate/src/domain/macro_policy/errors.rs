//! Macro policy errors.

use thiserror::Error;

/// Invalid policy table. Raised only while building a `PolicyConfig`; a
/// built policy never fails a lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// A policy number is NaN or infinite.
    #[error("policy value {field} must be finite, got {value}")]
    NonFinite {
        /// Offending field path.
        field: String,
        /// Offending value.
        value: f64,
    },

    /// A cap or multiplier is below zero.
    #[error("policy value {field} must be non-negative, got {value}")]
    Negative {
        /// Offending field path.
        field: String,
        /// Offending value.
        value: f64,
    },

    /// The correlation threshold lies outside [-1, 1].
    #[error("correlation threshold must lie in [-1, 1], got {0}")]
    ThresholdOutOfRange(f64),
}

impl PolicyError {
    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NonFinite { .. } => "POLICY_NON_FINITE",
            Self::Negative { .. } => "POLICY_NEGATIVE",
            Self::ThresholdOutOfRange(_) => "POLICY_THRESHOLD_OUT_OF_RANGE",
        }
    }
}
