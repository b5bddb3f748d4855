//! Policy domain errors
//!
//! Coverage decisions themselves never fail; these errors come from loading
//! and validating policies, from the policy store, and from the model-backed
//! coverage path.

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the policy domain
#[derive(Debug, Error)]
pub enum PolicyError {
    /// An extra-info rule condition could not be parsed
    #[error("Invalid rule condition '{condition}': {reason}")]
    InvalidCondition {
        condition: String,
        reason: String,
    },

    /// A rule names evidence outside the fixed vocabulary
    #[error("Unknown evidence key: {0}")]
    UnknownEvidenceKey(String),

    /// A monetary amount that must be non-negative was negative
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount {
        field: String,
        value: Decimal,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Seed document could not be parsed
    #[error("Invalid policy document: {0}")]
    Document(#[from] serde_json::Error),

    /// Seed file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Policy store failure
    #[error("Policy store error: {0}")]
    Store(#[from] PortError),

    /// Language model call failed or returned something unusable
    #[error("LLM coverage error: {0}")]
    Llm(String),
}

impl PolicyError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PolicyError::Validation(message.into())
    }

    /// Creates an invalid condition error
    pub fn invalid_condition(condition: impl Into<String>, reason: impl Into<String>) -> Self {
        PolicyError::InvalidCondition {
            condition: condition.into(),
            reason: reason.into(),
        }
    }

    /// Creates a negative amount error
    pub fn negative(field: impl Into<String>, value: Decimal) -> Self {
        PolicyError::NegativeAmount {
            field: field.into(),
            value,
        }
    }
}
