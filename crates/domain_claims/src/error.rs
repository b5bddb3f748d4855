//! Claims domain errors

use thiserror::Error;

use crate::workflow::ClaimStage;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Unknown {kind}: '{value}'")]
    UnknownVocabulary { kind: &'static str, value: String },

    #[error("Invalid claim payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid stage transition from {from} to {to}")]
    InvalidStageTransition { from: ClaimStage, to: ClaimStage },

    #[error("Claim already resolved")]
    AlreadyResolved,
}

impl ClaimError {
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        ClaimError::InvalidPayload(message.into())
    }
}
