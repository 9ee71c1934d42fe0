//! Orchestrator errors.

use thiserror::Error;

use zkredit_core::error::{
    ConfigurationError, PaymentError, ProofError, StoreError, ValidationError,
};
use zkredit_core::types::ProofKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    /// A private metric is below the threshold its proof would claim.
    #[error("{kind} proof insufficient: have {actual}, need {required}")]
    ProofInsufficient {
        kind: ProofKind,
        actual: String,
        required: String,
    },
    #[error(transparent)]
    Proof(ProofError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("loan was not approved: {0}")]
    NotApproved(String),
}

impl From<ProofError> for AgentError {
    fn from(e: ProofError) -> Self {
        match e {
            ProofError::Insufficient {
                kind,
                actual,
                required,
            } => Self::ProofInsufficient {
                kind,
                actual,
                required,
            },
            other => Self::Proof(other),
        }
    }
}

impl AgentError {
    /// Whether the failure came from caller input rather than a collaborator.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Payment(PaymentError::Validation(_)))
    }
}
