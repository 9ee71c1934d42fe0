//! Error types for ZKredit.
use thiserror::Error;

use crate::amount::Amount;
use crate::types::ProofKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be positive")] NonPositiveAmount,
    #[error("amount {amount} exceeds cap {cap}")] AmountAboveCap { amount: Amount, cap: Amount },
    #[error("amount is not a finite number")] NonFiniteAmount,
    #[error("amount overflow")] AmountOverflow,
    #[error("invalid amount: {0}")] InvalidAmount(String),
    #[error("net amount after fee is not positive: gross {gross}, fee {fee}")] NonPositiveNet { gross: Amount, fee: Amount },
    #[error("address value is empty")] EmptyAddress,
    #[error("malformed address: {0}")] MalformedAddress(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{0} is not configured")] Missing(String),
    #[error("invalid {key}: {reason}")] Invalid { key: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("settlement failed with status {status}")] Execution { status: String },
    #[error("settlement timed out after {after_ms}ms")] Timeout { after_ms: u64 },
    #[error("ledger client: {0}")] Ledger(String),
    #[error(transparent)] Validation(#[from] ValidationError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("{kind} below threshold: have {actual}, need {required}")] Insufficient { kind: ProofKind, actual: String, required: String },
    #[error("{kind} proof timed out after {after_ms}ms")] Timeout { kind: ProofKind, after_ms: u64 },
    #[error("proof provider: {0}")] Provider(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate event id: {0}")] DuplicateEvent(String),
    #[error("backend: {0}")] Backend(String),
}

/// Failures inside a decision strategy. The credit engine recovers from
/// these locally and never hands them to its caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("malformed verification results: {0}")] MalformedVerification(String),
    #[error("missing zk attributes")] MissingAttributes,
    #[error("malformed zk attributes: {0}")] MalformedAttributes(String),
    #[error("invalid request: {0}")] InvalidRequest(String),
}

#[derive(Error, Debug)]
pub enum ZkreditError {
    #[error(transparent)] Validation(#[from] ValidationError),
    #[error(transparent)] Configuration(#[from] ConfigurationError),
    #[error(transparent)] Payment(#[from] PaymentError),
    #[error(transparent)] Proof(#[from] ProofError),
    #[error(transparent)] Store(#[from] StoreError),
    #[error(transparent)] Decision(#[from] DecisionError),
}
