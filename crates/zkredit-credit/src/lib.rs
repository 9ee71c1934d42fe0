//! # zkredit-credit: microloan decisions over proof results and banded attributes.
//!
//! # Modules
//!
//! - [`policy`]: Strategy selector and the constant parameters of each strategy
//! - [`decision`]: `CreditDecision` and the per-proof `VerificationReport`
//! - [`engine`]: `CreditDecisionEngine`: infallible evaluation with fallback recovery
//! - [`score`]: Credit score derivation from verified proofs and attributes
//! - [`assess`]: Loan application bundle and the verify-then-decide flow

pub mod assess;
pub mod decision;
pub mod engine;
pub mod policy;
pub mod score;

pub use assess::{assess, LoanApplication};
pub use decision::{CreditDecision, ProofCheck, VerificationReport};
pub use engine::CreditDecisionEngine;
pub use policy::{DecisionPolicy, DecisionStrategy};
pub use score::credit_score;
