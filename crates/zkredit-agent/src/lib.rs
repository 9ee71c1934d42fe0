//! # zkredit-agent: orchestration of the worker and lender flows.
//!
//! A [`WorkerAgent`] sends remittances (payment, then ledger record, then
//! profile update) and assembles loan applications from private proofs and
//! its own remittance history. A [`LoanDesk`] decides those applications and
//! pays approved loans out of a funding account.
//!
//! # Modules
//!
//! - [`config`]: `AgentConfig` loaded from `ZKREDIT_*` environment variables
//! - [`desk`]: `LoanDesk`: review and disbursement
//! - [`error`]: `AgentError`
//! - [`events`]: `EventBus` broadcasting `LedgerEvent`s
//! - [`profile`]: The worker's private profile and history commitment
//! - [`services`]: Shared handles to the store, ledger, proof service, and clock
//! - [`telemetry`]: `tracing` subscriber initialisation
//! - [`worker`]: `WorkerAgent`: remittances and loan applications

pub mod config;
pub mod desk;
pub mod error;
pub mod events;
pub mod profile;
pub mod services;
pub mod telemetry;
pub mod worker;

pub use config::AgentConfig;
pub use desk::LoanDesk;
pub use error::AgentError;
pub use events::{EventBus, LedgerEvent};
pub use profile::{TransactionRecord, WorkerProfile};
pub use services::Services;
pub use worker::{RemittanceReceipt, RemittanceRequest, WorkerAgent};
