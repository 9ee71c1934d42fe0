//! # zkredit-payment: turning a monetary intent into a settled transfer.
//!
//! # Modules
//!
//! - [`fees`]: Remittance fee/net arithmetic and smallest-unit conversion
//! - [`router`]: Address normalization, transfer-mode selection, and execution

pub mod fees;
pub mod router;

pub use fees::{compute_fee, compute_net, to_smallest_unit, FeeBreakdown};
pub use router::{normalize_address, resolve_mode, PaymentConfig, PaymentRouter, TransferMode};
