//! # zkredit-ledger: event ledger and behavioral attributes.
//!
//! Records settled remittances and loan disbursements, summarizes a
//! worker's trailing remittance window, and buckets that summary into
//! privacy-preserving attributes for the credit engine.
//!
//! # Modules
//!
//! - [`store`]: `InMemoryEventStore`, the default [`EventStore`](zkredit_core::traits::EventStore)
//! - [`summary`]: Windowed summarization over a worker's history
//! - [`attributes`]: Banding of a summary into `ZkAttributes`

pub mod attributes;
pub mod store;
pub mod summary;

pub use attributes::derive_attributes;
pub use store::InMemoryEventStore;
pub use summary::{summarize, WindowedSummarizer};
