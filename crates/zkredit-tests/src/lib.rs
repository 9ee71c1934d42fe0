//! Cross-crate integration tests for ZKredit.
//!
//! The tests under `tests/` drive a worker and a loan desk end to end
//! against the in-memory store and the deterministic collaborators in
//! [`helpers`].

pub mod helpers;
