//! # zkredit-core
//! Foundation types and traits for ZKredit.

pub mod address;
pub mod amount;
pub mod attributes;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
