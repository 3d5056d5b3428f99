//! Rate-file loading for the IRPF calculator.
//!
//! Bracket schedules live in CSV files so figures can change without a
//! rebuild. This crate parses them and merges them over the built-in
//! defaults from [`irpf_core::TaxTables`].

mod loader;

pub use loader::{RateFileError, RateFileLoader, RateRecord};
