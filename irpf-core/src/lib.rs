//! Core library for Spanish IRPF and social security calculations.
//!
//! This crate holds the domain models and the calculation engine. It
//! performs no I/O: rate tables are plain data that callers construct
//! in code (see [`TaxTables::year_2024`]) or load through a companion
//! crate.

pub mod calculations;
pub mod models;

pub use calculations::{TaxEngine, TaxEngineError};
pub use models::*;
