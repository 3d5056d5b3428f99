//! Calculation building blocks and the engine that drives them.
//!
//! Each submodule owns one stage of the computation: bracket
//! allocation, allowance resolution and social security contributions.
//! [`engine`] chains them into the full IRPF calculation.

pub mod allowances;
pub mod brackets;
pub mod common;
pub mod contributions;
pub mod engine;

pub use allowances::AllowanceResolver;
pub use brackets::{BracketAllocation, allocate};
pub use contributions::{ContributionCalculator, ContributionOutcome};
pub use engine::{TaxEngine, TaxEngineError};
