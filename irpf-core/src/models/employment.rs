use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inputs specific to self-employed (autónomo) taxpayers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmployment {
    /// Annual contribution base declared to social security. When
    /// absent, the base is estimated from gross income and clamped to
    /// the configured monthly bounds.
    pub contribution_base: Option<Decimal>,

    /// Months since first registration as self-employed. Months 1-12
    /// and 13-24 qualify for the reduced flat fees; `None` means the
    /// reduced period is over.
    pub months_registered: Option<u32>,

    /// Deductible business expenses for the year.
    pub business_expenses: Decimal,

    /// Whether to apply the general deduction for hard-to-justify
    /// expenses on top of declared business expenses.
    pub apply_general_deduction: bool,
}

/// How the taxpayer earns the gross income.
///
/// The variant decides which social security scheme applies and which
/// extra inputs the computation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentMode {
    /// Salaried employee. Social security is withheld as a flat
    /// fraction of gross income.
    Employee {
        /// Employee-side contribution rate, as a fraction of gross.
        rate: Decimal,
    },

    /// Self-employed worker paying autónomo contributions.
    SelfEmployed(SelfEmployment),
}

impl EmploymentMode {
    pub fn is_self_employed(&self) -> bool {
        matches!(self, EmploymentMode::SelfEmployed(_))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn employee_mode_is_not_self_employed() {
        let mode = EmploymentMode::Employee { rate: dec!(0.0635) };

        assert!(!mode.is_self_employed());
    }

    #[test]
    fn self_employed_mode_is_self_employed() {
        let mode = EmploymentMode::SelfEmployed(SelfEmployment::default());

        assert!(mode.is_self_employed());
    }
}
