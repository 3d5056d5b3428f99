use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Dependents, EmploymentMode, Regime, Region};

/// Errors raised when a request fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// Gross income is negative.
    #[error("gross income must not be negative, got {0}")]
    NegativeIncome(Decimal),

    /// The employee contribution rate is outside [0, 1].
    #[error("contribution rate must be between 0 and 1, got {0}")]
    ContributionRateOutOfRange(Decimal),

    /// Business expenses are negative.
    #[error("business expenses must not be negative, got {0}")]
    NegativeExpenses(Decimal),

    /// A declared contribution base is zero or negative.
    #[error("contribution base must be positive, got {0}")]
    NonPositiveContributionBase(Decimal),

    /// The personal allowance override is negative.
    #[error("personal allowance must not be negative, got {0}")]
    NegativeAllowance(Decimal),
}

/// One taxpayer's situation for a fiscal year.
///
/// This is the complete input to [`crate::TaxEngine::compute`]. All
/// amounts are annual euros unless a field says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRequest {
    /// Gross annual income before any deduction.
    pub gross_income: Decimal,

    /// Employee or self-employed, with the matching contribution
    /// inputs.
    pub employment: EmploymentMode,

    /// Standard regional regime, or the flat-rate regime for inbound
    /// foreign workers.
    pub regime: Regime,

    /// Taxpayer age. Drives the age-tiered personal allowance; `None`
    /// selects the base tier.
    pub age: Option<u32>,

    /// Explicit personal allowance that replaces the age-based lookup
    /// entirely when present.
    pub personal_allowance: Option<Decimal>,

    /// Household circumstances for dependent allowances.
    pub dependents: Dependents,
}

impl TaxRequest {
    /// A plain salaried-employee request under the standard regime,
    /// with no dependents and age unspecified.
    pub fn employee(gross_income: Decimal, rate: Decimal, region: Region) -> Self {
        Self {
            gross_income,
            employment: EmploymentMode::Employee { rate },
            regime: Regime::Standard { region },
            age: None,
            personal_allowance: None,
            dependents: Dependents::default(),
        }
    }

    /// Checks the request for values the engine cannot price.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.gross_income < Decimal::ZERO {
            return Err(RequestError::NegativeIncome(self.gross_income));
        }

        match &self.employment {
            EmploymentMode::Employee { rate } => {
                if *rate < Decimal::ZERO || *rate > Decimal::ONE {
                    return Err(RequestError::ContributionRateOutOfRange(*rate));
                }
            }
            EmploymentMode::SelfEmployed(self_employment) => {
                if self_employment.business_expenses < Decimal::ZERO {
                    return Err(RequestError::NegativeExpenses(
                        self_employment.business_expenses,
                    ));
                }
                if let Some(base) = self_employment.contribution_base {
                    if base <= Decimal::ZERO {
                        return Err(RequestError::NonPositiveContributionBase(base));
                    }
                }
            }
        }

        if let Some(allowance) = self.personal_allowance {
            if allowance < Decimal::ZERO {
                return Err(RequestError::NegativeAllowance(allowance));
            }
        }

        Ok(())
    }
}
