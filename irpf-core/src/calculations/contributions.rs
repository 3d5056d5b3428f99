//! Social security contributions for employees and autónomos.
//!
//! Employees contribute a flat share of gross salary. The
//! self-employed pay on a monthly contribution base instead: either
//! the base they declared or one estimated from income, with reduced
//! flat fees during the first two years of activity.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{ContributionTable, EmploymentMode, SelfEmployment};

/// Outcome of the social security computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionOutcome {
    /// Contribution due for the year.
    pub due: Decimal,

    /// Annual base the contribution was computed from. `None` for
    /// employees, whose contribution is a flat share of gross income.
    pub base: Option<Decimal>,
}

/// Computes annual social security contributions from the configured
/// figures.
pub struct ContributionCalculator<'a> {
    table: &'a ContributionTable,
}

impl<'a> ContributionCalculator<'a> {
    pub fn new(table: &'a ContributionTable) -> Self {
        Self { table }
    }

    /// The annual contribution for the given employment mode.
    pub fn calculate(
        &self,
        gross_income: Decimal,
        employment: &EmploymentMode,
    ) -> ContributionOutcome {
        match employment {
            EmploymentMode::Employee { rate } => ContributionOutcome {
                due: round_half_up(gross_income * rate),
                base: None,
            },
            EmploymentMode::SelfEmployed(self_employment) => {
                self.calculate_autonomo(gross_income, self_employment)
            }
        }
    }

    fn calculate_autonomo(
        &self,
        gross_income: Decimal,
        self_employment: &SelfEmployment,
    ) -> ContributionOutcome {
        let annual_base = match self_employment.contribution_base {
            Some(base) => base,
            None => self.estimate_annual_base(gross_income),
        };

        let monthly = self.monthly_amount(annual_base, self_employment.months_registered);

        ContributionOutcome {
            due: round_half_up(monthly * dec!(12)),
            base: Some(annual_base),
        }
    }

    /// Estimates the annual base from gross income: a configured share
    /// of monthly income, clamped to the legal monthly bounds.
    fn estimate_annual_base(&self, gross_income: Decimal) -> Decimal {
        let monthly_income = gross_income / dec!(12);
        let monthly_base = (monthly_income * self.table.autonomo_base_percentage)
            .max(self.table.autonomo_monthly_base_min)
            .min(self.table.autonomo_monthly_base_max);

        round_half_up(monthly_base * dec!(12))
    }

    /// The monthly payment: reduced flat fees during the first and
    /// second year of activity, then the full rate on the monthly
    /// base.
    fn monthly_amount(&self, annual_base: Decimal, months_registered: Option<u32>) -> Decimal {
        match months_registered {
            Some(0) => {
                warn!("months registered is zero, charging the full autonomo rate");
                self.full_rate_monthly(annual_base)
            }
            Some(months) if months <= 12 => self.table.autonomo_fee_first_year,
            Some(months) if months <= 24 => self.table.autonomo_fee_second_year,
            _ => self.full_rate_monthly(annual_base),
        }
    }

    fn full_rate_monthly(&self, annual_base: Decimal) -> Decimal {
        annual_base / dec!(12) * self.table.autonomo_full_rate
    }
}
