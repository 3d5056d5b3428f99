//! The full IRPF and social security computation.
//!
//! The engine chains the calculation stages in a fixed order:
//!
//! 1. Validate the tables and the request.
//! 2. Social security contribution for the employment mode.
//! 3. Personal and dependent allowances, as the regime permits.
//! 4. Taxable income: income after contributions and business
//!    expenses, minus allowances, floored at zero.
//! 5. State plus regional tax under the standard regime, or flat plus
//!    excess tax under the flat-rate regime.
//! 6. Totals: combined IRPF, total deductions, net income and the
//!    effective deduction rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use irpf_core::{Region, TaxEngine, TaxRequest, TaxTables};
//!
//! let tables = TaxTables::year_2024();
//! let request = TaxRequest::employee(dec!(60000), dec!(0.0635), Region::None);
//!
//! let result = TaxEngine::new(&tables).compute(&request).unwrap();
//!
//! assert_eq!(result.contribution_due, dec!(3810.00));
//! assert_eq!(result.taxable_income, dec!(50640.00));
//! assert_eq!(result.total_irpf, dec!(14438.30));
//! assert_eq!(result.net_income, dec!(41751.70));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::calculations::allowances::AllowanceResolver;
use crate::calculations::brackets::allocate;
use crate::calculations::common::{max, round_half_up};
use crate::calculations::contributions::{ContributionCalculator, ContributionOutcome};
use crate::models::{
    EmploymentMode, Regime, Region, RequestError, TablesError, TaxBreakdownEntry, TaxRequest,
    TaxResult, TaxTables,
};

/// Errors that can occur while computing a tax result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    /// The configured tables are inconsistent.
    #[error("invalid tax tables: {0}")]
    Tables(#[from] TablesError),

    /// The request failed validation.
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),

    /// The regime cannot be combined with the employment mode.
    #[error("self-employed taxpayers cannot use the flat-rate foreign-worker regime")]
    UnsupportedCombination,
}

/// Taxes produced by the regime branch of the computation.
struct RegimeTaxes {
    state_tax: Decimal,
    regional_tax: Decimal,
    flat_rate_tax: Decimal,
    excess_tax: Decimal,
    state_breakdown: Vec<TaxBreakdownEntry>,
    regional_breakdown: Vec<TaxBreakdownEntry>,
}

/// Computes complete IRPF results from a request and a year's tables.
///
/// Every figure comes from the borrowed [`TaxTables`]; the engine
/// itself hardcodes nothing.
pub struct TaxEngine<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxEngine<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Runs the full computation for one taxpayer.
    pub fn compute(&self, request: &TaxRequest) -> Result<TaxResult, TaxEngineError> {
        self.tables.validate()?;
        request.validate()?;

        if request.employment.is_self_employed() && request.regime.is_flat_rate() {
            return Err(TaxEngineError::UnsupportedCombination);
        }

        let contribution = ContributionCalculator::new(&self.tables.contributions)
            .calculate(request.gross_income, &request.employment);
        let income_after_contribution = round_half_up(request.gross_income - contribution.due);

        let (personal_allowance, dependent_allowance) = self.resolve_allowances(request);
        let total_allowance = personal_allowance + dependent_allowance;

        let taxable_income = self.taxable_income(request, &contribution, total_allowance);

        let taxes = match request.regime {
            Regime::Standard { region } => self.standard_taxes(taxable_income, region),
            Regime::FlatRateForeignWorker => self.flat_rate_taxes(taxable_income),
        };

        let total_irpf = taxes.state_tax + taxes.regional_tax;
        let total_deductions = contribution.due + total_irpf;
        let net_income = round_half_up(request.gross_income - total_deductions);
        let effective_rate = if request.gross_income.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(total_deductions / request.gross_income * Decimal::ONE_HUNDRED)
        };

        Ok(TaxResult {
            gross_income: request.gross_income,
            contribution_due: contribution.due,
            income_after_contribution,
            contribution_base: contribution.base,
            personal_allowance,
            dependent_allowance,
            total_allowance,
            taxable_income,
            state_tax: taxes.state_tax,
            regional_tax: taxes.regional_tax,
            total_irpf,
            flat_rate_tax: taxes.flat_rate_tax,
            excess_tax: taxes.excess_tax,
            total_deductions,
            net_income,
            effective_rate,
            state_breakdown: taxes.state_breakdown,
            regional_breakdown: taxes.regional_breakdown,
        })
    }

    /// Personal and dependent allowances, honouring the regime and
    /// employment restrictions.
    ///
    /// The flat-rate regime grants no allowances at all. Self-employed
    /// taxpayers get no personal allowance but keep the dependent
    /// allowances.
    fn resolve_allowances(&self, request: &TaxRequest) -> (Decimal, Decimal) {
        if request.regime.is_flat_rate() {
            return (Decimal::ZERO, Decimal::ZERO);
        }

        let resolver = AllowanceResolver::new(&self.tables.allowances);
        let personal = if request.employment.is_self_employed() {
            Decimal::ZERO
        } else {
            resolver.personal_allowance(request.age, request.personal_allowance)
        };
        let dependent = resolver.dependent_allowance(&request.dependents);

        (personal, dependent)
    }

    /// Income subject to IRPF, floored at zero.
    ///
    /// Employees start from income after the contribution. The
    /// self-employed start from income net of business expenses,
    /// optionally reduced by the general deduction, minus the
    /// contribution.
    fn taxable_income(
        &self,
        request: &TaxRequest,
        contribution: &ContributionOutcome,
        total_allowance: Decimal,
    ) -> Decimal {
        let base = match &request.employment {
            EmploymentMode::Employee { .. } => request.gross_income - contribution.due,
            EmploymentMode::SelfEmployed(self_employment) => {
                let mut net = request.gross_income - self_employment.business_expenses;
                if self_employment.apply_general_deduction {
                    net -= round_half_up(net * self.tables.general_deduction_rate);
                }
                net - contribution.due
            }
        };

        max(round_half_up(base - total_allowance), Decimal::ZERO)
    }

    /// State and regional tax under the ordinary progressive regime.
    fn standard_taxes(&self, taxable_income: Decimal, region: Region) -> RegimeTaxes {
        let state = allocate(taxable_income, &self.tables.state);

        let schedule = self.tables.regional_schedule(region);
        if schedule.is_empty() && region != Region::None {
            warn!(region = %region, "no regional schedule configured, charging no regional tax");
        }
        let regional = allocate(taxable_income, schedule);

        RegimeTaxes {
            state_tax: state.tax,
            regional_tax: regional.tax,
            flat_rate_tax: Decimal::ZERO,
            excess_tax: Decimal::ZERO,
            state_breakdown: state.entries,
            regional_breakdown: regional.entries,
        }
    }

    /// Flat tax up to the threshold, state-schedule tax on the excess.
    ///
    /// The excess is allocated against the state schedule from its
    /// first band, and the whole charge counts as state tax. No
    /// regional tax is levied.
    fn flat_rate_taxes(&self, taxable_income: Decimal) -> RegimeTaxes {
        let threshold = self.tables.flat_regime.threshold;
        let flat_portion = taxable_income.min(threshold);
        let flat_rate_tax = round_half_up(flat_portion * self.tables.flat_regime.rate);

        let (excess_tax, state_breakdown) = if taxable_income > threshold {
            let excess = allocate(taxable_income - threshold, &self.tables.state);
            (excess.tax, excess.entries)
        } else {
            (Decimal::ZERO, Vec::new())
        };

        RegimeTaxes {
            state_tax: flat_rate_tax + excess_tax,
            regional_tax: Decimal::ZERO,
            flat_rate_tax,
            excess_tax,
            state_breakdown,
            regional_breakdown: Vec::new(),
        }
    }
}
