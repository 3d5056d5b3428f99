use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Bracket;

/// Tax accrued by a single schedule band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownEntry {
    /// The band the income fell into.
    pub bracket: Bracket,

    /// Income taxed inside this band.
    pub amount_taxed: Decimal,

    /// Tax due for this band, rounded to cents.
    pub tax: Decimal,
}

/// Complete outcome of a tax computation.
///
/// All currency amounts are euros rounded to cents. Each breakdown
/// holds one entry per band that received income, and the entry taxes
/// sum exactly to the matching total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Gross annual income as supplied.
    pub gross_income: Decimal,

    /// Social security contribution for the year.
    pub contribution_due: Decimal,

    /// Gross income minus the social security contribution.
    pub income_after_contribution: Decimal,

    /// Annual contribution base the contribution was computed from.
    /// Only present for self-employed taxpayers.
    pub contribution_base: Option<Decimal>,

    /// Personal allowance applied. Zero for self-employed taxpayers
    /// and under the flat-rate regime.
    pub personal_allowance: Decimal,

    /// Dependent and household allowances applied.
    pub dependent_allowance: Decimal,

    /// Sum of personal and dependent allowances.
    pub total_allowance: Decimal,

    /// Income actually subject to IRPF.
    pub taxable_income: Decimal,

    /// State portion of IRPF. Under the flat-rate regime this holds
    /// the flat tax plus any excess tax.
    pub state_tax: Decimal,

    /// Regional portion of IRPF. Zero under the flat-rate regime.
    pub regional_tax: Decimal,

    /// Total IRPF due: state plus regional.
    pub total_irpf: Decimal,

    /// Tax charged at the flat rate. Zero outside the flat-rate
    /// regime.
    pub flat_rate_tax: Decimal,

    /// Tax on income above the flat-rate threshold. Zero when the
    /// threshold is not exceeded or outside the flat-rate regime.
    pub excess_tax: Decimal,

    /// Social security contribution plus total IRPF.
    pub total_deductions: Decimal,

    /// Gross income minus total deductions.
    pub net_income: Decimal,

    /// Total deductions as a percentage of gross income. Zero when
    /// gross income is zero.
    pub effective_rate: Decimal,

    /// Per-band state tax. Under the flat-rate regime this only
    /// covers income above the threshold.
    pub state_breakdown: Vec<TaxBreakdownEntry>,

    /// Per-band regional tax. Empty under the flat-rate regime and
    /// for regions without a schedule.
    pub regional_breakdown: Vec<TaxBreakdownEntry>,
}
