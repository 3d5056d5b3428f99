use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Bracket, BracketSchedule, Region, ScheduleError};

/// Errors raised when a table set fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TablesError {
    /// The state schedule breaks a band invariant.
    #[error("state schedule is invalid: {0}")]
    State(ScheduleError),

    /// A regional schedule breaks a band invariant.
    #[error("regional schedule for {region} is invalid: {error}")]
    Regional {
        region: Region,
        error: ScheduleError,
    },

    /// A configured rate is outside [0, 1].
    #[error("{name} must be a rate between 0 and 1, got {value}")]
    RateOutOfRange { name: &'static str, value: Decimal },

    /// A configured amount is negative.
    #[error("{name} must not be negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },

    /// The child allowance table lists no amounts at all.
    #[error("child allowance table must list at least one birth-order amount")]
    NoChildAllowances,

    /// The personal allowance age tiers are out of order.
    #[error("allowance age tiers are inverted: senior age {senior} exceeds elder age {elder}")]
    InvertedAgeTiers { senior: u32, elder: u32 },

    /// The autónomo monthly base bounds are out of order.
    #[error("autonomo monthly base bounds are inverted: min {min} exceeds max {max}")]
    InvertedBaseBounds { min: Decimal, max: Decimal },
}

/// Personal, dependent and household allowance amounts for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceTable {
    /// Personal allowance below `senior_age`, and when age is
    /// unspecified.
    pub personal_base: Decimal,

    /// Personal allowance from `senior_age` up to `elder_age`.
    pub personal_senior: Decimal,

    /// Personal allowance from `elder_age` onwards.
    pub personal_elder: Decimal,

    /// Age from which `personal_senior` applies.
    pub senior_age: u32,

    /// Age from which `personal_elder` applies.
    pub elder_age: u32,

    /// Allowance per child by birth order, first child first. The last
    /// amount repeats for children beyond the listed positions.
    pub child_by_order: Vec<Decimal>,

    /// Additional allowance for each child under 3.
    pub child_under_3_bonus: Decimal,

    /// Additional allowance per child with a 33%+ disability.
    pub child_disability_33: Decimal,

    /// Additional allowance per child with a 65%+ disability.
    pub child_disability_65: Decimal,

    /// Allowance per ascendant over 65 living with the taxpayer.
    pub ascendant_over_65: Decimal,

    /// Additional allowance per ascendant with a 33%+ disability.
    pub ascendant_disability_33: Decimal,

    /// Additional allowance per ascendant with a 65%+ disability.
    pub ascendant_disability_65: Decimal,

    /// Allowance for a general-category large family.
    pub large_family: Decimal,

    /// Allowance for a special-category large family.
    pub large_family_special: Decimal,

    /// Allowance for a single-parent household.
    pub single_parent: Decimal,

    /// Allowance for taxpayer disability of 33% or more.
    pub taxpayer_disability_33: Decimal,

    /// Allowance for taxpayer disability of 65% or more.
    pub taxpayer_disability_65: Decimal,

    /// Allowance for taxpayer reduced mobility.
    pub reduced_mobility: Decimal,

    /// Allowance for taxpayers requiring dependency assistance.
    pub dependency_assistance: Decimal,
}

/// Social security contribution figures for employees and autónomos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTable {
    /// Employee-side contribution rate on gross salary.
    pub employee_rate: Decimal,

    /// Lowest monthly contribution base an autónomo may declare.
    pub autonomo_monthly_base_min: Decimal,

    /// Highest monthly contribution base an autónomo may declare.
    pub autonomo_monthly_base_max: Decimal,

    /// Fraction of monthly income used to estimate the base when no
    /// base is declared.
    pub autonomo_base_percentage: Decimal,

    /// Reduced monthly fee during months 1 to 12 of activity.
    pub autonomo_fee_first_year: Decimal,

    /// Reduced monthly fee during months 13 to 24 of activity.
    pub autonomo_fee_second_year: Decimal,

    /// Contribution rate on the monthly base once the reduced period
    /// is over.
    pub autonomo_full_rate: Decimal,
}

/// Threshold and rate for the flat-rate foreign-worker regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRegimeTable {
    /// Taxable income up to this amount is charged at `rate`.
    pub threshold: Decimal,

    /// Flat rate applied up to the threshold.
    pub rate: Decimal,
}

/// Every configured figure for one fiscal year.
///
/// The engine never hardcodes amounts: it reads them all from here.
/// [`TaxTables::year_2024`] provides the published 2024 figures;
/// loaders may replace any part of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    /// Fiscal year the tables describe.
    pub year: i32,

    /// State progressive schedule.
    pub state: BracketSchedule,

    /// Regional progressive schedules by autonomous community.
    pub regional: BTreeMap<Region, BracketSchedule>,

    /// Allowance amounts.
    pub allowances: AllowanceTable,

    /// Social security contribution figures.
    pub contributions: ContributionTable,

    /// Flat-rate regime threshold and rate.
    pub flat_regime: FlatRegimeTable,

    /// Fraction of net self-employment income deductible as
    /// hard-to-justify expenses.
    pub general_deduction_rate: Decimal,
}

/// Builds a 2024 schedule from its six marginal rates. All 2024
/// schedules share the same band boundaries.
fn schedule_2024(rates: [Decimal; 6]) -> BracketSchedule {
    let bounds = [
        dec!(12450),
        dec!(20200),
        dec!(35200),
        dec!(60000),
        dec!(300000),
    ];

    let mut brackets = Vec::with_capacity(rates.len());
    let mut lower = Decimal::ZERO;
    for (index, rate) in rates.into_iter().enumerate() {
        let upper = bounds.get(index).copied();
        brackets.push(Bracket::new(lower, upper, rate));
        if let Some(upper) = upper {
            lower = upper;
        }
    }

    BracketSchedule::from_vec(brackets)
}

impl TaxTables {
    /// Published figures for fiscal year 2024.
    pub fn year_2024() -> Self {
        let mut regional = BTreeMap::new();
        regional.insert(
            Region::Madrid,
            schedule_2024([
                dec!(0.09),
                dec!(0.10),
                dec!(0.11),
                dec!(0.12),
                dec!(0.13),
                dec!(0.14),
            ]),
        );
        regional.insert(
            Region::Catalonia,
            schedule_2024([
                dec!(0.10),
                dec!(0.11),
                dec!(0.12),
                dec!(0.13),
                dec!(0.14),
                dec!(0.15),
            ]),
        );
        regional.insert(
            Region::Andalusia,
            schedule_2024([
                dec!(0.10),
                dec!(0.11),
                dec!(0.12),
                dec!(0.13),
                dec!(0.14),
                dec!(0.15),
            ]),
        );
        regional.insert(
            Region::Valencia,
            schedule_2024([
                dec!(0.10),
                dec!(0.11),
                dec!(0.12),
                dec!(0.13),
                dec!(0.14),
                dec!(0.15),
            ]),
        );
        regional.insert(
            Region::Basque,
            schedule_2024([
                dec!(0.09),
                dec!(0.10),
                dec!(0.11),
                dec!(0.12),
                dec!(0.13),
                dec!(0.14),
            ]),
        );
        regional.insert(
            Region::Galicia,
            schedule_2024([
                dec!(0.10),
                dec!(0.11),
                dec!(0.12),
                dec!(0.13),
                dec!(0.14),
                dec!(0.15),
            ]),
        );
        regional.insert(
            Region::CastillaLeon,
            schedule_2024([
                dec!(0.09),
                dec!(0.10),
                dec!(0.11),
                dec!(0.12),
                dec!(0.13),
                dec!(0.14),
            ]),
        );
        regional.insert(
            Region::CanaryIslands,
            schedule_2024([
                dec!(0.08),
                dec!(0.09),
                dec!(0.10),
                dec!(0.11),
                dec!(0.12),
                dec!(0.13),
            ]),
        );
        regional.insert(Region::None, BracketSchedule::empty());

        Self {
            year: 2024,
            state: schedule_2024([
                dec!(0.19),
                dec!(0.24),
                dec!(0.30),
                dec!(0.37),
                dec!(0.45),
                dec!(0.47),
            ]),
            regional,
            allowances: AllowanceTable {
                personal_base: dec!(5550),
                personal_senior: dec!(6700),
                personal_elder: dec!(8100),
                senior_age: 65,
                elder_age: 75,
                child_by_order: vec![dec!(2400), dec!(2700), dec!(4000), dec!(4500)],
                child_under_3_bonus: dec!(2800),
                child_disability_33: dec!(3000),
                child_disability_65: dec!(12000),
                ascendant_over_65: dec!(1150),
                ascendant_disability_33: dec!(3000),
                ascendant_disability_65: dec!(12000),
                large_family: dec!(2400),
                large_family_special: dec!(4800),
                single_parent: dec!(2100),
                taxpayer_disability_33: dec!(3000),
                taxpayer_disability_65: dec!(12000),
                reduced_mobility: dec!(3000),
                dependency_assistance: dec!(12000),
            },
            contributions: ContributionTable {
                employee_rate: dec!(0.0635),
                autonomo_monthly_base_min: dec!(950.98),
                autonomo_monthly_base_max: dec!(4720.50),
                autonomo_base_percentage: dec!(0.90),
                autonomo_fee_first_year: dec!(80),
                autonomo_fee_second_year: dec!(160),
                autonomo_full_rate: dec!(0.30),
            },
            flat_regime: FlatRegimeTable {
                threshold: dec!(600000),
                rate: dec!(0.24),
            },
            general_deduction_rate: dec!(0.05),
        }
    }

    /// The regional schedule for `region`.
    ///
    /// Regions without an entry get the empty schedule, so they simply
    /// accrue no regional tax.
    pub fn regional_schedule(&self, region: Region) -> &BracketSchedule {
        static EMPTY: BracketSchedule = BracketSchedule::empty();
        self.regional.get(&region).unwrap_or(&EMPTY)
    }

    /// Checks every schedule, rate and amount in the table set.
    pub fn validate(&self) -> Result<(), TablesError> {
        self.state.validate().map_err(TablesError::State)?;
        for (region, schedule) in &self.regional {
            schedule.validate().map_err(|error| TablesError::Regional {
                region: *region,
                error,
            })?;
        }

        let rates = [
            ("employee contribution rate", self.contributions.employee_rate),
            (
                "autonomo base percentage",
                self.contributions.autonomo_base_percentage,
            ),
            ("autonomo full rate", self.contributions.autonomo_full_rate),
            ("flat regime rate", self.flat_regime.rate),
            ("general deduction rate", self.general_deduction_rate),
        ];
        for (name, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(TablesError::RateOutOfRange { name, value });
            }
        }

        let allowances = &self.allowances;
        let amounts = [
            ("personal base allowance", allowances.personal_base),
            ("personal senior allowance", allowances.personal_senior),
            ("personal elder allowance", allowances.personal_elder),
            ("child under-3 bonus", allowances.child_under_3_bonus),
            ("child disability 33 allowance", allowances.child_disability_33),
            ("child disability 65 allowance", allowances.child_disability_65),
            ("ascendant allowance", allowances.ascendant_over_65),
            (
                "ascendant disability 33 allowance",
                allowances.ascendant_disability_33,
            ),
            (
                "ascendant disability 65 allowance",
                allowances.ascendant_disability_65,
            ),
            ("large family allowance", allowances.large_family),
            (
                "special large family allowance",
                allowances.large_family_special,
            ),
            ("single parent allowance", allowances.single_parent),
            (
                "taxpayer disability 33 allowance",
                allowances.taxpayer_disability_33,
            ),
            (
                "taxpayer disability 65 allowance",
                allowances.taxpayer_disability_65,
            ),
            ("reduced mobility allowance", allowances.reduced_mobility),
            (
                "dependency assistance allowance",
                allowances.dependency_assistance,
            ),
            (
                "autonomo monthly base min",
                self.contributions.autonomo_monthly_base_min,
            ),
            (
                "autonomo monthly base max",
                self.contributions.autonomo_monthly_base_max,
            ),
            (
                "autonomo first-year fee",
                self.contributions.autonomo_fee_first_year,
            ),
            (
                "autonomo second-year fee",
                self.contributions.autonomo_fee_second_year,
            ),
            ("flat regime threshold", self.flat_regime.threshold),
        ];
        for (name, value) in amounts {
            if value < Decimal::ZERO {
                return Err(TablesError::NegativeAmount { name, value });
            }
        }
        for amount in &allowances.child_by_order {
            if *amount < Decimal::ZERO {
                return Err(TablesError::NegativeAmount {
                    name: "child allowance",
                    value: *amount,
                });
            }
        }

        if allowances.child_by_order.is_empty() {
            return Err(TablesError::NoChildAllowances);
        }
        if allowances.senior_age > allowances.elder_age {
            return Err(TablesError::InvertedAgeTiers {
                senior: allowances.senior_age,
                elder: allowances.elder_age,
            });
        }
        if self.contributions.autonomo_monthly_base_min > self.contributions.autonomo_monthly_base_max
        {
            return Err(TablesError::InvertedBaseBounds {
                min: self.contributions.autonomo_monthly_base_min,
                max: self.contributions.autonomo_monthly_base_max,
            });
        }

        Ok(())
    }
}
