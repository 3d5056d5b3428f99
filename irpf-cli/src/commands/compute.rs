//! The `compute` subcommand.

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use irpf_core::{
    Dependents, EmploymentMode, Regime, Region, SelfEmployment, TaxEngine, TaxRequest, TaxTables,
};

use super::{load_tables, parse_region};
use crate::report;

/// Estimate IRPF and social security for a single year of income.
#[derive(Args, Debug)]
pub struct ComputeCommand {
    /// Gross income in euros. Annual unless `--monthly` is given.
    income: Decimal,

    /// Treat the income as a monthly figure and scale it to a year.
    #[arg(long)]
    monthly: bool,

    /// Taxpayer age in years. Raises the personal allowance from 65 and
    /// again from 75.
    #[arg(long)]
    age: Option<u32>,

    /// Personal allowance in euros, replacing the age-based amount.
    #[arg(long)]
    allowance: Option<Decimal>,

    /// Employee social security rate as a fraction of gross income.
    /// Ignored for `--autonomo`.
    #[arg(long)]
    ss_rate: Option<Decimal>,

    /// Autonomous community whose regional schedule applies.
    #[arg(long, default_value = "none", value_parser = parse_region)]
    region: Region,

    /// Tax under the flat-rate regime for inbound foreign workers
    /// (Beckham Law) instead of the progressive schedules.
    #[arg(long, conflicts_with = "autonomo")]
    beckham_law: bool,

    /// Contribute as a self-employed worker (autónomo) instead of an
    /// employee.
    #[arg(long)]
    autonomo: bool,

    /// Annual social security contribution base in euros. Estimated from
    /// income when omitted.
    #[arg(long, requires = "autonomo")]
    contribution_base: Option<Decimal>,

    /// Months registered as self-employed, selecting the reduced
    /// new-registration fees for the first two years.
    #[arg(long, requires = "autonomo")]
    months_as_autonomo: Option<u32>,

    /// Deductible business expenses in euros.
    #[arg(long, requires = "autonomo", default_value = "0")]
    business_expenses: Decimal,

    /// Apply the general expense deduction to self-employment income.
    #[arg(long, requires = "autonomo")]
    general_deduction: bool,

    /// Number of children under 3 years old.
    #[arg(long, default_value_t = 0)]
    children_under_3: u32,

    /// Number of children 3 years old or older.
    #[arg(long, default_value_t = 0)]
    children_3_plus: u32,

    /// Number of children with a disability of 33% or more.
    #[arg(long, default_value_t = 0)]
    children_disability_33: u32,

    /// Number of children with a disability of 65% or more.
    #[arg(long, default_value_t = 0)]
    children_disability_65: u32,

    /// Number of ascendants over 65 living with the taxpayer.
    #[arg(long, default_value_t = 0)]
    ascendants_65: u32,

    /// Number of ascendants with a disability of 33% or more.
    #[arg(long, default_value_t = 0)]
    ascendants_disability_33: u32,

    /// Number of ascendants with a disability of 65% or more.
    #[arg(long, default_value_t = 0)]
    ascendants_disability_65: u32,

    /// Large family status.
    #[arg(long)]
    large_family: bool,

    /// Special large family status (five or more children, or four with
    /// a disabled child).
    #[arg(long)]
    large_family_special: bool,

    /// Single parent family status.
    #[arg(long)]
    single_parent: bool,

    /// Taxpayer has a disability of 33% or more.
    #[arg(long)]
    taxpayer_disability_33: bool,

    /// Taxpayer has a disability of 65% or more.
    #[arg(long)]
    taxpayer_disability_65: bool,

    /// Taxpayer has reduced mobility.
    #[arg(long)]
    taxpayer_disability_mobility: bool,

    /// Taxpayer needs third-party assistance due to dependency.
    #[arg(long)]
    taxpayer_disability_dependency: bool,

    /// Rate file replacing the builtin 2024 bracket schedules.
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Emit the estimate as JSON instead of the plain text report.
    #[arg(long)]
    json: bool,

    /// Show the per-bracket tax breakdown.
    #[arg(long, short)]
    verbose: bool,
}

impl ComputeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if let Some(age) = self.age {
            if age > 120 {
                bail!("age must be between 0 and 120, got {age}");
            }
        }

        let tables = load_tables(self.tables.as_deref())?;
        let request = self.build_request(&tables);

        let engine = TaxEngine::new(&tables);
        let result = engine.compute(&request)?;

        if self.json {
            report::print_json(&request, &result)
        } else {
            report::print_report(&request, &result, self.verbose);
            Ok(())
        }
    }

    /// Maps the parsed flags onto an engine request. The employee
    /// contribution rate falls back to the table rate when `--ss-rate`
    /// is not given.
    fn build_request(&self, tables: &TaxTables) -> TaxRequest {
        let gross_income = if self.monthly {
            self.income * dec!(12)
        } else {
            self.income
        };

        let employment = if self.autonomo {
            EmploymentMode::SelfEmployed(SelfEmployment {
                contribution_base: self.contribution_base,
                months_registered: self.months_as_autonomo,
                business_expenses: self.business_expenses,
                apply_general_deduction: self.general_deduction,
            })
        } else {
            EmploymentMode::Employee {
                rate: self.ss_rate.unwrap_or(tables.contributions.employee_rate),
            }
        };

        let regime = if self.beckham_law {
            Regime::FlatRateForeignWorker
        } else {
            Regime::Standard {
                region: self.region,
            }
        };

        TaxRequest {
            gross_income,
            employment,
            regime,
            age: self.age,
            personal_allowance: self.allowance,
            dependents: self.dependents(),
        }
    }

    fn dependents(&self) -> Dependents {
        Dependents {
            children_under_3: self.children_under_3,
            children_3_plus: self.children_3_plus,
            children_disability_33: self.children_disability_33,
            children_disability_65: self.children_disability_65,
            ascendants_over_65: self.ascendants_65,
            ascendants_disability_33: self.ascendants_disability_33,
            ascendants_disability_65: self.ascendants_disability_65,
            large_family: self.large_family,
            large_family_special: self.large_family_special,
            single_parent: self.single_parent,
            disability_33: self.taxpayer_disability_33,
            disability_65: self.taxpayer_disability_65,
            reduced_mobility: self.taxpayer_disability_mobility,
            dependency_assistance: self.taxpayer_disability_dependency,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        cmd: ComputeCommand,
    }

    fn parse(args: &[&str]) -> ComputeCommand {
        let argv = std::iter::once("irpf").chain(args.iter().copied());
        Harness::try_parse_from(argv).expect("arguments should parse").cmd
    }

    fn try_parse(args: &[&str]) -> Result<ComputeCommand, clap::Error> {
        let argv = std::iter::once("irpf").chain(args.iter().copied());
        Harness::try_parse_from(argv).map(|harness| harness.cmd)
    }

    // =========================================================================
    // flag parsing tests
    // =========================================================================

    #[test]
    fn test_defaults_build_an_employee_request_without_region() {
        let cmd = parse(&["60000"]);
        let request = cmd.build_request(&TaxTables::year_2024());

        assert_eq!(request.gross_income, dec!(60000));
        assert_eq!(
            request.employment,
            EmploymentMode::Employee { rate: dec!(0.0635) }
        );
        assert_eq!(
            request.regime,
            Regime::Standard {
                region: Region::None
            }
        );
        assert_eq!(request.age, None);
        assert_eq!(request.personal_allowance, None);
        assert_eq!(request.dependents, Dependents::default());
    }

    #[test]
    fn test_monthly_income_is_scaled_to_a_year() {
        let cmd = parse(&["5000", "--monthly"]);
        let request = cmd.build_request(&TaxTables::year_2024());

        assert_eq!(request.gross_income, dec!(60000));
    }

    #[test]
    fn test_region_flag_selects_the_regional_schedule() {
        let cmd = parse(&["60000", "--region", "madrid"]);
        let request = cmd.build_request(&TaxTables::year_2024());

        assert_eq!(
            request.regime,
            Regime::Standard {
                region: Region::Madrid
            }
        );
    }

    #[test]
    fn test_unknown_region_is_rejected_at_parse_time() {
        assert!(try_parse(&["60000", "--region", "narnia"]).is_err());
    }

    #[test]
    fn test_ss_rate_overrides_the_table_rate() {
        let cmd = parse(&["60000", "--ss-rate", "0.05"]);
        let request = cmd.build_request(&TaxTables::year_2024());

        assert_eq!(
            request.employment,
            EmploymentMode::Employee { rate: dec!(0.05) }
        );
    }

    #[test]
    fn test_beckham_law_selects_the_flat_rate_regime() {
        let cmd = parse(&["700000", "--beckham-law", "--region", "madrid"]);
        let request = cmd.build_request(&TaxTables::year_2024());

        assert_eq!(request.regime, Regime::FlatRateForeignWorker);
    }

    #[test]
    fn test_beckham_law_conflicts_with_autonomo() {
        assert!(try_parse(&["60000", "--beckham-law", "--autonomo"]).is_err());
    }

    #[test]
    fn test_autonomo_flags_map_onto_self_employment() {
        let cmd = parse(&[
            "60000",
            "--autonomo",
            "--contribution-base",
            "30000",
            "--months-as-autonomo",
            "18",
            "--business-expenses",
            "2000",
            "--general-deduction",
        ]);
        let request = cmd.build_request(&TaxTables::year_2024());

        assert_eq!(
            request.employment,
            EmploymentMode::SelfEmployed(SelfEmployment {
                contribution_base: Some(dec!(30000)),
                months_registered: Some(18),
                business_expenses: dec!(2000),
                apply_general_deduction: true,
            })
        );
    }

    #[test]
    fn test_contribution_base_requires_autonomo() {
        assert!(try_parse(&["60000", "--contribution-base", "30000"]).is_err());
    }

    #[test]
    fn test_dependent_flags_map_onto_the_household() {
        let cmd = parse(&[
            "60000",
            "--children-under-3",
            "1",
            "--children-3-plus",
            "2",
            "--ascendants-65",
            "1",
            "--large-family",
            "--single-parent",
            "--taxpayer-disability-mobility",
        ]);
        let request = cmd.build_request(&TaxTables::year_2024());

        assert_eq!(
            request.dependents,
            Dependents {
                children_under_3: 1,
                children_3_plus: 2,
                ascendants_over_65: 1,
                large_family: true,
                single_parent: true,
                reduced_mobility: true,
                ..Dependents::default()
            }
        );
    }

    #[test]
    fn test_allowance_and_age_are_passed_through() {
        let cmd = parse(&["60000", "--age", "70", "--allowance", "7000"]);
        let request = cmd.build_request(&TaxTables::year_2024());

        assert_eq!(request.age, Some(70));
        assert_eq!(request.personal_allowance, Some(dec!(7000)));
    }

    // =========================================================================
    // exec tests
    // =========================================================================

    #[test]
    fn test_exec_rejects_an_age_above_120() {
        let cmd = parse(&["60000", "--age", "121"]);
        let err = cmd.exec().unwrap_err();

        assert!(err.to_string().contains("age must be between 0 and 120"));
    }

    #[test]
    fn test_exec_reports_a_missing_rate_file() {
        let cmd = parse(&["60000", "--tables", "no-such-rates.csv"]);
        let err = cmd.exec().unwrap_err();

        assert!(err.to_string().contains("no-such-rates.csv"));
    }

    #[test]
    fn test_exec_surfaces_engine_validation_errors() {
        let cmd = parse(&["60000", "--ss-rate", "1.5"]);

        assert!(cmd.exec().is_err());
    }
}
