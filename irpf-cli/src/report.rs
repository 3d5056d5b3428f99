//! Plain text and JSON rendering of a computed estimate.
//!
//! Amounts are printed in the Spanish convention, space-separated
//! thousands with a comma before the cents, e.g. `€60 000,00`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use irpf_core::calculations::common::round_half_up;
use irpf_core::{Bracket, EmploymentMode, Regime, Region, TaxBreakdownEntry, TaxRequest, TaxResult};

const LABEL_WIDTH: usize = 25;
const MONTHLY_LABEL_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 20;

// ─── plain text report ───────────────────────────────────────────────────────

pub fn print_report(request: &TaxRequest, result: &TaxResult, verbose: bool) {
    println!();
    println!("{}", "=".repeat(60));
    println!("  Spanish Tax Estimate (IRPF + Social Security)");
    match request.regime {
        Regime::FlatRateForeignWorker => println!("  Tax Regime: Beckham Law (24% flat rate)"),
        Regime::Standard {
            region: Region::None,
        } => println!("  Region: None (State only)"),
        Regime::Standard { region } => println!("  Region: {}", region.display_name()),
    }
    println!("{}", "=".repeat(60));
    println!();

    print_summary(request, result);
    if verbose {
        print_breakdowns(request, result);
    }
    print_monthly(result);
}

fn print_summary(request: &TaxRequest, result: &TaxResult) {
    println!("Summary:");
    summary_line("Gross Income:", result.gross_income);
    summary_line("Social Security:", result.contribution_due);
    if let Some(base) = result.contribution_base {
        summary_line("Contribution Base:", base);
    }
    summary_line("Income after SS:", result.income_after_contribution);

    if !request.regime.is_flat_rate() {
        summary_line(personal_allowance_label(request.age), result.personal_allowance);
        if result.dependent_allowance > Decimal::ZERO {
            summary_line("Dependent Allowances:", result.dependent_allowance);
            summary_line("Total Allowances:", result.total_allowance);
        }
    }
    summary_line("Taxable Income (IRPF):", result.taxable_income);

    if request.regime.is_flat_rate() {
        summary_line("Beckham Law Tax (24%):", result.flat_rate_tax);
        if result.excess_tax > Decimal::ZERO {
            summary_line("Excess Tax (>€600k):", result.excess_tax);
        }
    } else {
        summary_line("State IRPF Tax:", result.state_tax);
        if result.regional_tax > Decimal::ZERO {
            summary_line("Regional IRPF Tax:", result.regional_tax);
        }
    }
    summary_line("Total IRPF Tax:", result.total_irpf);
    summary_line("Total Deductions:", result.total_deductions);
    summary_line("Net Income:", result.net_income);
    println!(
        "  {:<LABEL_WIDTH$} {:>VALUE_WIDTH$}",
        "Effective Tax Rate:",
        format!("{:.2}%", result.effective_rate)
    );
    println!();
}

fn summary_line(label: &str, amount: Decimal) {
    println!("  {label:<LABEL_WIDTH$} {:>VALUE_WIDTH$}", format_eur(amount));
}

/// Mirrors the age tiers of the builtin allowance table so the label
/// says which tier applied.
fn personal_allowance_label(age: Option<u32>) -> &'static str {
    match age {
        Some(age) if age >= 75 => "Personal Allowance (75+):",
        Some(age) if age >= 65 => "Personal Allowance (65-74):",
        _ => "Personal Allowance:",
    }
}

// ─── bracket breakdowns ──────────────────────────────────────────────────────

fn print_breakdowns(request: &TaxRequest, result: &TaxResult) {
    match request.regime {
        Regime::FlatRateForeignWorker => print_flat_breakdown(result),
        Regime::Standard { region } => print_standard_breakdown(region, result),
    }
}

fn print_standard_breakdown(region: Region, result: &TaxResult) {
    if !result.state_breakdown.is_empty() {
        println!("State IRPF Breakdown:");
        print_rows(breakdown_rows(&result.state_breakdown));
    }
    if !result.regional_breakdown.is_empty() {
        println!("Regional IRPF Breakdown ({}):", region.display_name());
        print_rows(breakdown_rows(&result.regional_breakdown));
    }
}

fn print_flat_breakdown(result: &TaxResult) {
    // Under the flat-rate regime the bracket entries cover only the
    // income above the threshold, so the flat portion is what remains.
    let excess_amount: Decimal = result
        .state_breakdown
        .iter()
        .map(|entry| entry.amount_taxed)
        .sum();
    let flat_portion = result.taxable_income - excess_amount;

    println!("Beckham Law Breakdown:");
    let mut rows = vec![BreakdownRow {
        bracket: "Up to €600 000".to_string(),
        rate: format_percentage(dec!(0.24)),
        amount: format_eur(flat_portion),
        tax: format_eur(result.flat_rate_tax),
    }];
    if excess_amount > Decimal::ZERO {
        rows.push(BreakdownRow {
            bracket: "Above €600 000".to_string(),
            rate: "progressive".to_string(),
            amount: format_eur(excess_amount),
            tax: format_eur(result.excess_tax),
        });
    }
    print_rows(rows);

    if !result.state_breakdown.is_empty() {
        println!("Progressive Tax on Excess (>€600k):");
        print_rows(breakdown_rows(&result.state_breakdown));
    }
}

#[derive(Debug, Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Bracket")]
    bracket: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

fn breakdown_rows(entries: &[TaxBreakdownEntry]) -> Vec<BreakdownRow> {
    entries
        .iter()
        .map(|entry| BreakdownRow {
            bracket: format_bracket_range(&entry.bracket),
            rate: format_percentage(entry.bracket.rate),
            amount: format_eur(entry.amount_taxed),
            tax: format_eur(entry.tax),
        })
        .collect()
}

fn print_rows(rows: Vec<BreakdownRow>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();

    println!("{table}");
    println!();
}

// ─── monthly breakdown ───────────────────────────────────────────────────────

fn print_monthly(result: &TaxResult) {
    let months = dec!(12);

    println!("Monthly Breakdown:");
    monthly_line("Gross:", result.gross_income / months);
    monthly_line("Social Security:", result.contribution_due / months);
    monthly_line("State IRPF:", result.state_tax / months);
    if result.regional_tax > Decimal::ZERO {
        monthly_line("Regional IRPF:", result.regional_tax / months);
    }
    monthly_line("Total IRPF:", result.total_irpf / months);
    monthly_line("Total Deductions:", result.total_deductions / months);
    monthly_line("Net:", result.net_income / months);
    println!();
}

fn monthly_line(label: &str, amount: Decimal) {
    println!(
        "  {label:<MONTHLY_LABEL_WIDTH$} {:>VALUE_WIDTH$}",
        format_eur(round_half_up(amount))
    );
}

// ─── JSON output ─────────────────────────────────────────────────────────────

pub fn print_json(request: &TaxRequest, result: &TaxResult) -> anyhow::Result<()> {
    let data = EstimateData::new(request, result);
    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}

#[derive(Debug, Serialize)]
struct EstimateData {
    regime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    employment: String,
    gross_income: String,
    social_security: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    contribution_base: Option<String>,
    income_after_social_security: String,
    personal_allowance: String,
    dependent_allowances: String,
    total_allowances: String,
    taxable_income: String,
    state_tax: String,
    regional_tax: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    flat_rate_tax: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    excess_tax: Option<String>,
    total_irpf: String,
    total_deductions: String,
    net_income: String,
    effective_rate: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    state_breakdown: Vec<BreakdownData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    regional_breakdown: Vec<BreakdownData>,
}

#[derive(Debug, Serialize)]
struct BreakdownData {
    lower: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper: Option<String>,
    rate: String,
    amount_taxed: String,
    tax: String,
}

impl EstimateData {
    fn new(request: &TaxRequest, result: &TaxResult) -> Self {
        let regime = match request.regime {
            Regime::Standard { .. } => "standard",
            Regime::FlatRateForeignWorker => "flat_rate_foreign_worker",
        };
        let region = match request.regime {
            Regime::Standard { region } if region != Region::None => {
                Some(region.as_str().to_string())
            }
            _ => None,
        };
        let employment = match request.employment {
            EmploymentMode::Employee { .. } => "employee",
            EmploymentMode::SelfEmployed(_) => "self_employed",
        };
        let flat = request.regime.is_flat_rate();

        Self {
            regime: regime.to_string(),
            region,
            employment: employment.to_string(),
            gross_income: format_amount(result.gross_income),
            social_security: format_amount(result.contribution_due),
            contribution_base: result.contribution_base.map(format_amount),
            income_after_social_security: format_amount(result.income_after_contribution),
            personal_allowance: format_amount(result.personal_allowance),
            dependent_allowances: format_amount(result.dependent_allowance),
            total_allowances: format_amount(result.total_allowance),
            taxable_income: format_amount(result.taxable_income),
            state_tax: format_amount(result.state_tax),
            regional_tax: format_amount(result.regional_tax),
            flat_rate_tax: flat.then(|| format_amount(result.flat_rate_tax)),
            excess_tax: flat.then(|| format_amount(result.excess_tax)),
            total_irpf: format_amount(result.total_irpf),
            total_deductions: format_amount(result.total_deductions),
            net_income: format_amount(result.net_income),
            effective_rate: format_amount(result.effective_rate),
            state_breakdown: breakdown_data(&result.state_breakdown),
            regional_breakdown: breakdown_data(&result.regional_breakdown),
        }
    }
}

fn breakdown_data(entries: &[TaxBreakdownEntry]) -> Vec<BreakdownData> {
    entries
        .iter()
        .map(|entry| BreakdownData {
            lower: format!("{:.0}", entry.bracket.lower),
            upper: entry.bracket.upper.map(|upper| format!("{upper:.0}")),
            rate: entry.bracket.rate.to_string(),
            amount_taxed: format_amount(entry.amount_taxed),
            tax: format_amount(entry.tax),
        })
        .collect()
}

fn format_amount(amount: Decimal) -> String {
    format!("{amount:.2}")
}

// ─── currency formatting ─────────────────────────────────────────────────────

/// Formats a euro amount with cents, `€1 234,56`.
pub(crate) fn format_eur(amount: Decimal) -> String {
    let raw = format!("{amount:.2}");
    let (units, cents) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let (sign, digits) = match units.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", units),
    };

    format!("€{sign}{},{cents}", group_thousands(digits))
}

/// Formats a euro amount without cents, `€12 450`. Used for bracket bounds.
pub(crate) fn format_eur_whole(amount: Decimal) -> String {
    let raw = format!("{amount:.0}");
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", raw.as_str()),
    };

    format!("€{sign}{}", group_thousands(digits))
}

/// `€12 450 - €20 200`, or `€300 000 - ∞` for the open-ended band.
pub(crate) fn format_bracket_range(bracket: &Bracket) -> String {
    match bracket.upper {
        Some(upper) => format!(
            "{} - {}",
            format_eur_whole(bracket.lower),
            format_eur_whole(upper)
        ),
        None => format!("{} - ∞", format_eur_whole(bracket.lower)),
    }
}

/// `19.00%` for a fractional rate of `0.19`.
pub(crate) fn format_percentage(rate: Decimal) -> String {
    format!("{:.2}%", rate * Decimal::ONE_HUNDRED)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use irpf_core::{TaxEngine, TaxTables};

    use super::*;

    // =========================================================================
    // currency formatting tests
    // =========================================================================

    #[test]
    fn test_format_eur_groups_thousands_with_spaces() {
        assert_eq!(format_eur(dec!(1234.56)), "€1 234,56");
        assert_eq!(format_eur(dec!(60000)), "€60 000,00");
        assert_eq!(format_eur(dec!(1000000)), "€1 000 000,00");
    }

    #[test]
    fn test_format_eur_small_amounts_have_no_grouping() {
        assert_eq!(format_eur(dec!(0)), "€0,00");
        assert_eq!(format_eur(dec!(999.9)), "€999,90");
    }

    #[test]
    fn test_format_eur_keeps_the_sign_inside_the_symbol() {
        assert_eq!(format_eur(dec!(-3423.53)), "€-3 423,53");
    }

    #[test]
    fn test_format_eur_whole_drops_the_cents() {
        assert_eq!(format_eur_whole(dec!(12450)), "€12 450");
        assert_eq!(format_eur_whole(dec!(300000)), "€300 000");
    }

    #[test]
    fn test_format_bracket_range_shows_both_bounds() {
        let bracket = Bracket::new(dec!(12450), Some(dec!(20200)), dec!(0.24));
        assert_eq!(format_bracket_range(&bracket), "€12 450 - €20 200");
    }

    #[test]
    fn test_format_bracket_range_marks_the_open_end() {
        let bracket = Bracket::new(dec!(300000), None, dec!(0.47));
        assert_eq!(format_bracket_range(&bracket), "€300 000 - ∞");
    }

    #[test]
    fn test_format_percentage_scales_the_fraction() {
        assert_eq!(format_percentage(dec!(0.19)), "19.00%");
        assert_eq!(format_percentage(dec!(0.0635)), "6.35%");
    }

    #[test]
    fn test_personal_allowance_label_follows_the_age_tiers() {
        assert_eq!(personal_allowance_label(None), "Personal Allowance:");
        assert_eq!(personal_allowance_label(Some(40)), "Personal Allowance:");
        assert_eq!(
            personal_allowance_label(Some(65)),
            "Personal Allowance (65-74):"
        );
        assert_eq!(
            personal_allowance_label(Some(80)),
            "Personal Allowance (75+):"
        );
    }

    // =========================================================================
    // JSON shape tests
    // =========================================================================

    #[test]
    fn test_estimate_data_for_a_standard_request() {
        let tables = TaxTables::year_2024();
        let request = TaxRequest::employee(dec!(60000), dec!(0.0635), Region::Madrid);
        let result = TaxEngine::new(&tables).compute(&request).expect("estimate");

        let data = EstimateData::new(&request, &result);

        assert_eq!(data.regime, "standard");
        assert_eq!(data.region.as_deref(), Some("madrid"));
        assert_eq!(data.employment, "employee");
        assert_eq!(data.gross_income, "60000.00");
        assert_eq!(data.state_tax, "14438.30");
        assert_eq!(data.regional_tax, "5398.30");
        assert_eq!(data.flat_rate_tax, None);
        assert_eq!(data.state_breakdown.len(), 4);
    }

    #[test]
    fn test_estimate_data_for_a_flat_rate_request() {
        let tables = TaxTables::year_2024();
        let request = TaxRequest {
            regime: Regime::FlatRateForeignWorker,
            ..TaxRequest::employee(dec!(100000), dec!(0.0635), Region::None)
        };
        let result = TaxEngine::new(&tables).compute(&request).expect("estimate");

        let data = EstimateData::new(&request, &result);

        assert_eq!(data.regime, "flat_rate_foreign_worker");
        assert_eq!(data.region, None);
        assert_eq!(data.flat_rate_tax.as_deref(), Some("22476.00"));
        assert_eq!(data.excess_tax.as_deref(), Some("0.00"));
        assert!(data.state_breakdown.is_empty());
    }

    #[test]
    fn test_breakdown_data_keeps_the_raw_bracket_bounds() {
        let entries = [TaxBreakdownEntry {
            bracket: Bracket::new(dec!(12450), Some(dec!(20200)), dec!(0.24)),
            amount_taxed: dec!(7750),
            tax: dec!(1860.00),
        }];

        let data = breakdown_data(&entries);

        assert_eq!(data[0].lower, "12450");
        assert_eq!(data[0].upper.as_deref(), Some("20200"));
        assert_eq!(data[0].rate, "0.24");
        assert_eq!(data[0].amount_taxed, "7750.00");
        assert_eq!(data[0].tax, "1860.00");
    }
}
