//! Marginal allocation of taxable income across a bracket schedule.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::models::{BracketSchedule, TaxBreakdownEntry};

/// Outcome of allocating taxable income across one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketAllocation {
    /// Total tax over all bands. Always equals the sum of the entry
    /// taxes.
    pub tax: Decimal,

    /// One entry per band that received income, in ascending band
    /// order.
    pub entries: Vec<TaxBreakdownEntry>,
}

/// Splits `taxable_income` across the schedule's bands and taxes each
/// slice at its marginal rate.
///
/// Each band's tax is rounded to cents on its own and the total is the
/// sum of the rounded entries, so the breakdown reconciles with the
/// total exactly. Bands that receive no income produce no entry, and
/// the empty schedule yields zero tax.
pub fn allocate(taxable_income: Decimal, schedule: &BracketSchedule) -> BracketAllocation {
    debug_assert!(taxable_income >= Decimal::ZERO);

    let mut entries = Vec::new();
    let mut tax = Decimal::ZERO;
    let mut remaining = taxable_income;

    for bracket in schedule.brackets() {
        if remaining <= Decimal::ZERO {
            break;
        }

        // Highest income this band can see, capped by what was earned.
        let ceiling = match bracket.upper {
            Some(upper) => upper.min(taxable_income),
            None => taxable_income,
        };
        if ceiling <= bracket.lower {
            continue;
        }

        let amount_taxed = remaining.min(ceiling - bracket.lower);
        let band_tax = round_half_up(amount_taxed * bracket.rate);

        entries.push(TaxBreakdownEntry {
            bracket: *bracket,
            amount_taxed,
            tax: band_tax,
        });
        tax += band_tax;
        remaining -= amount_taxed;
    }

    BracketAllocation { tax, entries }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Bracket;

    fn state_schedule() -> BracketSchedule {
        BracketSchedule::new(vec![
            Bracket::new(dec!(0), Some(dec!(12450)), dec!(0.19)),
            Bracket::new(dec!(12450), Some(dec!(20200)), dec!(0.24)),
            Bracket::new(dec!(20200), Some(dec!(35200)), dec!(0.30)),
            Bracket::new(dec!(35200), Some(dec!(60000)), dec!(0.37)),
            Bracket::new(dec!(60000), Some(dec!(300000)), dec!(0.45)),
            Bracket::new(dec!(300000), None, dec!(0.47)),
        ])
        .unwrap()
    }

    #[test]
    fn allocate_zero_income_yields_no_tax_and_no_entries() {
        let allocation = allocate(dec!(0), &state_schedule());

        assert_eq!(allocation.tax, dec!(0));
        assert_eq!(allocation.entries, vec![]);
    }

    #[test]
    fn allocate_income_within_first_band() {
        let allocation = allocate(dec!(10000), &state_schedule());

        // 10000 * 0.19 = 1900.00
        assert_eq!(allocation.tax, dec!(1900.00));
        assert_eq!(allocation.entries.len(), 1);
        assert_eq!(allocation.entries[0].amount_taxed, dec!(10000));
        assert_eq!(allocation.entries[0].bracket.rate, dec!(0.19));
    }

    #[test]
    fn allocate_income_exactly_at_band_boundary_stays_in_lower_band() {
        let allocation = allocate(dec!(12450), &state_schedule());

        // 12450 * 0.19 = 2365.50, nothing reaches the 24% band
        assert_eq!(allocation.tax, dec!(2365.50));
        assert_eq!(allocation.entries.len(), 1);
    }

    #[test]
    fn allocate_income_spanning_three_bands() {
        let allocation = allocate(dec!(30000), &state_schedule());

        // 12450 * 0.19 + 7750 * 0.24 + 9800 * 0.30
        assert_eq!(allocation.tax, dec!(7165.50));
        assert_eq!(allocation.entries.len(), 3);
        assert_eq!(allocation.entries[0].tax, dec!(2365.50));
        assert_eq!(allocation.entries[1].tax, dec!(1860.00));
        assert_eq!(allocation.entries[2].tax, dec!(2940.00));
        assert_eq!(allocation.entries[2].amount_taxed, dec!(9800));
    }

    #[test]
    fn allocate_income_reaching_the_unbounded_band() {
        let allocation = allocate(dec!(350000), &state_schedule());

        // 2365.50 + 1860 + 4500 + 9176 + 108000 + 50000 * 0.47
        assert_eq!(allocation.tax, dec!(149401.50));
        assert_eq!(allocation.entries.len(), 6);

        let top = &allocation.entries[5];
        assert_eq!(top.bracket.upper, None);
        assert_eq!(top.amount_taxed, dec!(50000));
        assert_eq!(top.tax, dec!(23500.00));
    }

    #[test]
    fn allocate_against_empty_schedule_yields_zero() {
        let allocation = allocate(dec!(50000), &BracketSchedule::empty());

        assert_eq!(allocation.tax, dec!(0));
        assert_eq!(allocation.entries, vec![]);
    }

    #[test]
    fn allocate_rounds_each_band_to_cents() {
        let schedule = BracketSchedule::new(vec![
            Bracket::new(dec!(0), Some(dec!(100)), dec!(0.19)),
            Bracket::new(dec!(100), None, dec!(0.24)),
        ])
        .unwrap();

        let allocation = allocate(dec!(100.10), &schedule);

        // 100 * 0.19 = 19.00, 0.10 * 0.24 = 0.024 -> 0.02
        assert_eq!(allocation.entries[0].tax, dec!(19.00));
        assert_eq!(allocation.entries[1].tax, dec!(0.02));
        assert_eq!(allocation.tax, dec!(19.02));
    }

    #[test]
    fn allocate_entry_taxes_sum_to_the_total() {
        for income in [dec!(8000), dec!(19999.99), dec!(61234.56), dec!(500000)] {
            let allocation = allocate(income, &state_schedule());
            let entry_sum: Decimal = allocation.entries.iter().map(|entry| entry.tax).sum();

            assert_eq!(allocation.tax, entry_sum);
        }
    }

    #[test]
    fn allocate_amounts_taxed_sum_to_the_income() {
        let allocation = allocate(dec!(45000), &state_schedule());
        let amount_sum: Decimal = allocation
            .entries
            .iter()
            .map(|entry| entry.amount_taxed)
            .sum();

        assert_eq!(amount_sum, dec!(45000));
    }

    #[test]
    fn allocate_tax_never_decreases_as_income_rises() {
        let schedule = state_schedule();
        let mut previous = dec!(0);

        let mut income = dec!(0);
        while income <= dec!(400000) {
            let allocation = allocate(income, &schedule);

            assert!(
                allocation.tax >= previous,
                "tax fell from {previous} to {} at income {income}",
                allocation.tax
            );
            previous = allocation.tax;
            income += dec!(7919);
        }
    }
}
