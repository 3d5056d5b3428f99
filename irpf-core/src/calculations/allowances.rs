//! Personal and dependent allowance resolution.

use rust_decimal::Decimal;

use crate::models::{AllowanceTable, Dependents};

/// Resolves allowance amounts from a configured table.
///
/// Resolution is pure table lookup and arithmetic. Whether an
/// allowance applies at all (the flat-rate regime and self-employed
/// taxpayers skip some) is the engine's decision, not this type's.
pub struct AllowanceResolver<'a> {
    table: &'a AllowanceTable,
}

impl<'a> AllowanceResolver<'a> {
    pub fn new(table: &'a AllowanceTable) -> Self {
        Self { table }
    }

    /// The personal allowance for one taxpayer.
    ///
    /// An explicit override replaces the lookup entirely, even when it
    /// is zero. Otherwise the age selects the tier, with unspecified
    /// ages falling into the base tier.
    pub fn personal_allowance(
        &self,
        age: Option<u32>,
        override_amount: Option<Decimal>,
    ) -> Decimal {
        if let Some(amount) = override_amount {
            return amount;
        }

        match age {
            Some(age) if age >= self.table.elder_age => self.table.personal_elder,
            Some(age) if age >= self.table.senior_age => self.table.personal_senior,
            _ => self.table.personal_base,
        }
    }

    /// The combined dependent and household allowance.
    pub fn dependent_allowance(&self, dependents: &Dependents) -> Decimal {
        self.children_allowance(dependents)
            + self.ascendants_allowance(dependents)
            + self.family_allowance(dependents)
            + self.taxpayer_disability_allowance(dependents)
    }

    /// Children counted by birth order, plus one under-3 bonus per
    /// child under 3 and per-child disability additions.
    fn children_allowance(&self, dependents: &Dependents) -> Decimal {
        let mut total = Decimal::ZERO;

        for position in 0..dependents.total_children() {
            total += self.child_amount_by_order(position as usize);
        }

        total += Decimal::from(dependents.children_under_3) * self.table.child_under_3_bonus;
        total += Decimal::from(dependents.children_disability_33) * self.table.child_disability_33;
        total += Decimal::from(dependents.children_disability_65) * self.table.child_disability_65;

        total
    }

    /// The birth-order amount for a zero-based child position.
    /// Positions past the end of the table reuse its last amount.
    fn child_amount_by_order(&self, position: usize) -> Decimal {
        let amounts = &self.table.child_by_order;
        match amounts.get(position) {
            Some(amount) => *amount,
            None => amounts.last().copied().unwrap_or(Decimal::ZERO),
        }
    }

    fn ascendants_allowance(&self, dependents: &Dependents) -> Decimal {
        Decimal::from(dependents.ascendants_over_65) * self.table.ascendant_over_65
            + Decimal::from(dependents.ascendants_disability_33) * self.table.ascendant_disability_33
            + Decimal::from(dependents.ascendants_disability_65) * self.table.ascendant_disability_65
    }

    /// Large-family and single-parent amounts. The special category
    /// replaces the general one when both are declared.
    fn family_allowance(&self, dependents: &Dependents) -> Decimal {
        let mut total = Decimal::ZERO;

        if dependents.large_family_special {
            total += self.table.large_family_special;
        } else if dependents.large_family {
            total += self.table.large_family;
        }

        if dependents.single_parent {
            total += self.table.single_parent;
        }

        total
    }

    /// Taxpayer disability amount. Only the highest-priority declared
    /// condition counts: dependency assistance, then 65%+ disability,
    /// then reduced mobility, then 33%+ disability.
    fn taxpayer_disability_allowance(&self, dependents: &Dependents) -> Decimal {
        if dependents.dependency_assistance {
            self.table.dependency_assistance
        } else if dependents.disability_65 {
            self.table.taxpayer_disability_65
        } else if dependents.reduced_mobility {
            self.table.reduced_mobility
        } else if dependents.disability_33 {
            self.table.taxpayer_disability_33
        } else {
            Decimal::ZERO
        }
    }
}
