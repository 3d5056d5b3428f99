use serde::{Deserialize, Serialize};

/// Household circumstances that grant dependent and personal allowances.
///
/// Counts are independent of each other: a child with a disability is
/// declared once under `children_under_3` or `children_3_plus` and once
/// under the matching disability count. The default value declares no
/// dependents and no taxpayer conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependents {
    /// Dependent children under 3 years old.
    pub children_under_3: u32,

    /// Dependent children aged 3 or older.
    pub children_3_plus: u32,

    /// Children with a recognised disability of 33% or more.
    pub children_disability_33: u32,

    /// Children with a recognised disability of 65% or more.
    pub children_disability_65: u32,

    /// Ascendants over 65 living with the taxpayer.
    pub ascendants_over_65: u32,

    /// Ascendants with a recognised disability of 33% or more.
    pub ascendants_disability_33: u32,

    /// Ascendants with a recognised disability of 65% or more.
    pub ascendants_disability_65: u32,

    /// Officially recognised large family.
    pub large_family: bool,

    /// Special category large family. Takes precedence over the
    /// general category when both are set.
    pub large_family_special: bool,

    /// Single-parent household.
    pub single_parent: bool,

    /// Taxpayer disability of 33% or more.
    pub disability_33: bool,

    /// Taxpayer disability of 65% or more.
    pub disability_65: bool,

    /// Taxpayer with recognised reduced mobility.
    pub reduced_mobility: bool,

    /// Taxpayer requiring third-party dependency assistance.
    pub dependency_assistance: bool,
}

impl Dependents {
    /// Total number of dependent children, regardless of age.
    pub fn total_children(&self) -> u32 {
        self.children_under_3 + self.children_3_plus
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_declares_nothing() {
        let dependents = Dependents::default();

        assert_eq!(dependents.total_children(), 0);
        assert!(!dependents.large_family);
        assert!(!dependents.dependency_assistance);
    }

    #[test]
    fn total_children_sums_both_age_groups() {
        let dependents = Dependents {
            children_under_3: 2,
            children_3_plus: 3,
            ..Dependents::default()
        };

        assert_eq!(dependents.total_children(), 5);
    }
}
