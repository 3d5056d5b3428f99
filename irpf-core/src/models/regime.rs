use serde::{Deserialize, Serialize};

use crate::models::Region;

/// The regime under which IRPF is assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Ordinary progressive taxation: the state schedule plus the
    /// regional schedule of the taxpayer's autonomous community.
    Standard {
        /// Community whose regional schedule applies.
        region: Region,
    },

    /// Flat-rate regime for inbound foreign workers (Beckham law).
    ///
    /// Taxable income up to the configured threshold is charged at a
    /// single rate; the excess falls back to the state schedule. No
    /// personal or dependent allowances apply, and no regional tax is
    /// levied.
    FlatRateForeignWorker,
}

impl Regime {
    pub fn is_flat_rate(&self) -> bool {
        matches!(self, Regime::FlatRateForeignWorker)
    }

    /// The region whose schedule applies, if the regime uses one.
    pub fn region(&self) -> Option<Region> {
        match self {
            Regime::Standard { region } => Some(*region),
            Regime::FlatRateForeignWorker => None,
        }
    }
}
