use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Autonomous communities with a configured regional IRPF schedule.
///
/// `Region::None` stands for "no regional schedule": only the state
/// schedule applies. It is both a deliberate choice (callers that want
/// state tax alone) and the fallback for unrecognised region keys.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Madrid,
    Catalonia,
    Andalusia,
    Valencia,
    Basque,
    Galicia,
    CastillaLeon,
    CanaryIslands,
    #[default]
    None,
}

impl Region {
    /// Every region, in the order used for listings.
    pub const ALL: [Region; 9] = [
        Region::Madrid,
        Region::Catalonia,
        Region::Andalusia,
        Region::Valencia,
        Region::Basque,
        Region::Galicia,
        Region::CastillaLeon,
        Region::CanaryIslands,
        Region::None,
    ];

    /// The canonical lowercase key for this region, as used in rate
    /// files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Madrid => "madrid",
            Region::Catalonia => "catalonia",
            Region::Andalusia => "andalusia",
            Region::Valencia => "valencia",
            Region::Basque => "basque",
            Region::Galicia => "galicia",
            Region::CastillaLeon => "castilla_leon",
            Region::CanaryIslands => "canary_islands",
            Region::None => "none",
        }
    }

    /// Human-readable name for reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Madrid => "Madrid",
            Region::Catalonia => "Catalonia",
            Region::Andalusia => "Andalusia",
            Region::Valencia => "Valencia",
            Region::Basque => "Basque Country",
            Region::Galicia => "Galicia",
            Region::CastillaLeon => "Castilla y León",
            Region::CanaryIslands => "Canary Islands",
            Region::None => "None",
        }
    }

    /// Parses a canonical key, case-insensitively.
    ///
    /// Returns `None` for keys that match no region.
    pub fn parse(value: &str) -> Option<Region> {
        let key = value.trim().to_lowercase();
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == key)
    }

    /// Resolves a possibly unknown key from untrusted input.
    ///
    /// Unknown keys are not an error: they degrade to [`Region::None`]
    /// after a warning, so the computation proceeds with the state
    /// schedule alone.
    pub fn from_key(value: &str) -> Region {
        match Region::parse(value) {
            Some(region) => region,
            None => {
                warn!(region = %value, "unknown region, applying state schedule only");
                Region::None
            }
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
