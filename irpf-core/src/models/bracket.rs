use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a bracket schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// The first bracket does not start at zero.
    #[error("first bracket must start at zero, found {0}")]
    DoesNotStartAtZero(Decimal),

    /// A bracket does not continue where the previous one ended.
    #[error("bracket starting at {found} does not continue from {expected}")]
    Discontinuous { expected: Decimal, found: Decimal },

    /// A bracket's upper bound is not above its lower bound.
    #[error("bracket starting at {lower} has upper bound {upper}, which is not above it")]
    EmptyBand { lower: Decimal, upper: Decimal },

    /// An unbounded bracket appears before the end of the schedule.
    #[error("only the final bracket may be unbounded")]
    UnboundedBeforeEnd,

    /// The final bracket has an upper bound instead of extending to infinity.
    #[error("final bracket must be unbounded, found upper bound {0}")]
    BoundedTail(Decimal),

    /// A bracket rate is outside the [0, 1] range.
    #[error("bracket rate {0} is outside the range [0, 1]")]
    RateOutOfRange(Decimal),
}

/// A single marginal band within a progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    /// Lower bound of the band, inclusive.
    pub lower: Decimal,

    /// Upper bound of the band, exclusive. `None` means the band
    /// extends to infinity.
    pub upper: Option<Decimal>,

    /// Marginal rate applied to income inside the band, as a fraction
    /// (0.19 for 19%).
    pub rate: Decimal,
}

impl Bracket {
    pub fn new(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> Self {
        Self { lower, upper, rate }
    }
}

/// An ordered list of marginal bands forming a complete schedule.
///
/// A non-empty schedule starts at zero, has no gaps or overlaps, and
/// ends with a single unbounded band. The empty schedule is also valid
/// and yields zero tax on any income; it backs regions without their
/// own schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracketSchedule {
    brackets: Vec<Bracket>,
}

impl BracketSchedule {
    /// Builds a schedule after checking the band invariants.
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, ScheduleError> {
        Self::check(&brackets)?;
        Ok(Self { brackets })
    }

    /// The empty schedule. Any income allocated against it is untaxed.
    pub const fn empty() -> Self {
        Self {
            brackets: Vec::new(),
        }
    }

    /// Wraps bands without checking them. Reserved for tables defined
    /// in code; [`TaxTables::validate`](crate::TaxTables::validate)
    /// still re-checks every schedule before a computation.
    pub(crate) fn from_vec(brackets: Vec<Bracket>) -> Self {
        Self { brackets }
    }

    /// The bands in ascending order of their lower bound.
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Re-checks the band invariants.
    ///
    /// Useful for schedules that were deserialized rather than built
    /// through [`BracketSchedule::new`].
    pub fn validate(&self) -> Result<(), ScheduleError> {
        Self::check(&self.brackets)
    }

    fn check(brackets: &[Bracket]) -> Result<(), ScheduleError> {
        let mut expected_lower = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(ScheduleError::RateOutOfRange(bracket.rate));
            }

            if index == 0 {
                if bracket.lower != Decimal::ZERO {
                    return Err(ScheduleError::DoesNotStartAtZero(bracket.lower));
                }
            } else if bracket.lower != expected_lower {
                return Err(ScheduleError::Discontinuous {
                    expected: expected_lower,
                    found: bracket.lower,
                });
            }

            match bracket.upper {
                Some(upper) => {
                    if upper <= bracket.lower {
                        return Err(ScheduleError::EmptyBand {
                            lower: bracket.lower,
                            upper,
                        });
                    }
                    expected_lower = upper;
                }
                None => {
                    if index + 1 != brackets.len() {
                        return Err(ScheduleError::UnboundedBeforeEnd);
                    }
                }
            }
        }

        if let Some(Bracket {
            upper: Some(upper), ..
        }) = brackets.last()
        {
            return Err(ScheduleError::BoundedTail(*upper));
        }

        Ok(())
    }
}
