//! Domain models shared by the calculation engine and its callers.

mod bracket;
mod dependents;
mod employment;
mod regime;
mod region;
mod request;
mod result;
mod tables;

pub use bracket::{Bracket, BracketSchedule, ScheduleError};
pub use dependents::Dependents;
pub use employment::{EmploymentMode, SelfEmployment};
pub use regime::Regime;
pub use region::Region;
pub use request::{RequestError, TaxRequest};
pub use result::{TaxBreakdownEntry, TaxResult};
pub use tables::{AllowanceTable, ContributionTable, FlatRegimeTable, TablesError, TaxTables};
