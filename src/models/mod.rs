//! Core data models for the fleet ledger engine.
//!
//! This module contains the domain records (shifts and ledger transactions),
//! the closed enumerations that drive their lifecycles, and the user and
//! reporting-period types shared by the engine and the API.

mod period;
mod shift;
mod status;
mod transaction;
mod user;

pub use period::{Period, ReportTarget};
pub use shift::{Shift, elapsed_hours};
pub use status::{ApprovalStatus, ShiftStatus, Source, TransactionType};
pub use transaction::{GENERAL_PARTY, Party, Transaction};
pub use user::{Role, User};
