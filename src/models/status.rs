//! Closed enumerations governing the shift and transaction lifecycles.
//!
//! Each enum carries its persisted spelling (the text stored in the table
//! cells) through [`as_str`](ShiftStatus::as_str) and [`FromStr`], and uses
//! the same spelling on the JSON wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FleetError;

/// Lifecycle state of a shift.
///
/// `PendingStart`, `Active` and `PendingEnd` are non-terminal: a driver or a
/// vehicle may hold at most one shift in any of them.
///
/// # Example
///
/// ```
/// use fleet_ledger::models::ShiftStatus;
/// use std::str::FromStr;
///
/// let status = ShiftStatus::from_str("Pending_End").unwrap();
/// assert_eq!(status, ShiftStatus::PendingEnd);
/// assert!(status.is_open());
/// assert!(!ShiftStatus::Completed.is_open());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftStatus {
    /// Start requested, waiting for admin approval.
    #[serde(rename = "Pending_Start")]
    PendingStart,
    /// Vehicle is on the road.
    Active,
    /// End requested with earnings, waiting for admin approval.
    #[serde(rename = "Pending_End")]
    PendingEnd,
    /// End approved; earnings count towards salary and reports.
    Completed,
}

impl ShiftStatus {
    /// Returns the persisted spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::PendingStart => "Pending_Start",
            ShiftStatus::Active => "Active",
            ShiftStatus::PendingEnd => "Pending_End",
            ShiftStatus::Completed => "Completed",
        }
    }

    /// Returns true while the shift still occupies its driver and vehicle.
    pub fn is_open(&self) -> bool {
        !matches!(self, ShiftStatus::Completed)
    }

    /// Returns true when the shift is waiting in the approval queue.
    pub fn is_pending(&self) -> bool {
        matches!(self, ShiftStatus::PendingStart | ShiftStatus::PendingEnd)
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftStatus {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending_Start" => Ok(ShiftStatus::PendingStart),
            "Active" => Ok(ShiftStatus::Active),
            "Pending_End" => Ok(ShiftStatus::PendingEnd),
            // Older sheets wrote "Complete".
            "Completed" | "Complete" => Ok(ShiftStatus::Completed),
            other => Err(FleetError::validation(
                "Status",
                format!("unknown shift status '{}'", other),
            )),
        }
    }
}

/// Approval gate state shared by shifts and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalStatus {
    /// Waiting for an admin decision; excluded from every aggregate.
    Pending,
    /// Committed.
    Approved,
}

impl ApprovalStatus {
    /// Returns the persisted spelling of the approval status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pending",
            ApprovalStatus::Approved => "Approved",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(ApprovalStatus::Pending),
            "Approved" => Ok(ApprovalStatus::Approved),
            other => Err(FleetError::validation(
                "Approval_Status",
                format!("unknown approval status '{}'", other),
            )),
        }
    }
}

/// Kind of money movement recorded in the ledger.
///
/// # Example
///
/// ```
/// use fleet_ledger::models::TransactionType;
///
/// assert_eq!(TransactionType::CeoTransfer.as_str(), "CEO_Transfer");
/// assert_eq!("Challan".parse::<TransactionType>().unwrap(), TransactionType::Challan);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Cash handed over by a driver to the manager.
    Received,
    /// Advance paid out to a driver against salary.
    Advance,
    /// Cash passed on to the owner.
    #[serde(rename = "CEO_Transfer")]
    CeoTransfer,
    /// Vehicle cost such as repair or wash.
    Expense,
    /// Traffic fine, deducted from the driver's pay.
    Challan,
}

impl TransactionType {
    /// Returns the persisted spelling of the transaction type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Received => "Received",
            TransactionType::Advance => "Advance",
            TransactionType::CeoTransfer => "CEO_Transfer",
            TransactionType::Expense => "Expense",
            TransactionType::Challan => "Challan",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Received" => Ok(TransactionType::Received),
            "Advance" => Ok(TransactionType::Advance),
            "CEO_Transfer" => Ok(TransactionType::CeoTransfer),
            "Expense" => Ok(TransactionType::Expense),
            "Challan" => Ok(TransactionType::Challan),
            other => Err(FleetError::validation(
                "Type",
                format!("unknown transaction type '{}'", other),
            )),
        }
    }
}

/// The party accountable for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Initiated by, or charged to, the driver.
    Driver,
    /// Initiated by the manager.
    Manager,
}

impl Source {
    /// Returns the persisted spelling of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Driver => "Driver",
            Source::Manager => "Manager",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Driver" => Ok(Source::Driver),
            "Manager" => Ok(Source::Manager),
            other => Err(FleetError::validation(
                "Source",
                format!("unknown transaction source '{}'", other),
            )),
        }
    }
}
