//! Table names, column layouts and the untyped row representation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Columns of the shifts table, in sheet order.
pub const SHIFT_COLUMNS: &[&str] = &[
    "Shift_ID",
    "Driver",
    "Car",
    "Status",
    "Approval_Status",
    "Start_Time",
    "End_Time",
    "Duration",
    "Total_Earnings",
    "Start_Wallet",
    "End_Wallet",
    "Cash_Collected",
    "Start_Fuel",
    "End_Fuel",
];

/// Columns of the transactions table, in sheet order.
pub const TRANSACTION_COLUMNS: &[&str] = &[
    "Trans_ID",
    "Date",
    "Driver",
    "Type",
    "Amount",
    "Method",
    "Notes",
    "Approval_Status",
    "Source",
];

/// The two persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// One row per shift.
    Shifts,
    /// One row per ledger transaction.
    Transactions,
}

impl Table {
    /// Returns the persisted table name.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Shifts => "shifts_log",
            Table::Transactions => "transactions_log",
        }
    }

    /// Returns the required columns, in sheet order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Shifts => SHIFT_COLUMNS,
            Table::Transactions => TRANSACTION_COLUMNS,
        }
    }

    /// Returns the column holding the row identifier.
    pub fn id_column(&self) -> &'static str {
        self.columns()[0]
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One untyped table row: column name to cell text.
///
/// Missing columns read as the empty string.
///
/// # Example
///
/// ```
/// use fleet_ledger::store::Row;
///
/// let mut row = Row::new();
/// row.set("Driver", "Sunny");
/// assert_eq!(row.get("Driver"), "Sunny");
/// assert_eq!(row.get("Car"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the trimmed cell text, or "" when the column is missing.
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(|v| v.trim()).unwrap_or("")
    }

    /// Sets a cell.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        self.0.insert(column.to_string(), value.into());
    }

    /// Returns true if the row has a cell for `column`.
    pub fn has(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Iterates over the cells in column-name order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row(iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect())
    }
}
