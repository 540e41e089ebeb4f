//! Persisted table store.
//!
//! Two tables (shifts and transactions) are exposed through the
//! [`TableStore`] trait as "load all rows" and "replace all rows". Backends:
//!
//! - [`MemoryStore`] keeps the tables in memory (tests, embedding).
//! - [`JsonFileStore`] keeps one JSON file per table (the binary).
//!
//! [`CachedStore`] layers the read cache, rate-limit retries and the
//! empty-write guard over any backend, and [`Repository`] converts rows to
//! typed records at the load boundary.

mod cached;
pub mod codec;
mod file;
mod memory;
mod repository;
mod table;

use std::sync::Arc;

use thiserror::Error;

use crate::error::FleetError;

pub use cached::CachedStore;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::Repository;
pub use table::{Row, SHIFT_COLUMNS, TRANSACTION_COLUMNS, Table};

/// Failures reported by a table store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend asked the caller to slow down; the call may be retried.
    #[error("rate limited: {0}")]
    RateLimited(String),
    /// The backend could not be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// The backend returned data that could not be read.
    #[error("unreadable data: {0}")]
    Read(String),
    /// The backend failed to persist a table.
    #[error("write failed: {0}")]
    Write(String),
    /// An empty row set was offered as a full-table replacement.
    #[error("refusing to write an empty table")]
    EmptyWrite,
}

impl StoreError {
    /// Converts the backend failure into a [`FleetError`] naming `table`.
    pub fn into_fleet_error(self, table: Table) -> FleetError {
        let table_name = table.name().to_string();
        let message = self.to_string();
        match self {
            StoreError::RateLimited(_) | StoreError::Unavailable(_) => {
                FleetError::StoreUnavailable {
                    table: table_name,
                    message,
                }
            }
            StoreError::Read(_) => FleetError::StoreRead {
                table: table_name,
                message,
            },
            StoreError::Write(_) | StoreError::EmptyWrite => FleetError::StoreWrite {
                table: table_name,
                message,
            },
        }
    }
}

/// Durable storage for whole tables.
///
/// `save_table` replaces the entire table; callers always write back the
/// full snapshot they loaded and changed.
pub trait TableStore: Send + Sync {
    /// Loads every row of `table`. A table that was never written is empty.
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError>;

    /// Replaces every row of `table` with `rows`.
    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError>;
}

impl<T: TableStore + ?Sized> TableStore for Arc<T> {
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        (**self).load_table(table)
    }

    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError> {
        (**self).save_table(table, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_fleet_errors() {
        assert!(matches!(
            StoreError::Unavailable("down".to_string()).into_fleet_error(Table::Shifts),
            FleetError::StoreUnavailable { ref table, .. } if table == "shifts_log"
        ));
        assert!(matches!(
            StoreError::Read("bad json".to_string()).into_fleet_error(Table::Transactions),
            FleetError::StoreRead { ref table, .. } if table == "transactions_log"
        ));
        match StoreError::EmptyWrite.into_fleet_error(Table::Shifts) {
            FleetError::StoreWrite { message, .. } => {
                assert_eq!(message, "refusing to write an empty table");
            }
            other => panic!("Expected StoreWrite, got {:?}", other),
        }
    }
}
