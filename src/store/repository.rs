//! Typed access to the persisted tables.

use chrono::FixedOffset;
use tracing::debug;

use crate::error::FleetResult;
use crate::models::{Shift, Transaction};

use super::codec::{
    decode_table, shift_from_row, shift_to_row, transaction_from_row, transaction_to_row,
};
use super::table::{Row, Table};
use super::TableStore;

/// Loads and replaces shifts and transactions through a [`TableStore`].
///
/// Every load returns a fresh snapshot (subject to any cache in the store);
/// every save writes the whole table back.
pub struct Repository {
    store: Box<dyn TableStore>,
    offset: FixedOffset,
}

impl Repository {
    /// Creates a repository. `offset` is used to read legacy naive timestamps.
    pub fn new(store: Box<dyn TableStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    fn load_rows(&self, table: Table) -> FleetResult<Vec<Row>> {
        let rows = self
            .store
            .load_table(table)
            .map_err(|e| e.into_fleet_error(table))?;
        debug!(table = %table, rows = rows.len(), "loaded table");
        Ok(rows)
    }

    fn save_rows(&self, table: Table, rows: &[Row]) -> FleetResult<()> {
        self.store
            .save_table(table, rows)
            .map_err(|e| e.into_fleet_error(table))?;
        debug!(table = %table, rows = rows.len(), "saved table");
        Ok(())
    }

    /// Loads every shift, in table order.
    pub fn load_shifts(&self) -> FleetResult<Vec<Shift>> {
        let rows = self.load_rows(Table::Shifts)?;
        decode_table(Table::Shifts, &rows, self.offset, shift_from_row)
    }

    /// Replaces the shifts table.
    pub fn save_shifts(&self, shifts: &[Shift]) -> FleetResult<()> {
        let rows: Vec<Row> = shifts.iter().map(shift_to_row).collect();
        self.save_rows(Table::Shifts, &rows)
    }

    /// Loads every transaction, in table order.
    pub fn load_transactions(&self) -> FleetResult<Vec<Transaction>> {
        let rows = self.load_rows(Table::Transactions)?;
        decode_table(Table::Transactions, &rows, self.offset, transaction_from_row)
    }

    /// Replaces the transactions table.
    pub fn save_transactions(&self, transactions: &[Transaction]) -> FleetResult<()> {
        let rows: Vec<Row> = transactions.iter().map(transaction_to_row).collect();
        self.save_rows(Table::Transactions, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreSettings;
    use crate::error::FleetError;
    use crate::models::{ApprovalStatus, Party, Source, TransactionType};
    use crate::store::{CachedStore, MemoryStore};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn repository(backend: &MemoryStore) -> Repository {
        let cached = CachedStore::new(Box::new(backend.clone()), &StoreSettings::immediate());
        Repository::new(Box::new(cached), FixedOffset::east_opt(3 * 3600).unwrap())
    }

    fn advance(id: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
            party: Party::Driver("Saood".to_string()),
            kind: TransactionType::Advance,
            amount: Decimal::new(2505, 1),
            method: "Cash".to_string(),
            notes: "rent".to_string(),
            approval: ApprovalStatus::Approved,
            source: Source::Manager,
        }
    }

    #[test]
    fn test_transactions_survive_save_and_load() {
        let backend = MemoryStore::new();
        let repo = repository(&backend);

        repo.save_transactions(&[advance("t1"), advance("t2")]).unwrap();
        let loaded = repo.load_transactions().unwrap();

        assert_eq!(loaded, vec![advance("t1"), advance("t2")]);
        assert_eq!(backend.rows(Table::Transactions)[0].get("Amount"), "250.5");
    }

    #[test]
    fn test_empty_save_is_a_store_write_error() {
        let backend = MemoryStore::new();
        let repo = repository(&backend);

        match repo.save_shifts(&[]) {
            Err(FleetError::StoreWrite { table, .. }) => assert_eq!(table, "shifts_log"),
            other => panic!("Expected StoreWrite, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_enum_text_fails_the_load() {
        let backend = MemoryStore::new();
        let mut row = transaction_to_row(&advance("t1"));
        row.set("Type", "Bonus");
        backend.save_table(Table::Transactions, &[row]).unwrap();

        match repository(&backend).load_transactions() {
            Err(FleetError::Validation { field, message }) => {
                assert_eq!(field, "transactions_log.Type");
                assert!(message.contains("t1"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_rate_limited_load_exhaustion_is_store_unavailable() {
        let backend = MemoryStore::new();
        backend.rate_limit_next(10);

        assert!(matches!(
            repository(&backend).load_shifts(),
            Err(FleetError::StoreUnavailable { .. })
        ));
    }
}
