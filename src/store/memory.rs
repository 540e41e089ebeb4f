//! In-memory table store for tests and embedding.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::table::{Row, Table};
use super::{StoreError, TableStore};

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<Table, Vec<Row>>,
    rate_limited_calls: u32,
    loads: u32,
    saves: u32,
}

/// A [`TableStore`] holding its tables in memory.
///
/// Clones share the same tables, so a test can keep a handle while the
/// engine owns another.
///
/// # Example
///
/// ```
/// use fleet_ledger::store::{MemoryStore, Row, Table, TableStore};
///
/// let store = MemoryStore::new();
/// let row: Row = [("Trans_ID", "t1")].into_iter().collect();
/// store.save_table(Table::Transactions, &[row]).unwrap();
/// assert_eq!(store.load_table(Table::Transactions).unwrap().len(), 1);
/// assert!(store.load_table(Table::Shifts).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Creates a store with both tables empty.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Makes the next `calls` load or save calls fail as rate limited.
    pub fn rate_limit_next(&self, calls: u32) {
        self.with_state(|state| state.rate_limited_calls = calls);
    }

    /// Returns how many loads reached the tables.
    pub fn load_count(&self) -> u32 {
        self.with_state(|state| state.loads)
    }

    /// Returns how many saves reached the tables.
    pub fn save_count(&self) -> u32 {
        self.with_state(|state| state.saves)
    }

    /// Returns the stored rows without counting a load.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.with_state(|state| state.tables.get(&table).cloned().unwrap_or_default())
    }

    fn take_rate_limit(state: &mut MemoryState, table: Table) -> Result<(), StoreError> {
        if state.rate_limited_calls > 0 {
            state.rate_limited_calls -= 1;
            return Err(StoreError::RateLimited(format!(
                "quota exceeded for {}",
                table
            )));
        }
        Ok(())
    }
}

impl TableStore for MemoryStore {
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        self.with_state(|state| {
            Self::take_rate_limit(state, table)?;
            state.loads += 1;
            Ok(state.tables.get(&table).cloned().unwrap_or_default())
        })
    }

    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError> {
        self.with_state(|state| {
            Self::take_rate_limit(state, table)?;
            state.saves += 1;
            state.tables.insert(table, rows.to_vec());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> Row {
        [("Shift_ID", id)].into_iter().collect()
    }

    #[test]
    fn test_clones_share_tables() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save_table(Table::Shifts, &[row("a")]).unwrap();
        assert_eq!(handle.rows(Table::Shifts), vec![row("a")]);
    }

    #[test]
    fn test_rate_limit_applies_to_next_calls_only() {
        let store = MemoryStore::new();
        store.rate_limit_next(2);
        assert!(matches!(
            store.load_table(Table::Shifts),
            Err(StoreError::RateLimited(_))
        ));
        assert!(matches!(
            store.save_table(Table::Shifts, &[row("a")]),
            Err(StoreError::RateLimited(_))
        ));
        assert!(store.load_table(Table::Shifts).is_ok());
        assert_eq!(store.load_count(), 1);
        assert_eq!(store.save_count(), 0);
    }
}
