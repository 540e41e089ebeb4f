//! JSON file table store used by the binary.
//!
//! Each table lives in `<data_dir>/<table name>.json` as an array of row
//! objects. Writes go to a sibling temporary file that is then renamed over
//! the table file, so readers never see a half-written table.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::table::{Row, Table};
use super::{StoreError, TableStore};

/// A [`TableStore`] keeping each table in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the file backing `table`.
    pub fn table_path(&self, table: Table) -> PathBuf {
        self.dir.join(format!("{}.json", table.name()))
    }
}

impl TableStore for JsonFileStore {
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        let path = self.table_path(table);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "table file absent, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Read(format!("{}: {}", path.display(), e)))
    }

    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError> {
        let path = self.table_path(table);
        let write_error = |e: std::io::Error| StoreError::Write(format!("{}: {}", path.display(), e));

        fs::create_dir_all(&self.dir).map_err(write_error)?;
        let body = serde_json::to_string_pretty(rows)
            .map_err(|e| StoreError::Write(format!("{}: {}", path.display(), e)))?;

        let temp = path.with_extension("json.tmp");
        fs::write(&temp, body).map_err(write_error)?;
        fs::rename(&temp, &path).map_err(write_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_dir(name: &str) -> PathBuf {
        env::temp_dir().join(format!(
            "fleet-ledger-store-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ))
    }

    fn row(id: &str, driver: &str) -> Row {
        [("Trans_ID", id), ("Driver", driver)].into_iter().collect()
    }

    #[test]
    fn test_missing_file_loads_as_empty_table() {
        let store = JsonFileStore::new(scratch_dir("missing"));
        assert!(store.load_table(Table::Shifts).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_replaces_whole_table() {
        let dir = scratch_dir("replace");
        let store = JsonFileStore::new(&dir);

        store
            .save_table(
                Table::Transactions,
                &[row("t1", "Sunny"), row("t2", "Ijaz")],
            )
            .unwrap();
        store
            .save_table(Table::Transactions, &[row("t2", "Ijaz")])
            .unwrap();

        let rows = store.load_table(Table::Transactions).unwrap();
        assert_eq!(rows, vec![row("t2", "Ijaz")]);
        assert!(store.table_path(Table::Transactions).exists());
        assert!(!dir.join("transactions_log.json.tmp").exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_file_is_a_read_error() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let store = JsonFileStore::new(&dir);
        fs::write(store.table_path(Table::Shifts), "{ not json").unwrap();

        assert!(matches!(
            store.load_table(Table::Shifts),
            Err(StoreError::Read(_))
        ));
        fs::remove_dir_all(&dir).ok();
    }
}
