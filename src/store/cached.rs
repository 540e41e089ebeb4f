//! Read cache and rate-limit retry around a backend store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::StoreSettings;

use super::table::{Row, Table};
use super::{StoreError, TableStore};

#[derive(Debug)]
struct CacheEntry {
    rows: Vec<Row>,
    loaded_at: Instant,
}

/// Cached tables plus a per-table write generation.
///
/// A load only fills the cache if no write started after the load began.
#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<Table, CacheEntry>,
    generations: HashMap<Table, u64>,
}

impl CacheState {
    fn generation(&self, table: Table) -> u64 {
        self.generations.get(&table).copied().unwrap_or(0)
    }
}

/// Wraps a backend with a short-lived read cache, bounded retries on rate
/// limiting and a guard against empty full-table writes.
///
/// A write invalidates the cached copy of that table, and a read that was
/// already in flight when the write began is not cached. A TTL of zero
/// disables caching.
///
/// # Example
///
/// ```
/// use fleet_ledger::config::StoreSettings;
/// use fleet_ledger::store::{CachedStore, MemoryStore, StoreError, Table, TableStore};
///
/// let store = CachedStore::new(Box::new(MemoryStore::new()), &StoreSettings::immediate());
/// assert!(matches!(
///     store.save_table(Table::Shifts, &[]),
///     Err(StoreError::EmptyWrite)
/// ));
/// ```
pub struct CachedStore {
    inner: Box<dyn TableStore>,
    ttl: Duration,
    max_attempts: u32,
    read_delay: Duration,
    write_delay: Duration,
    cache: Mutex<CacheState>,
}

impl CachedStore {
    /// Wraps `inner` using the cache and retry settings from `settings`.
    pub fn new(inner: Box<dyn TableStore>, settings: &StoreSettings) -> Self {
        Self {
            inner,
            ttl: settings.cache_ttl(),
            max_attempts: settings.retry.max_attempts.max(1),
            read_delay: Duration::from_millis(settings.retry.read_delay_ms),
            write_delay: Duration::from_millis(settings.retry.write_delay_ms),
            cache: Mutex::new(CacheState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached(&self, table: Table) -> Option<Vec<Row>> {
        if self.ttl.is_zero() {
            return None;
        }
        self.state()
            .entries
            .get(&table)
            .filter(|entry| entry.loaded_at.elapsed() < self.ttl)
            .map(|entry| entry.rows.clone())
    }

    fn generation(&self, table: Table) -> u64 {
        self.state().generation(table)
    }

    /// Caches `rows` unless a write to `table` began after `generation`.
    fn remember(&self, table: Table, generation: u64, rows: &[Row]) {
        if self.ttl.is_zero() {
            return;
        }
        let mut state = self.state();
        if state.generation(table) != generation {
            debug!(table = %table, "table changed during load, not caching");
            return;
        }
        state.entries.insert(
            table,
            CacheEntry {
                rows: rows.to_vec(),
                loaded_at: Instant::now(),
            },
        );
    }

    fn invalidate(&self, table: Table) {
        let mut state = self.state();
        state.entries.remove(&table);
        *state.generations.entry(table).or_insert(0) += 1;
    }

    fn with_retry<T>(
        &self,
        table: Table,
        operation: &'static str,
        delay: Duration,
        mut call: impl FnMut() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut attempt = 1;
        loop {
            match call() {
                Err(StoreError::RateLimited(message)) if attempt < self.max_attempts => {
                    warn!(
                        table = %table,
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        %message,
                        "store rate limited, retrying"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl TableStore for CachedStore {
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        if let Some(rows) = self.cached(table) {
            debug!(table = %table, rows = rows.len(), "table cache hit");
            return Ok(rows);
        }
        debug!(table = %table, "table cache miss");

        let generation = self.generation(table);
        let rows = self
            .with_retry(table, "load", self.read_delay, || self.inner.load_table(table))
            .map_err(|e| match e {
                StoreError::RateLimited(message) => StoreError::Unavailable(format!(
                    "still rate limited after {} attempts: {}",
                    self.max_attempts, message
                )),
                other => other,
            })?;
        self.remember(table, generation, &rows);
        Ok(rows)
    }

    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError> {
        if rows.is_empty() {
            warn!(table = %table, "refusing to write an empty table");
            return Err(StoreError::EmptyWrite);
        }

        // Reads already in flight must not cache the old rows.
        self.invalidate(table);
        let result = self
            .with_retry(table, "save", self.write_delay, || {
                self.inner.save_table(table, rows)
            })
            .map_err(|e| match e {
                StoreError::RateLimited(message) => StoreError::Write(format!(
                    "still rate limited after {} attempts: {}",
                    self.max_attempts, message
                )),
                other => other,
            });
        // Loads that began during the write may hold either version.
        self.invalidate(table);
        result
    }
}
