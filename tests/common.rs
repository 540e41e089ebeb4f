#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use fleet_ledger::config::{ConfigLoader, FleetConfig, RetrySettings, StoreSettings};
use fleet_ledger::engine::{EndShift, FixedClock, FleetEngine, StartShift};
use fleet_ledger::models::Shift;
use fleet_ledger::store::{MemoryStore, Row, StoreError, Table, TableStore};

/// 09:00 local time on 15 Jan 2026 (display offset +3).
pub fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap()
}

pub fn config() -> FleetConfig {
    ConfigLoader::load("./config/fleet")
        .expect("Failed to load config")
        .into_config()
        .with_store(StoreSettings::immediate())
}

/// An engine over an in-memory store with a stopped clock.
///
/// The store and clock are returned so tests can inspect rows and move time.
pub fn engine() -> (FleetEngine, MemoryStore, Arc<FixedClock>) {
    let store = MemoryStore::new();
    let clock = Arc::new(FixedClock::new(morning()));
    let engine = FleetEngine::with_clock(config(), Box::new(store.clone()), clock.clone());
    (engine, store, clock)
}

/// Store settings with the production cache window and no retry pauses.
pub fn cached_settings() -> StoreSettings {
    StoreSettings {
        data_dir: String::new(),
        cache_ttl_secs: 60,
        retry: RetrySettings {
            max_attempts: 3,
            read_delay_ms: 0,
            write_delay_ms: 0,
        },
    }
}

/// An engine that caches reads for a minute, over `backend`.
pub fn cached_engine(backend: Box<dyn TableStore>) -> (FleetEngine, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(morning()));
    let config = config().with_store(cached_settings());
    (FleetEngine::with_clock(config, backend, clock.clone()), clock)
}

/// Backend whose first load of one table stops after reading its rows.
///
/// `loaded` fires once the rows are read; the load returns when `release`
/// is sent.
pub struct PausedLoad {
    pub inner: MemoryStore,
    table: Table,
    gate: Mutex<Option<(Sender<()>, Receiver<()>)>>,
}

impl PausedLoad {
    /// Returns the store plus the `loaded` receiver and `release` sender.
    pub fn new(inner: MemoryStore, table: Table) -> (Self, Receiver<()>, Sender<()>) {
        let (loaded_tx, loaded_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Self {
            inner,
            table,
            gate: Mutex::new(Some((loaded_tx, release_rx))),
        };
        (store, loaded_rx, release_tx)
    }
}

impl TableStore for PausedLoad {
    fn load_table(&self, table: Table) -> Result<Vec<Row>, StoreError> {
        let rows = self.inner.load_table(table)?;
        if table == self.table {
            let gate = self.gate.lock().unwrap().take();
            if let Some((loaded, release)) = gate {
                loaded.send(()).unwrap();
                release.recv().unwrap();
            }
        }
        Ok(rows)
    }

    fn save_table(&self, table: Table, rows: &[Row]) -> Result<(), StoreError> {
        self.inner.save_table(table, rows)
    }
}

pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

pub fn start(driver: &str, vehicle: &str) -> StartShift {
    StartShift {
        driver: driver.to_string(),
        vehicle: vehicle.to_string(),
        start_wallet: dec(100),
        start_fuel: 90,
        expedite: false,
    }
}

pub fn end(earnings: i64, fuel: u8) -> EndShift {
    EndShift {
        total_earnings: dec(earnings),
        end_fuel: fuel,
    }
}

/// Runs a shift through start, approval, end and approval.
pub fn settled_shift(
    engine: &FleetEngine,
    clock: &FixedClock,
    driver: &str,
    vehicle: &str,
    earnings: i64,
) -> Shift {
    let shift = engine.start_shift(start(driver, vehicle)).unwrap();
    engine.approve_shift(&shift.id).unwrap();
    clock.advance(chrono::Duration::hours(8));
    engine.end_shift(&shift.id, end(earnings, 40)).unwrap();
    engine.approve_shift(&shift.id).unwrap()
}
