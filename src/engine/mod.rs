//! The fleet engine: shift lifecycle, ledger, approval queue and reports.
//!
//! Every mutation follows the same optimistic pattern: load the full table,
//! check the request against that snapshot, change it in memory and write
//! the whole table back. Validation, conflict and not-found failures return
//! before anything is written; a store failure discards the change.
//!
//! # Example
//!
//! ```
//! use fleet_ledger::config::{ConfigLoader, StoreSettings};
//! use fleet_ledger::engine::{FleetEngine, StartShift};
//! use fleet_ledger::store::MemoryStore;
//! use rust_decimal::Decimal;
//!
//! let config = ConfigLoader::load("./config/fleet")
//!     .unwrap()
//!     .into_config()
//!     .with_store(StoreSettings::immediate());
//! let engine = FleetEngine::new(config, Box::new(MemoryStore::new()));
//!
//! let shift = engine
//!     .start_shift(StartShift {
//!         driver: "Ijaz".to_string(),
//!         vehicle: "Car Max (New)".to_string(),
//!         start_wallet: Decimal::from(100),
//!         start_fuel: 90,
//!         expedite: false,
//!     })
//!     .unwrap();
//! engine.approve_shift(&shift.id).unwrap();
//! assert_eq!(engine.open_shifts(Some("Ijaz")).unwrap().len(), 1);
//! ```

mod approvals;
mod clock;
mod ledger;
mod reports;
mod shifts;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::FleetConfig;
use crate::error::{FleetError, FleetResult};
use crate::models::{Shift, Transaction};
use crate::store::{CachedStore, Repository, TableStore};

pub use approvals::{
    ApprovalAction, ApprovalDecision, ApprovalQueue, DecisionOutcome, ItemKind, PendingItem,
    QueueEntry,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use ledger::NewTransaction;
pub use shifts::{EndShift, ShiftRejection, StartShift};

/// A consistent read of both tables.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Every shift, in table order.
    pub shifts: Vec<Shift>,
    /// Every transaction, in table order.
    pub transactions: Vec<Transaction>,
}

/// Runs every operation against the configured roster and table store.
pub struct FleetEngine {
    config: Arc<FleetConfig>,
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl FleetEngine {
    /// Creates an engine over `backend` using the system clock.
    ///
    /// The backend is wrapped in a [`CachedStore`] configured from the
    /// store settings in `config`.
    pub fn new(config: FleetConfig, backend: Box<dyn TableStore>) -> Self {
        Self::with_clock(config, backend, Arc::new(SystemClock))
    }

    /// Creates an engine with an explicit clock.
    pub fn with_clock(
        config: FleetConfig,
        backend: Box<dyn TableStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cached = CachedStore::new(backend, config.store());
        let repository = Repository::new(Box::new(cached), config.display_offset());
        Self {
            config: Arc::new(config),
            repository,
            clock,
        }
    }

    /// Returns the configuration the engine runs with.
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Returns the current time from the engine's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Loads both tables.
    pub fn snapshot(&self) -> FleetResult<Snapshot> {
        Ok(Snapshot {
            shifts: self.repository.load_shifts()?,
            transactions: self.repository.load_transactions()?,
        })
    }

    pub(crate) fn repository(&self) -> &Repository {
        &self.repository
    }

    pub(crate) fn require_driver(&self, field: &str, driver: &str) -> FleetResult<()> {
        if self.config.is_driver(driver) {
            Ok(())
        } else {
            Err(FleetError::validation(
                field,
                format!("'{}' is not on the driver roster", driver),
            ))
        }
    }
}

/// Generates an 8-character record identifier.
pub(crate) fn new_record_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
