//! Configuration loading and management for the fleet ledger engine.
//!
//! This module loads the fleet configuration from YAML files: the driver and
//! vehicle rosters, payroll constants, the user directory and the table
//! store settings. The result is a [`FleetConfig`] value passed explicitly
//! into the engine.
//!
//! # Example
//!
//! ```no_run
//! use fleet_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/fleet").unwrap().into_config();
//! println!("Vehicles: {:?}", config.vehicles());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    FleetConfig, FleetSettings, PayrollConfig, RetrySettings, StoreSettings, UserEntry,
    UsersConfig,
};
