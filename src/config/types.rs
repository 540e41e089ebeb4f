//! Configuration types for the fleet ledger engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a configuration directory.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Role;

/// Payroll constants.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Salary paid in full once the monthly target is reached.
    pub base_salary: Decimal,
    /// Earnings a driver must bring in to earn the full base salary.
    pub monthly_target: Decimal,
}

/// Fleet roster and operating constants from `fleet.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct FleetSettings {
    /// Driver roster, in display order.
    pub drivers: Vec<String>,
    /// Vehicle roster, in display order.
    pub vehicles: Vec<String>,
    /// Contact numbers by driver name.
    #[serde(default)]
    pub driver_phones: HashMap<String, String>,
    /// Payroll constants.
    pub payroll: PayrollConfig,
    /// Hours of continuous duty before the overtime flag is raised.
    pub duty_hours_limit: u32,
    /// Offset of the display timezone from UTC, in whole hours.
    #[serde(default)]
    pub display_utc_offset_hours: i32,
}

/// A configured login.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEntry {
    /// Role granted to the user.
    pub role: Role,
    /// Name shown to people; for drivers, the roster name.
    pub display_name: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
}

/// User directory from `users.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    /// Map of lowercase username to user details.
    pub users: HashMap<String, UserEntry>,
}

/// Retry settings for rate-limited store calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// Total attempts per call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause before retrying a read, in milliseconds.
    #[serde(default = "default_read_delay_ms")]
    pub read_delay_ms: u64,
    /// Pause before retrying a write, in milliseconds.
    #[serde(default = "default_write_delay_ms")]
    pub write_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_read_delay_ms() -> u64 {
    2_000
}

fn default_write_delay_ms() -> u64 {
    3_000
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            read_delay_ms: default_read_delay_ms(),
            write_delay_ms: default_write_delay_ms(),
        }
    }
}

/// Table store settings from `store.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Directory holding the JSON table files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// How long a loaded table is served from cache, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Rate-limit retry settings.
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            retry: RetrySettings::default(),
        }
    }
}

impl StoreSettings {
    /// Settings with caching and retry pauses disabled, for tests.
    pub fn immediate() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_ttl_secs: 0,
            retry: RetrySettings {
                max_attempts: default_max_attempts(),
                read_delay_ms: 0,
                write_delay_ms: 0,
            },
        }
    }

    /// Returns the cache window.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// The complete fleet configuration loaded from YAML files.
///
/// Passed explicitly into the engine; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    fleet: FleetSettings,
    users: HashMap<String, UserEntry>,
    store: StoreSettings,
    display_offset: FixedOffset,
}

impl FleetConfig {
    /// Creates a new FleetConfig from its component parts.
    ///
    /// Usernames are normalized to lowercase. An offset outside ±23 hours
    /// falls back to UTC; the loader rejects such files before this point.
    pub fn new(
        fleet: FleetSettings,
        users: HashMap<String, UserEntry>,
        store: StoreSettings,
    ) -> Self {
        let display_offset = FixedOffset::east_opt(fleet.display_utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());
        let users = users
            .into_iter()
            .map(|(name, entry)| (name.trim().to_lowercase(), entry))
            .collect();
        Self {
            fleet,
            users,
            store,
            display_offset,
        }
    }

    /// Returns the driver roster.
    pub fn drivers(&self) -> &[String] {
        &self.fleet.drivers
    }

    /// Returns the vehicle roster.
    pub fn vehicles(&self) -> &[String] {
        &self.fleet.vehicles
    }

    /// Returns true if `driver` is on the roster.
    pub fn is_driver(&self, driver: &str) -> bool {
        self.fleet.drivers.iter().any(|d| d == driver)
    }

    /// Returns true if `vehicle` is on the roster.
    pub fn is_vehicle(&self, vehicle: &str) -> bool {
        self.fleet.vehicles.iter().any(|v| v == vehicle)
    }

    /// Returns the roster position of a driver, used as a ranking tie-break.
    pub fn driver_rank(&self, driver: &str) -> Option<usize> {
        self.fleet.drivers.iter().position(|d| d == driver)
    }

    /// Returns a driver's phone number if one is configured.
    pub fn driver_phone(&self, driver: &str) -> Option<&str> {
        self.fleet.driver_phones.get(driver).map(String::as_str)
    }

    /// Returns the payroll constants.
    pub fn payroll(&self) -> &PayrollConfig {
        &self.fleet.payroll
    }

    /// Returns the duty limit in hours.
    pub fn duty_hours_limit(&self) -> u32 {
        self.fleet.duty_hours_limit
    }

    /// Returns the display timezone offset.
    pub fn display_offset(&self) -> FixedOffset {
        self.display_offset
    }

    /// Returns the configured user directory, keyed by lowercase username.
    pub fn users(&self) -> &HashMap<String, UserEntry> {
        &self.users
    }

    /// Returns the table store settings.
    pub fn store(&self) -> &StoreSettings {
        &self.store
    }

    /// Returns a copy of this configuration with different store settings.
    pub fn with_store(mut self, store: StoreSettings) -> Self {
        self.store = store;
        self
    }
}
