//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the fleet
//! configuration from a directory of YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{FleetError, FleetResult};

use super::types::{FleetConfig, FleetSettings, StoreSettings, UsersConfig};

/// Loads and provides access to the fleet configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/fleet/
/// ├── fleet.yaml   # Rosters, phone numbers, payroll, duty limit, display offset
/// ├── users.yaml   # Logins with roles and bcrypt password hashes
/// └── store.yaml   # Data directory, cache window, retry settings
/// ```
///
/// # Example
///
/// ```no_run
/// use fleet_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/fleet").unwrap();
/// println!("Drivers: {:?}", loader.config().drivers());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: FleetConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A roster is empty, the duty limit is zero, or the display offset
    ///   is outside ±23 hours
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fleet_ledger::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/fleet")?;
    /// # Ok::<(), fleet_ledger::error::FleetError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> FleetResult<Self> {
        let path = path.as_ref();

        let fleet_path = path.join("fleet.yaml");
        let fleet = Self::load_yaml::<FleetSettings>(&fleet_path)?;
        Self::check_fleet(&fleet, &fleet_path)?;

        let users_path = path.join("users.yaml");
        let users = Self::load_yaml::<UsersConfig>(&users_path)?;

        let store_path = path.join("store.yaml");
        let store = Self::load_yaml::<StoreSettings>(&store_path)?;
        if store.retry.max_attempts == 0 {
            return Err(FleetError::ConfigParseError {
                path: store_path.display().to_string(),
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }

        info!(
            path = %path.display(),
            drivers = fleet.drivers.len(),
            vehicles = fleet.vehicles.len(),
            users = users.users.len(),
            "loaded fleet configuration"
        );

        Ok(Self {
            config: FleetConfig::new(fleet, users.users, store),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> FleetResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| FleetError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| FleetError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Sanity checks on the roster file.
    fn check_fleet(fleet: &FleetSettings, path: &Path) -> FleetResult<()> {
        let problem = if fleet.drivers.is_empty() {
            Some("driver roster is empty")
        } else if fleet.vehicles.is_empty() {
            Some("vehicle roster is empty")
        } else if fleet.duty_hours_limit == 0 {
            Some("duty_hours_limit must be positive")
        } else if fleet.display_utc_offset_hours.abs() > 23 {
            Some("display_utc_offset_hours must be within ±23")
        } else if fleet.payroll.base_salary.is_sign_negative()
            || fleet.payroll.monthly_target.is_sign_negative()
        {
            Some("payroll amounts must not be negative")
        } else {
            None
        };

        match problem {
            Some(message) => Err(FleetError::ConfigParseError {
                path: path.display().to_string(),
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> FleetConfig {
        self.config
    }
}
