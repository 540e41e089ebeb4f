//! Static user directory with bcrypt password hashes.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{FleetConfig, UserEntry};
use crate::error::{FleetError, FleetResult};
use crate::models::User;

use super::Authenticator;

/// Users loaded from `users.yaml`.
///
/// Usernames are matched after trimming and lowercasing.
///
/// # Example
///
/// ```
/// use fleet_ledger::auth::{Authenticator, UserDirectory};
/// use fleet_ledger::config::ConfigLoader;
/// use fleet_ledger::models::Role;
///
/// let config = ConfigLoader::load("./config/fleet").unwrap().into_config();
/// let directory = UserDirectory::from_config(&config);
///
/// let user = directory.authenticate(" Sunny ", "0000").unwrap();
/// assert_eq!(user.role, Role::Driver);
/// assert_eq!(user.display_name, "Sunny");
/// assert!(directory.authenticate("sunny", "1111").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: HashMap<String, UserEntry>,
}

impl UserDirectory {
    /// Builds the directory from the configured users.
    pub fn from_config(config: &FleetConfig) -> Self {
        let users = config
            .users()
            .iter()
            .map(|(username, entry)| (normalize(username), entry.clone()))
            .collect();
        Self { users }
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn normalize(username: &str) -> String {
    username.trim().to_lowercase()
}

impl Authenticator for UserDirectory {
    fn authenticate(&self, username: &str, password: &str) -> FleetResult<User> {
        let username = normalize(username);
        let Some(entry) = self.users.get(&username) else {
            debug!(username = %username, "unknown user");
            return Err(FleetError::InvalidCredentials);
        };

        match bcrypt::verify(password, &entry.password_hash) {
            Ok(true) => Ok(User {
                username,
                role: entry.role,
                display_name: entry.display_name.clone(),
            }),
            Ok(false) => {
                debug!(username = %username, "password mismatch");
                Err(FleetError::InvalidCredentials)
            }
            Err(e) => {
                warn!(username = %username, error = %e, "unreadable password hash");
                Err(FleetError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::Role;

    fn directory() -> UserDirectory {
        let config = ConfigLoader::load("./config/fleet").unwrap().into_config();
        UserDirectory::from_config(&config)
    }

    #[test]
    fn test_loads_every_user() {
        assert_eq!(directory().len(), 8);
    }

    #[test]
    fn test_admin_login() {
        let user = directory().authenticate("mustansar", "nomore").unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.display_name, "Mustansar");
    }

    #[test]
    fn test_username_is_case_insensitive() {
        let user = directory().authenticate("CEO", "ceo786").unwrap();
        assert_eq!(user.role, Role::Ceo);
        assert_eq!(user.username, "ceo");
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        assert!(matches!(
            directory().authenticate("ijaz", "0000"),
            Err(FleetError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_user_is_rejected() {
        assert!(matches!(
            directory().authenticate("nobody", "0000"),
            Err(FleetError::InvalidCredentials)
        ));
    }
}
