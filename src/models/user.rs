//! Authenticated users and their roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Operations admin with full control.
    Admin,
    /// Owner with a read-only view.
    Ceo,
    /// Driver acting on their own shifts and cash.
    Driver,
}

impl Role {
    /// Returns the lowercase role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Ceo => "ceo",
            Role::Driver => "driver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user returned by the authentication provider.
///
/// For drivers, `display_name` is the roster name used on shifts and
/// transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name.
    pub username: String,
    /// Role of the user.
    pub role: Role,
    /// Name shown to people; the roster name for drivers.
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_deserializes_lowercase() {
        let role: Role = serde_yaml::from_str("ceo").unwrap();
        assert_eq!(role, Role::Ceo);
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
