//! Authentication and role permissions.
//!
//! The engine never authenticates anyone itself; callers resolve a
//! [`User`] through an [`Authenticator`] and check what the role may do
//! with [`require`] before invoking an operation.

mod directory;

use crate::error::{FleetError, FleetResult};
use crate::models::{Role, User};

pub use directory::UserDirectory;

/// Resolves credentials to a user.
pub trait Authenticator: Send + Sync {
    /// Returns the user for a username/password pair.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` when the pair does not match.
    fn authenticate(&self, username: &str, password: &str) -> FleetResult<User>;
}

/// Something a role may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Start and end shifts.
    OperateShifts,
    /// Skip the start approval.
    ExpediteShifts,
    /// Approve or reject pending requests and read the queue.
    Approve,
    /// Record ledger transactions.
    RecordTransactions,
    /// See which drivers and vehicles are free.
    ViewAvailability,
    /// Read a driver's dashboard and duty timer.
    ViewDriver,
    /// Read the leaderboard, fleet radar and history logs.
    ViewFleet,
    /// Read finance, salary sheet and period reports.
    ViewFinance,
}

impl Permission {
    /// Returns a short description used in `Forbidden` errors.
    pub fn action(&self) -> &'static str {
        match self {
            Permission::OperateShifts => "operate shifts",
            Permission::ExpediteShifts => "expedite shifts",
            Permission::Approve => "approve requests",
            Permission::RecordTransactions => "record transactions",
            Permission::ViewAvailability => "view availability",
            Permission::ViewDriver => "view driver dashboards",
            Permission::ViewFleet => "view fleet status",
            Permission::ViewFinance => "view finance",
        }
    }
}

/// Returns true if `role` holds `permission`.
///
/// # Example
///
/// ```
/// use fleet_ledger::auth::{Permission, allows};
/// use fleet_ledger::models::Role;
///
/// assert!(allows(Role::Admin, Permission::Approve));
/// assert!(allows(Role::Ceo, Permission::ViewFinance));
/// assert!(!allows(Role::Ceo, Permission::RecordTransactions));
/// assert!(!allows(Role::Driver, Permission::ExpediteShifts));
/// ```
pub fn allows(role: Role, permission: Permission) -> bool {
    match role {
        Role::Admin => true,
        Role::Ceo => matches!(
            permission,
            Permission::ViewDriver | Permission::ViewFleet | Permission::ViewFinance
        ),
        Role::Driver => matches!(
            permission,
            Permission::OperateShifts
                | Permission::RecordTransactions
                | Permission::ViewAvailability
                | Permission::ViewDriver
                | Permission::ViewFleet
        ),
    }
}

/// Fails with `Forbidden` unless the user's role holds `permission`.
pub fn require(user: &User, permission: Permission) -> FleetResult<()> {
    if allows(user.role, permission) {
        Ok(())
    } else {
        Err(FleetError::Forbidden {
            role: user.role.to_string(),
            action: permission.action().to_string(),
        })
    }
}

/// Fails with `Forbidden` when a driver acts on another driver's records.
///
/// Admin and ceo users pass for any driver.
pub fn require_self(user: &User, driver: &str) -> FleetResult<()> {
    if user.role == Role::Driver && user.display_name != driver {
        return Err(FleetError::Forbidden {
            role: user.role.to_string(),
            action: format!("act on behalf of '{}'", driver),
        });
    }
    Ok(())
}
