//! Error types for the fleet ledger engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report: bad input, roster conflicts,
//! missing or wrong-state records, backing store failures, credentials and
//! configuration problems.

use thiserror::Error;

/// The main error type for the fleet ledger engine.
///
/// Validation, conflict, not-found and forbidden errors are recoverable and
/// leave every table untouched. Store errors are terminal for the request
/// that raised them: nothing from that request was persisted.
///
/// # Example
///
/// ```
/// use fleet_ledger::error::FleetError;
///
/// let error = FleetError::Conflict {
///     message: "driver 'Ijaz' already has shift 1a2b3c4d in progress".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Conflict: driver 'Ijaz' already has shift 1a2b3c4d in progress"
/// );
/// ```
#[derive(Debug, Error)]
pub enum FleetError {
    /// Input was rejected before any state was touched.
    #[error("Validation error on '{field}': {message}")]
    Validation {
        /// The field or column that failed validation.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// A roster member is already committed to a non-terminal shift.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting record.
        message: String,
    },

    /// The target record does not exist or is not in a state the operation accepts.
    #[error("{entity} '{id}' not found: {reason}")]
    NotFound {
        /// The kind of record that was looked up ("Shift", "Transaction").
        entity: String,
        /// The identifier that was looked up.
        id: String,
        /// Why the record did not qualify.
        reason: String,
    },

    /// The backing store could not be reached, or stayed rate limited.
    #[error("Store unavailable for table '{table}': {message}")]
    StoreUnavailable {
        /// The table being accessed.
        table: String,
        /// A description of the failure.
        message: String,
    },

    /// The backing store returned data that could not be read.
    #[error("Failed to read table '{table}': {message}")]
    StoreRead {
        /// The table being read.
        table: String,
        /// A description of the failure.
        message: String,
    },

    /// The backing store refused or failed a full-table write.
    #[error("Failed to write table '{table}': {message}")]
    StoreWrite {
        /// The table being written.
        table: String,
        /// A description of the failure.
        message: String,
    },

    /// Username/password pair did not match any configured user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The authenticated role may not perform the operation.
    #[error("Role '{role}' may not {action}")]
    Forbidden {
        /// The role of the caller.
        role: String,
        /// The action that was attempted.
        action: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed sanity checks.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl FleetError {
    /// Shorthand for a [`FleetError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        FleetError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`FleetError::NotFound`].
    pub fn not_found(
        entity: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FleetError::NotFound {
            entity: entity.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for store failures, which abort the current request.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            FleetError::StoreUnavailable { .. }
                | FleetError::StoreRead { .. }
                | FleetError::StoreWrite { .. }
        )
    }
}

/// A type alias for Results that return FleetError.
pub type FleetResult<T> = Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = FleetError::validation("amount", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Validation error on 'amount': must not be negative"
        );
    }

    #[test]
    fn test_not_found_displays_entity_id_and_reason() {
        let error = FleetError::not_found("Shift", "1a2b3c4d", "not awaiting approval");
        assert_eq!(
            error.to_string(),
            "Shift '1a2b3c4d' not found: not awaiting approval"
        );
    }

    #[test]
    fn test_store_write_displays_table() {
        let error = FleetError::StoreWrite {
            table: "shifts_log".to_string(),
            message: "refusing to write an empty table".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to write table 'shifts_log': refusing to write an empty table"
        );
    }

    #[test]
    fn test_forbidden_displays_role_and_action() {
        let error = FleetError::Forbidden {
            role: "ceo".to_string(),
            action: "record transactions".to_string(),
        };
        assert_eq!(error.to_string(), "Role 'ceo' may not record transactions");
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = FleetError::ConfigNotFound {
            path: "/missing/fleet.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/fleet.yaml"
        );
    }

    #[test]
    fn test_store_failures_are_classified() {
        let unavailable = FleetError::StoreUnavailable {
            table: "shifts_log".to_string(),
            message: "quota".to_string(),
        };
        assert!(unavailable.is_store_failure());
        assert!(!FleetError::InvalidCredentials.is_store_failure());
        assert!(!FleetError::validation("fuel", "over 100").is_store_failure());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<FleetError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_conflict() -> FleetResult<()> {
            Err(FleetError::Conflict {
                message: "busy".to_string(),
            })
        }

        fn propagates_error() -> FleetResult<()> {
            returns_conflict()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(FleetError::Conflict { .. })
        ));
    }
}
