//! Application state for the fleet ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::auth::{Authenticator, UserDirectory};
use crate::engine::FleetEngine;

/// Shared application state.
///
/// Holds the engine and the authentication provider. Both sit behind `Arc`
/// so handlers can move clones onto the blocking pool.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<FleetEngine>,
    authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(engine: FleetEngine, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            engine: Arc::new(engine),
            authenticator,
        }
    }

    /// Creates a state that authenticates against the engine's configured users.
    pub fn with_user_directory(engine: FleetEngine) -> Self {
        let directory = UserDirectory::from_config(engine.config());
        Self::new(engine, Arc::new(directory))
    }

    /// Returns the engine.
    pub fn engine(&self) -> &FleetEngine {
        &self.engine
    }

    /// Returns the authentication provider.
    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_and_send() {
        fn assert_state<T: Clone + Send + Sync + 'static>() {}
        assert_state::<AppState>();
    }
}
