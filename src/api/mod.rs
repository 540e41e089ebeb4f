//! HTTP API module for the fleet ledger engine.
//!
//! This module exposes the engine over a JSON REST API with HTTP Basic
//! authentication and role checks.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{HistoryQuery, ReportQuery, StartShiftRequest, TransactionRequest};
pub use response::{ApiError, AvailabilityResponse, DriverHudResponse, DutyResponse};
pub use state::AppState;
