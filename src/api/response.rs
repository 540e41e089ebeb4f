//! Response types for the fleet ledger API.
//!
//! This module defines the error response structures, the mapping from
//! engine errors to HTTP status codes, and the composite bodies returned by
//! a few read endpoints.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{DriverHud, DutyStatus};
use crate::error::FleetError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// 401 for a request without usable Basic credentials.
    pub fn missing_credentials() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::with_details(
                "UNAUTHORIZED",
                "Authentication required",
                "Send HTTP Basic credentials in the Authorization header",
            ),
        }
    }

    /// 400 for a body that could not be parsed.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// 500 for a failure outside the engine.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::new("INTERNAL_ERROR", message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let unauthorized = self.status == StatusCode::UNAUTHORIZED;
        let mut response = (self.status, Json(self.error)).into_response();
        if unauthorized {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"fleet\""),
            );
        }
        response
    }
}

impl From<FleetError> for ApiErrorResponse {
    fn from(error: FleetError) -> Self {
        let message = error.to_string();
        match error {
            FleetError::Validation { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("Check the value of '{}'", field),
                ),
            },
            FleetError::Conflict { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("CONFLICT", message),
            },
            FleetError::NotFound { entity, .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "NOT_FOUND",
                    message,
                    format!("{} does not exist or is not in a state that allows this", entity),
                ),
            },
            FleetError::InvalidCredentials => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("INVALID_CREDENTIALS", message),
            },
            FleetError::Forbidden { .. } => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new("FORBIDDEN", message),
            },
            FleetError::StoreUnavailable { .. } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "STORE_UNAVAILABLE",
                    message,
                    "Nothing was saved; try again shortly",
                ),
            },
            FleetError::StoreRead { .. } | FleetError::StoreWrite { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORE_ERROR", message, "Nothing was saved"),
            },
            FleetError::ConfigNotFound { .. } | FleetError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new("CONFIG_ERROR", message),
                }
            }
        }
    }
}

/// Body of `GET /availability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Drivers without a shift in progress.
    pub drivers: Vec<String>,
    /// Vehicles not in use.
    pub vehicles: Vec<String>,
}

/// Body of `GET /drivers/:driver/hud`.
#[derive(Debug, Clone, Serialize)]
pub struct DriverHudResponse {
    /// All-time dashboard figures.
    #[serde(flatten)]
    pub hud: DriverHud,
    /// Settled earnings in the current calendar month.
    pub month_revenue: Decimal,
}

/// Body of `GET /drivers/:driver/duty`.
#[derive(Debug, Clone, Serialize)]
pub struct DutyResponse {
    /// The driver asked about.
    pub driver: String,
    /// True while the driver has an active shift.
    pub on_duty: bool,
    /// Timer for the active shift.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duty: Option<DutyStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (FleetError::validation("amount", "negative"), StatusCode::BAD_REQUEST),
            (
                FleetError::Conflict {
                    message: "busy".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                FleetError::not_found("Shift", "1a2b3c4d", "gone"),
                StatusCode::NOT_FOUND,
            ),
            (FleetError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                FleetError::Forbidden {
                    role: "ceo".to_string(),
                    action: "approve requests".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                FleetError::StoreUnavailable {
                    table: "shifts_log".to_string(),
                    message: "quota".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                FleetError::StoreWrite {
                    table: "shifts_log".to_string(),
                    message: "refusing to write an empty table".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
        }
    }

    #[test]
    fn test_validation_error_names_field() {
        let response: ApiErrorResponse = FleetError::validation("start_fuel", "above 100").into();
        assert_eq!(response.error.code, "VALIDATION_ERROR");
        assert_eq!(
            response.error.details.as_deref(),
            Some("Check the value of 'start_fuel'")
        );
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = ApiErrorResponse::missing_credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
