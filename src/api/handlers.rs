//! HTTP request handlers for the fleet ledger API.
//!
//! Every handler authenticates the caller from the HTTP Basic header, checks
//! the role, and runs the engine operation on the blocking thread pool.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::{Permission, require, require_self};
use crate::engine::{ApprovalDecision, EndShift, FleetEngine, ItemKind};
use crate::error::{FleetError, FleetResult};
use crate::models::{Period, Role, TransactionType, User};

use super::request::{HistoryQuery, ReportQuery, StartShiftRequest, TransactionRequest};
use super::response::{
    ApiError, ApiErrorResponse, AvailabilityResponse, DriverHudResponse, DutyResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/shifts", post(start_shift_handler))
        .route("/shifts/open", get(open_shifts_handler))
        .route("/shifts/history", get(shift_history_handler))
        .route("/shifts/:id/end", post(end_shift_handler))
        .route("/shifts/:id/approve", post(approve_shift_handler))
        .route("/shifts/:id/reject", post(reject_shift_handler))
        .route("/transactions", post(record_transaction_handler))
        .route("/transactions/history", get(transaction_history_handler))
        .route("/transactions/:id/approve", post(approve_transaction_handler))
        .route("/transactions/:id/reject", post(reject_transaction_handler))
        .route("/approvals", get(approval_queue_handler))
        .route("/availability", get(availability_handler))
        .route("/drivers/:driver/hud", get(driver_hud_handler))
        .route("/drivers/:driver/duty", get(duty_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .route("/fleet", get(fleet_handler))
        .route("/finance", get(finance_handler))
        .route("/salary", get(salary_handler))
        .route("/reports", get(report_handler))
        .with_state(state)
}

/// Extracts the username/password pair from an HTTP Basic header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let encoded = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Authenticates the caller and runs `action` on the blocking pool.
async fn run<T, F>(
    state: AppState,
    headers: HeaderMap,
    correlation_id: Uuid,
    operation: &'static str,
    success: StatusCode,
    action: F,
) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce(&FleetEngine, &User) -> FleetResult<T> + Send + 'static,
{
    info!(correlation_id = %correlation_id, operation, "Processing request");

    let Some((username, password)) = basic_credentials(&headers) else {
        warn!(correlation_id = %correlation_id, operation, "Missing or malformed credentials");
        return ApiErrorResponse::missing_credentials().into_response();
    };

    let started = Instant::now();
    let task = tokio::task::spawn_blocking(move || {
        let user = state.authenticator().authenticate(&username, &password)?;
        let value = action(state.engine(), &user)?;
        Ok::<_, FleetError>((user, value))
    });

    match task.await {
        Ok(Ok((user, value))) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                user = %user.username,
                duration_us = started.elapsed().as_micros(),
                "Request completed"
            );
            (success, Json(value)).into_response()
        }
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
        Err(join_error) => {
            error!(
                correlation_id = %correlation_id,
                operation,
                error = %join_error,
                "Request task did not complete"
            );
            ApiErrorResponse::internal("The request could not be completed").into_response()
        }
    }
}

/// Maps a JSON body rejection to a 400 response.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

/// Handler for POST /shifts.
async fn start_shift_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<StartShiftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    run(
        state,
        headers,
        correlation_id,
        "start_shift",
        StatusCode::CREATED,
        move |engine, user| {
            require(user, Permission::OperateShifts)?;
            engine.start_shift(request.into_start_shift(user)?)
        },
    )
    .await
}

/// Handler for POST /shifts/:id/end.
///
/// Drivers may only end their own shifts.
async fn end_shift_handler(
    State(state): State<AppState>,
    Path(shift_id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<EndShift>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    run(
        state,
        headers,
        correlation_id,
        "end_shift",
        StatusCode::OK,
        move |engine, user| {
            require(user, Permission::OperateShifts)?;
            if user.role == Role::Driver {
                let own = engine.open_shifts(Some(&user.display_name))?;
                if !own.iter().any(|shift| shift.id == shift_id) {
                    return Err(FleetError::not_found(
                        "Shift",
                        shift_id,
                        "no shift in progress for this driver",
                    ));
                }
            }
            engine.end_shift(&shift_id, request)
        },
    )
    .await
}

async fn decide(
    state: AppState,
    headers: HeaderMap,
    operation: &'static str,
    kind: ItemKind,
    id: String,
    decision: ApprovalDecision,
) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        operation,
        StatusCode::OK,
        move |engine, user| {
            require(user, Permission::Approve)?;
            engine.decide(kind, &id, decision)
        },
    )
    .await
}

/// Handler for POST /shifts/:id/approve.
async fn approve_shift_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    decide(state, headers, "approve_shift", ItemKind::Shift, id, ApprovalDecision::Approve).await
}

/// Handler for POST /shifts/:id/reject.
async fn reject_shift_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    decide(state, headers, "reject_shift", ItemKind::Shift, id, ApprovalDecision::Reject).await
}

/// Handler for POST /transactions/:id/approve.
async fn approve_transaction_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    decide(
        state,
        headers,
        "approve_transaction",
        ItemKind::Transaction,
        id,
        ApprovalDecision::Approve,
    )
    .await
}

/// Handler for POST /transactions/:id/reject.
async fn reject_transaction_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    decide(
        state,
        headers,
        "reject_transaction",
        ItemKind::Transaction,
        id,
        ApprovalDecision::Reject,
    )
    .await
}

/// Handler for GET /shifts/open.
async fn open_shifts_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "open_shifts",
        StatusCode::OK,
        |engine, user| {
            require(user, Permission::OperateShifts)?;
            let driver = (user.role == Role::Driver).then_some(user.display_name.as_str());
            engine.open_shifts(driver)
        },
    )
    .await
}

/// Handler for GET /shifts/history.
async fn shift_history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "shift_history",
        StatusCode::OK,
        move |engine, user| {
            require(user, Permission::ViewFleet)?;
            let driver = query.driver_for(user);
            engine.shift_history(driver.as_deref())
        },
    )
    .await
}

/// Handler for POST /transactions.
///
/// Admin expenses and challans must name a vehicle and go through the
/// dedicated recorders, which prefix the vehicle to the notes.
async fn record_transaction_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    run(
        state,
        headers,
        correlation_id,
        "record_transaction",
        StatusCode::CREATED,
        move |engine, user| {
            require(user, Permission::RecordTransactions)?;
            let party = request.party_for(user)?;

            if user.role == Role::Admin
                && matches!(request.kind, TransactionType::Expense | TransactionType::Challan)
            {
                let vehicle = request.vehicle.as_deref().ok_or_else(|| {
                    FleetError::validation("vehicle", "expenses and challans name a vehicle")
                })?;
                let driver = party.name();
                return match request.kind {
                    TransactionType::Expense => {
                        engine.record_expense(driver, vehicle, request.amount, &request.notes)
                    }
                    _ => engine.record_challan(driver, vehicle, request.amount, &request.notes),
                };
            }

            engine.record_transaction(request.into_new_transaction(party), user)
        },
    )
    .await
}

/// Handler for GET /transactions/history.
async fn transaction_history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "transaction_history",
        StatusCode::OK,
        move |engine, user| {
            require(user, Permission::ViewFleet)?;
            let driver = query.driver_for(user);
            engine.transaction_history(driver.as_deref())
        },
    )
    .await
}

/// Handler for GET /approvals.
async fn approval_queue_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "approval_queue",
        StatusCode::OK,
        |engine, user| {
            require(user, Permission::Approve)?;
            engine.approval_queue()
        },
    )
    .await
}

/// Handler for GET /availability.
async fn availability_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "availability",
        StatusCode::OK,
        |engine, user| {
            require(user, Permission::ViewAvailability)?;
            Ok(AvailabilityResponse {
                drivers: engine.available_drivers()?,
                vehicles: engine.available_vehicles()?,
            })
        },
    )
    .await
}

/// Handler for GET /drivers/:driver/hud.
async fn driver_hud_handler(
    State(state): State<AppState>,
    Path(driver): Path<String>,
    headers: HeaderMap,
) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "driver_hud",
        StatusCode::OK,
        move |engine, user| {
            require(user, Permission::ViewDriver)?;
            require_self(user, &driver)?;
            let today = engine
                .now()
                .with_timezone(&engine.config().display_offset())
                .date_naive();
            Ok(DriverHudResponse {
                month_revenue: engine.driver_earnings(&driver, Some(Period::month_of(today)))?,
                hud: engine.driver_hud(&driver)?,
            })
        },
    )
    .await
}

/// Handler for GET /drivers/:driver/duty.
async fn duty_handler(
    State(state): State<AppState>,
    Path(driver): Path<String>,
    headers: HeaderMap,
) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "duty",
        StatusCode::OK,
        move |engine, user| {
            require(user, Permission::ViewDriver)?;
            require_self(user, &driver)?;
            let duty = engine.duty_elapsed(&driver)?;
            Ok(DutyResponse {
                driver,
                on_duty: duty.is_some(),
                duty,
            })
        },
    )
    .await
}

/// Handler for GET /leaderboard.
async fn leaderboard_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "leaderboard",
        StatusCode::OK,
        |engine, user| {
            require(user, Permission::ViewFleet)?;
            engine.leaderboard()
        },
    )
    .await
}

/// Handler for GET /fleet.
///
/// Drivers only see who is on the road.
async fn fleet_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "fleet",
        StatusCode::OK,
        |engine, user| {
            require(user, Permission::ViewFleet)?;
            let mut radar = engine.fleet_radar()?;
            if user.role == Role::Driver {
                radar.retain(|entry| entry.live);
            }
            Ok(radar)
        },
    )
    .await
}

/// Handler for GET /finance.
async fn finance_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "finance",
        StatusCode::OK,
        |engine, user| {
            require(user, Permission::ViewFinance)?;
            engine.finance_summary()
        },
    )
    .await
}

/// Handler for GET /salary.
async fn salary_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "salary_sheet",
        StatusCode::OK,
        |engine, user| {
            require(user, Permission::ViewFinance)?;
            engine.salary_sheet()
        },
    )
    .await
}

/// Handler for GET /reports.
async fn report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Response {
    run(
        state,
        headers,
        Uuid::new_v4(),
        "period_report",
        StatusCode::OK,
        move |engine, user| {
            require(user, Permission::ViewFinance)?;
            let today = engine
                .now()
                .with_timezone(&engine.config().display_offset())
                .date_naive();
            let period = query.period(today)?;
            engine.period_report(&query.target(), period)
        },
    )
    .await
}
