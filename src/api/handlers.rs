//! HTTP request handlers for the Time Ledger & Compliance Engine API.
//!
//! Each handler is a thin wrapper: deserialize, call the engine or a pure
//! calculator, map errors. The engine itself stays synchronous.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_weekly_overtime;

use super::request::{
    LeaveBalanceRequest, OvertimeCalculationRequest, PolicyResolveRequest, RecomputeDayRequest,
    TimesheetRequest,
};
use super::response::{ApiError, ApiErrorResponse, PolicyResolveResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/days/recompute", post(recompute_day_handler))
        .route("/overtime/calculate", post(overtime_handler))
        .route("/leave/balance", post(leave_balance_handler))
        .route("/timesheets", post(timesheet_handler))
        .route("/policy/resolve", post(policy_resolve_handler))
        .with_state(state)
}

fn remote_set(ids: &[String]) -> HashSet<String> {
    ids.iter().cloned().collect()
}

/// Handler for POST /days/recompute.
async fn recompute_day_handler(
    State(state): State<AppState>,
    Json(request): Json<RecomputeDayRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        user_id = %request.user_id,
        date = %request.date,
        "Recomputing day summary"
    );

    let result = state.ledger().recompute_day(
        &request.user_id,
        &request.org_id,
        request.jurisdiction.as_deref(),
        request.date,
        &request.timezone,
        &remote_set(&request.remote_location_ids),
    );

    match result {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Recompute failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /overtime/calculate.
///
/// Pure: splits the supplied week under the supplied policy, touching no
/// store.
async fn overtime_handler(Json(request): Json<OvertimeCalculationRequest>) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    match calculate_weekly_overtime(&request.days, &request.policy) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                regular = result.regular_minutes,
                overtime = result.overtime_minutes,
                double_time = result.double_time_minutes,
                "Weekly overtime calculated"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Overtime calculation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /leave/balance.
async fn leave_balance_handler(
    State(state): State<AppState>,
    Json(request): Json<LeaveBalanceRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let result = state.ledger().pto_balance(
        &request.user_id,
        &request.org_id,
        request.jurisdiction.as_deref(),
        request.reference_date,
    );

    match result {
        Ok(balance) => {
            info!(
                correlation_id = %correlation_id,
                user_id = %request.user_id,
                remaining = balance.remaining,
                "PTO balance calculated"
            );
            (StatusCode::OK, Json(balance)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Balance calculation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /timesheets.
///
/// Accepts a timesheet request and returns the generated payroll
/// timesheet.
async fn timesheet_handler(
    State(state): State<AppState>,
    payload: Result<Json<TimesheetRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing timesheet request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
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
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let result = state.ledger().timesheet(
        &request.user_id,
        request.period,
        &request.incidents,
        &remote_set(&request.remote_location_ids),
    );

    match result {
        Ok(sheet) => {
            info!(
                correlation_id = %correlation_id,
                user_id = %request.user_id,
                weeks = sheet.weeks.len(),
                total_minutes = sheet.totals.total_minutes,
                "Timesheet generated"
            );
            (StatusCode::OK, Json(sheet)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Timesheet generation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /policy/resolve.
async fn policy_resolve_handler(
    State(state): State<AppState>,
    Json(request): Json<PolicyResolveRequest>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let resolved = state
        .ledger()
        .effective_policy(&request.org_id, request.jurisdiction.as_deref());

    match resolved {
        Ok(policy) => {
            let jurisdiction_rules = request
                .jurisdiction
                .as_deref()
                .and_then(|code| state.jurisdictions().rules(code))
                .cloned();
            info!(
                correlation_id = %correlation_id,
                org_id = %request.org_id,
                jurisdiction = request.jurisdiction.as_deref().unwrap_or("-"),
                "Policy resolved"
            );
            (
                StatusCode::OK,
                Json(PolicyResolveResponse {
                    policy,
                    jurisdiction_rules,
                }),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Policy resolution failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}
