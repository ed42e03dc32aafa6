//! HTTP request handlers for the Staffing Compliance Engine API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{MonthlyEvaluation, evaluate_month, evaluate_range};
use crate::config::RuleTables;
use crate::error::{EngineError, EngineResult};
use crate::mapping::EvaluationInput;
use crate::models::DailyStaffingCompliance;

use super::request::{DayRequest, MonthRequest};
use super::response::{ApiError, ApiErrorResponse, DayResponse, MonthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/compliance/day", post(day_handler))
        .route("/compliance/month", post(month_handler))
        .with_state(state)
}

/// Handler for `POST /compliance/day`.
async fn day_handler(
    State(state): State<AppState>,
    payload: Result<Json<DayRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing day evaluation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match evaluate_single_day(&request, state.rules()) {
        Ok(compliance) => {
            info!(
                correlation_id = %correlation_id,
                facility_id = %request.records.facility.facility_id,
                date = %request.date,
                status = ?compliance.as_ref().map(|c| c.status),
                duration_us = start_time.elapsed().as_micros(),
                "Day evaluation completed"
            );
            json_response(StatusCode::OK, DayResponse::new(request.date, compliance))
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `POST /compliance/month`.
async fn month_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing month evaluation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match evaluate_month_request(&request, state.rules()) {
        Ok(evaluation) => {
            info!(
                correlation_id = %correlation_id,
                facility_id = %request.records.facility.facility_id,
                year = request.year,
                month = request.month,
                evaluated = evaluation.daily.len(),
                rejected = evaluation.rejected.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Month evaluation completed"
            );
            json_response(StatusCode::OK, MonthResponse::from(evaluation))
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Maps the records and evaluates one date.
///
/// Returns `None` when the facility is closed on the date. A rejected date
/// is returned as its error.
fn evaluate_single_day(
    request: &DayRequest,
    rules: &RuleTables,
) -> EngineResult<Option<DailyStaffingCompliance>> {
    let input = EvaluationInput::from_records(&request.records, rules)?;
    let mut range = evaluate_range(&input, request.date, request.date, rules)?;
    if let Some(rejected) = range.rejected.pop() {
        return Err(rejected.error);
    }
    Ok(range.daily.pop())
}

fn evaluate_month_request(
    request: &MonthRequest,
    rules: &RuleTables,
) -> EngineResult<MonthlyEvaluation> {
    let input = EvaluationInput::from_records(&request.records, rules)?;
    evaluate_month(&input, request.year, request.month, rules)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Evaluation failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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
    json_response(StatusCode::BAD_REQUEST, error)
}
