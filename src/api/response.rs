//! Response types for the Staffing Compliance Engine API.
//!
//! Successful evaluations are wrapped with an evaluation id and timestamp.
//! Errors share one JSON body shape, `{code, message, details}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{MonthlyEvaluation, RejectedDay};
use crate::error::EngineError;
use crate::models::{DailyStaffingCompliance, MonthlyComplianceSummary, WorkScheduleReport};

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

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
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

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// Stable error code for an engine error.
pub fn error_code(error: &EngineError) -> &'static str {
    match error {
        EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => "CONFIG_ERROR",
        EngineError::AdditionNotFound { .. } => "ADDITION_NOT_FOUND",
        EngineError::InvalidDate { .. } => "INVALID_DATE",
        EngineError::NegativeHeadcount { .. } => "NEGATIVE_HEADCOUNT",
        EngineError::InvalidShift { .. } => "INVALID_SHIFT",
        EngineError::InvalidSettings { .. } => "INVALID_SETTINGS",
        EngineError::InvalidRecord { .. } => "INVALID_RECORD",
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = error_code(&error);
        if error.is_validation() {
            ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    code,
                    error.to_string(),
                    "The submitted records contain invalid information",
                ),
            }
        } else {
            ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(code, "Configuration error", error.to_string()),
            }
        }
    }
}

/// Response body for `POST /compliance/day`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayResponse {
    /// Unique id for this evaluation.
    pub evaluation_id: Uuid,
    /// When the evaluation ran.
    pub evaluated_at: DateTime<Utc>,
    /// The date evaluated.
    pub date: NaiveDate,
    /// True when the facility is closed on the date.
    pub closed: bool,
    /// The evaluation; absent when the facility is closed.
    pub compliance: Option<DailyStaffingCompliance>,
}

impl DayResponse {
    /// Wraps a day result with a fresh evaluation id.
    pub fn new(date: NaiveDate, compliance: Option<DailyStaffingCompliance>) -> Self {
        Self {
            evaluation_id: Uuid::new_v4(),
            evaluated_at: Utc::now(),
            date,
            closed: compliance.is_none(),
            compliance,
        }
    }
}

/// A rejected date as reported over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedDayResponse {
    /// The date.
    pub date: NaiveDate,
    /// Error code, as in [`ApiError::code`].
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl From<RejectedDay> for RejectedDayResponse {
    fn from(rejected: RejectedDay) -> Self {
        Self {
            date: rejected.date,
            code: error_code(&rejected.error).to_string(),
            message: rejected.error.to_string(),
        }
    }
}

/// Response body for `POST /compliance/month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthResponse {
    /// Unique id for this evaluation.
    pub evaluation_id: Uuid,
    /// When the evaluation ran.
    pub evaluated_at: DateTime<Utc>,
    /// The year.
    pub year: i32,
    /// The month (1-12).
    pub month: u32,
    /// Status counts.
    pub summary: MonthlyComplianceSummary,
    /// Hours report.
    pub report: WorkScheduleReport,
    /// One result per evaluated date.
    pub daily: Vec<DailyStaffingCompliance>,
    /// Dates that could not be evaluated.
    pub rejected: Vec<RejectedDayResponse>,
    /// Dates skipped because the facility is closed.
    pub closed_dates: Vec<NaiveDate>,
}

impl From<MonthlyEvaluation> for MonthResponse {
    fn from(evaluation: MonthlyEvaluation) -> Self {
        Self {
            evaluation_id: Uuid::new_v4(),
            evaluated_at: Utc::now(),
            year: evaluation.year,
            month: evaluation.month,
            summary: evaluation.summary,
            report: evaluation.report,
            daily: evaluation.daily,
            rejected: evaluation.rejected.into_iter().map(Into::into).collect(),
            closed_dates: evaluation.closed_dates,
        }
    }
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
    fn test_validation_error_maps_to_bad_request() {
        let error = EngineError::InvalidRecord {
            record: "shift".to_string(),
            field: "date".to_string(),
            message: "expected YYYY-MM-DD, got '04/01'".to_string(),
        };
        let response: ApiErrorResponse = error.into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_RECORD");
        assert!(response.error.message.contains("shift"));
    }

    #[test]
    fn test_config_error_maps_to_internal_error() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/rules.yaml".to_string(),
        };
        let response: ApiErrorResponse = error.into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "CONFIG_ERROR");
        assert!(
            response
                .error
                .details
                .as_deref()
                .unwrap()
                .contains("/missing/rules.yaml")
        );
    }

    #[test]
    fn test_rejected_day_carries_code_and_message() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let rejected = RejectedDay {
            date,
            error: EngineError::NegativeHeadcount {
                date,
                headcount: -1,
            },
        };
        let response: RejectedDayResponse = rejected.into();
        assert_eq!(response.code, "NEGATIVE_HEADCOUNT");
        assert_eq!(response.message, "Negative child headcount -1 on 2025-04-02");
    }

    #[test]
    fn test_closed_day_response_has_no_compliance() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 6).unwrap();
        let response = DayResponse::new(date, None);
        assert!(response.closed);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["compliance"].is_null());
        assert!(json["evaluation_id"].is_string());
    }
}
