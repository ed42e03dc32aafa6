//! Batch evaluation over a date range or calendar month.
//!
//! Each date is evaluated independently. A validation error on one date is
//! recorded as a [`RejectedDay`] and does not stop the batch.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::RuleTables;
use crate::error::{EngineError, EngineResult};
use crate::mapping::EvaluationInput;
use crate::models::{DailyStaffingCompliance, MonthlyComplianceSummary, WorkScheduleReport};

use super::coverage::compute_coverage;
use super::daily_compliance::evaluate_day;
use super::monthly::aggregate_month;

/// A date that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedDay {
    /// The date.
    pub date: NaiveDate,
    /// Why it was rejected.
    pub error: EngineError,
}

/// Results of evaluating a date range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RangeEvaluation {
    /// One result per evaluated date, in date order.
    pub daily: Vec<DailyStaffingCompliance>,
    /// Dates rejected by validation, in date order.
    pub rejected: Vec<RejectedDay>,
    /// Dates skipped because the facility is closed.
    pub closed_dates: Vec<NaiveDate>,
}

/// Results of evaluating a calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyEvaluation {
    /// The year.
    pub year: i32,
    /// The month (1-12).
    pub month: u32,
    /// One result per evaluated date.
    pub daily: Vec<DailyStaffingCompliance>,
    /// Dates rejected by validation.
    pub rejected: Vec<RejectedDay>,
    /// Dates skipped because the facility is closed.
    pub closed_dates: Vec<NaiveDate>,
    /// Status counts over the evaluated dates.
    pub summary: MonthlyComplianceSummary,
    /// Hours report over the evaluated dates.
    pub report: WorkScheduleReport,
}

/// Evaluates every date from `start` to `end` inclusive.
///
/// Dates on the facility's closed weekdays or closed dates are skipped. An
/// open date holding a row that failed to map is rejected with that row's
/// error.
///
/// # Errors
///
/// Returns `InvalidDate` if `start` is after `end` and `InvalidSettings`
/// if the facility's blocks are invalid; both would fail every date.
pub fn evaluate_range(
    input: &EvaluationInput,
    start: NaiveDate,
    end: NaiveDate,
    rules: &RuleTables,
) -> EngineResult<RangeEvaluation> {
    if start > end {
        return Err(EngineError::InvalidDate {
            field: "end".to_string(),
            value: end.to_string(),
        });
    }
    input.facility.validate()?;

    let directory = input.personnel_directory();
    let shifts_by_date = input.shifts_by_date();
    let mut evaluation = RangeEvaluation::default();

    for date in start.iter_days().take_while(|d| *d <= end) {
        if input.facility.is_closed_on(date) {
            evaluation.closed_dates.push(date);
            continue;
        }
        if let Some(error) = input.rejected_row(date) {
            warn!(%date, facility_id = %input.facility.facility_id, %error, "rejected day");
            evaluation.rejected.push(RejectedDay {
                date,
                error: error.clone(),
            });
            continue;
        }

        let shifts = shifts_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let result = compute_coverage(
            date,
            shifts,
            &directory,
            &input.facility.blocks,
            rules.fte(),
        )
        .and_then(|coverage| {
            evaluate_day(date, &coverage, input.child_headcount(date), &input.facility)
        });

        match result {
            Ok(daily) => evaluation.daily.push(daily),
            Err(error) => {
                warn!(%date, facility_id = %input.facility.facility_id, %error, "rejected day");
                evaluation.rejected.push(RejectedDay { date, error });
            }
        }
    }

    info!(
        facility_id = %input.facility.facility_id,
        %start,
        %end,
        evaluated = evaluation.daily.len(),
        rejected = evaluation.rejected.len(),
        closed = evaluation.closed_dates.len(),
        "evaluated date range"
    );

    Ok(evaluation)
}

/// Evaluates every date of a calendar month and aggregates the results.
///
/// # Errors
///
/// Returns `InvalidDate` for a month outside 1-12 or an unrepresentable
/// year, plus the errors of [`evaluate_range`].
pub fn evaluate_month(
    input: &EvaluationInput,
    year: i32,
    month: u32,
    rules: &RuleTables,
) -> EngineResult<MonthlyEvaluation> {
    let (start, end) = month_bounds(year, month)?;
    let range = evaluate_range(input, start, end, rules)?;
    let aggregate = aggregate_month(&range.daily);

    Ok(MonthlyEvaluation {
        year,
        month,
        daily: range.daily,
        rejected: range.rejected,
        closed_dates: range.closed_dates,
        summary: aggregate.summary,
        report: aggregate.report,
    })
}

/// First and last day of a calendar month.
fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidDate {
        field: "month".to_string(),
        value: format!("{}-{:02}", year, month),
    };
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
    Ok((start, end))
}
