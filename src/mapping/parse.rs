//! Field parsers for raw records.
//!
//! Every failure names the record and field it came from.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime, Weekday};

use crate::error::{EngineError, EngineResult};
use crate::models::{PersonnelType, StaffingRatio, WorkStyle};

pub(crate) fn invalid(record: &str, field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidRecord {
        record: record.to_string(),
        field: field.to_string(),
        message: message.into(),
    }
}

/// Parses "HH:MM:SS" or "HH:MM".
pub(crate) fn parse_time(record: &str, field: &str, value: &str) -> EngineResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| invalid(record, field, format!("expected HH:MM or HH:MM:SS, got '{}'", value)))
}

pub(crate) fn parse_optional_time(
    record: &str,
    field: &str,
    value: Option<&str>,
) -> EngineResult<Option<NaiveTime>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_time(record, field, v).map(Some),
    }
}

/// Parses "YYYY-MM-DD".
pub(crate) fn parse_date(record: &str, field: &str, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(record, field, format!("expected YYYY-MM-DD, got '{}'", value)))
}

/// Splits a comma-separated qualification list, dropping blanks.
pub(crate) fn parse_qualifications(value: Option<&str>) -> BTreeSet<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase().replace(['-', ' '], "_")
}

pub(crate) fn parse_personnel_type(
    record: &str,
    field: &str,
    value: &str,
) -> EngineResult<PersonnelType> {
    let normalized = normalize(value);
    let parsed = match normalized.as_str() {
        "manager" => PersonnelType::Manager,
        "service_manager" | "child_development_manager" => PersonnelType::ServiceManager,
        "childcare_worker" | "standard" => PersonnelType::ChildcareWorker,
        "life_support_worker" => PersonnelType::LifeSupportWorker,
        "other_qualified" | "addition" => PersonnelType::OtherQualified,
        "unqualified_helper" | "helper" => PersonnelType::UnqualifiedHelper,
        _ => {
            return Err(invalid(
                record,
                field,
                format!("unknown personnel type '{}'", value),
            ));
        }
    };
    Ok(parsed)
}

pub(crate) fn parse_work_style(record: &str, field: &str, value: &str) -> EngineResult<WorkStyle> {
    let normalized = normalize(value);
    let parsed = match normalized.as_str() {
        "full_time" | "fulltime" | "fulltime_dedicated" | "fulltime_concurrent" => {
            WorkStyle::FullTime
        }
        "part_time" | "parttime" => WorkStyle::PartTime,
        "per_diem" | "perdiem" | "spot" => WorkStyle::PerDiem,
        _ => {
            return Err(invalid(
                record,
                field,
                format!("unknown work style '{}'", value),
            ));
        }
    };
    Ok(parsed)
}

/// Returns true for the work style codes of full-time dedicated staff.
pub(crate) fn is_dedicated_work_style(value: &str) -> bool {
    matches!(
        normalize(value).as_str(),
        "fulltime_dedicated" | "full_time_dedicated"
    )
}

pub(crate) fn parse_ratio(record: &str, field: &str, value: &str) -> EngineResult<StaffingRatio> {
    value
        .parse::<StaffingRatio>()
        .map_err(|e| invalid(record, field, e.to_string()))
}

pub(crate) fn parse_weekday(record: &str, field: &str, value: &str) -> EngineResult<Weekday> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| invalid(record, field, format!("unknown weekday '{}'", value)))
}

/// Converts a stored integer to `u32`, rejecting negatives.
pub(crate) fn non_negative(record: &str, field: &str, value: i64) -> EngineResult<u32> {
    u32::try_from(value).map_err(|_| {
        invalid(
            record,
            field,
            format!("expected a non-negative whole number, got {}", value),
        )
    })
}
