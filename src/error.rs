//! Error types for the Staffing Compliance Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only validation and configuration problems are errors; compliance findings
//! (ratio, floor and addition violations) are ordinary output and never
//! surface here.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Staffing Compliance Engine.
///
/// Validation errors are local to the date they were raised for. Batch
/// evaluation records them per day and carries on with the remaining dates.
///
/// # Example
///
/// ```
/// use staffing_compliance::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rules.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rules.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An addition code is not present in the rule-table catalog.
    #[error("Addition not found: {code}")]
    AdditionNotFound {
        /// The addition code that was not found.
        code: String,
    },

    /// A date was malformed or did not match the evaluation context.
    #[error("Invalid date in '{field}': {value}")]
    InvalidDate {
        /// The field holding the offending date.
        field: String,
        /// The offending value.
        value: String,
    },

    /// A child headcount below zero was supplied.
    #[error("Negative child headcount {headcount} on {date}")]
    NegativeHeadcount {
        /// The date the headcount was supplied for.
        date: NaiveDate,
        /// The offending headcount.
        headcount: i64,
    },

    /// A shift was invalid or contained inconsistent data.
    #[error("Invalid shift '{shift_id}': {message}")]
    InvalidShift {
        /// The ID of the invalid shift.
        shift_id: String,
        /// A description of what made the shift invalid.
        message: String,
    },

    /// Facility staffing settings were inconsistent.
    #[error("Invalid facility settings field '{field}': {message}")]
    InvalidSettings {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A raw external record could not be mapped into a domain entity.
    #[error("Invalid {record} record field '{field}': {message}")]
    InvalidRecord {
        /// The kind of record (e.g., "shift", "staff").
        record: String,
        /// The field that failed to map.
        field: String,
        /// A description of the mapping failure.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors caused by caller-supplied data rather than
    /// the engine's own configuration.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/rules.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/rules.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_addition_not_found_displays_code() {
        let error = EngineError::AdditionNotFound {
            code: "unknown".to_string(),
        };
        assert_eq!(error.to_string(), "Addition not found: unknown");
    }

    #[test]
    fn test_negative_headcount_displays_date_and_value() {
        let error = EngineError::NegativeHeadcount {
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            headcount: -3,
        };
        assert_eq!(
            error.to_string(),
            "Negative child headcount -3 on 2025-04-01"
        );
    }

    #[test]
    fn test_invalid_shift_displays_id_and_message() {
        let error = EngineError::InvalidShift {
            shift_id: "shift_001".to_string(),
            message: "start time must be before end time".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid shift 'shift_001': start time must be before end time"
        );
    }

    #[test]
    fn test_invalid_record_displays_record_and_field() {
        let error = EngineError::InvalidRecord {
            record: "staff".to_string(),
            field: "work_style".to_string(),
            message: "unknown work style 'weekly'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid staff record field 'work_style': unknown work style 'weekly'"
        );
    }

    #[test]
    fn test_config_errors_are_not_validation_errors() {
        let config = EngineError::ConfigNotFound {
            path: "x".to_string(),
        };
        let shift = EngineError::InvalidShift {
            shift_id: "s".to_string(),
            message: "m".to_string(),
        };
        assert!(!config.is_validation());
        assert!(shift.is_validation());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_date() -> EngineResult<()> {
            Err(EngineError::InvalidDate {
                field: "date".to_string(),
                value: "2025-02-30".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_date()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
