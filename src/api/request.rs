//! Request types for the Staffing Compliance Engine API.
//!
//! Both endpoints take the raw records exactly as the data store returns
//! them; mapping into domain types happens in the handler.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::mapping::RawRecords;

/// Request body for `POST /compliance/day`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRequest {
    /// The date to evaluate.
    pub date: NaiveDate,
    /// Records for the facility.
    pub records: RawRecords,
}

/// Request body for `POST /compliance/month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRequest {
    /// The year.
    pub year: i32,
    /// The month (1-12).
    pub month: u32,
    /// Records for the facility covering the month.
    pub records: RawRecords,
}
