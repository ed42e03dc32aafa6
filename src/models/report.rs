//! Monthly summary and work-schedule report models.
//!
//! These are produced by folding a month of [`DailyStaffingCompliance`]
//! results; see [`crate::calculation::aggregate_month`].
//!
//! [`DailyStaffingCompliance`]: super::DailyStaffingCompliance

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::compliance_result::ComplianceWarningType;
use super::personnel::{PersonnelType, WorkStyle};

/// Per-addition day counts for a month.
///
/// Both the raw at-risk count and the count restricted to days with a known
/// child headcount are exposed; which one a billing decision uses is left to
/// the consuming report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdditionMonthlyCount {
    /// Days on which the addition was checked.
    pub evaluated_days: u32,
    /// Days on which the addition had a gap.
    pub at_risk_days: u32,
    /// At-risk days whose status was not `insufficient_data`.
    pub at_risk_days_with_data: u32,
    /// Checked days whose status was `insufficient_data`.
    pub insufficient_data_days: u32,
}

/// How often a warning type occurred over the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningFrequency {
    /// The warning type.
    #[serde(rename = "type")]
    pub warning_type: ComplianceWarningType,
    /// Number of warnings of this type.
    pub count: u32,
}

/// Status counts for a month of evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyComplianceSummary {
    /// Number of daily results folded.
    pub total_days: u32,
    /// Days with status `compliant`.
    pub compliant_days: u32,
    /// Days with status `understaffed`.
    pub understaffed_days: u32,
    /// Days with status `addition_at_risk`.
    pub addition_at_risk_days: u32,
    /// Days with status `insufficient_data`.
    pub insufficient_data_days: u32,
    /// Days with status `needs_review`.
    pub needs_review_days: u32,
    /// Per-addition counts keyed by addition code.
    pub additions: BTreeMap<String, AdditionMonthlyCount>,
    /// Warning types by frequency, most common first.
    pub warning_frequencies: Vec<WarningFrequency>,
}

/// One staff member's scheduled time over the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffScheduleLine {
    /// Staff id.
    pub staff_id: String,
    /// Display name.
    pub name: String,
    /// Total scheduled hours.
    pub total_hours: Decimal,
    /// Scheduled hours split by the personnel type held on each day.
    pub hours_by_personnel_type: BTreeMap<PersonnelType, Decimal>,
    /// Scheduled hours split by the work style held on each day.
    pub hours_by_work_style: BTreeMap<WorkStyle, Decimal>,
    /// Scheduled hours on days the staff id had no personnel settings.
    pub unclassified_hours: Decimal,
    /// Days with scheduled time.
    pub days_worked: u32,
    /// Days worked that were non-compliant.
    pub non_compliant_days_worked: u32,
}

/// The monthly work-schedule report used for regulatory submission.
///
/// A reporting artifact summing scheduled hours independent of compliance
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkScheduleReport {
    /// Earliest date folded.
    pub period_start: Option<NaiveDate>,
    /// Latest date folded.
    pub period_end: Option<NaiveDate>,
    /// The month as "YYYY-MM" when every folded date falls in it.
    #[serde(default)]
    pub month: Option<String>,
    /// Per-staff lines ordered by staff id.
    pub staff: Vec<StaffScheduleLine>,
    /// Facility-wide hours by personnel type.
    pub hours_by_personnel_type: BTreeMap<PersonnelType, Decimal>,
    /// Facility-wide hours by work style.
    pub hours_by_work_style: BTreeMap<WorkStyle, Decimal>,
    /// Facility-wide hours of unknown personnel.
    pub unclassified_hours: Decimal,
    /// Days that were understaffed or had an addition at risk.
    pub non_compliant_days: u32,
}

/// The result of folding a month of daily results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// Status counts.
    pub summary: MonthlyComplianceSummary,
    /// Work-schedule report.
    pub report: WorkScheduleReport,
}

impl MonthlyComplianceSummary {
    /// Returns true if the addition had at least one at-risk day.
    pub fn addition_has_gaps(&self, addition_code: &str) -> bool {
        self.additions
            .get(addition_code)
            .is_some_and(|c| c.at_risk_days > 0)
    }
}
