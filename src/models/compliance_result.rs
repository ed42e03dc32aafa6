//! Daily compliance result models.
//!
//! This module contains [`DailyStaffingCompliance`] and the structures it is
//! built from: warnings, the per-block and per-staff breakdown, addition
//! check results and the audit trace. All of them are plain values created
//! fresh for each evaluation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::facility::StaffingRatio;
use super::personnel::{PersonnelType, WorkStyle};
use super::shift::TimeRange;

/// The overall classification of a day.
///
/// # Example
///
/// ```
/// use staffing_compliance::models::ComplianceStatus;
///
/// let status = ComplianceStatus::AdditionAtRisk;
/// assert_eq!(serde_json::to_string(&status).unwrap(), "\"addition_at_risk\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Every block meets its requirement, every addition is covered, and no
    /// structural warnings exist.
    Compliant,
    /// At least one block fails its ratio or floor.
    Understaffed,
    /// Staffing levels are met but at least one addition has a gap.
    AdditionAtRisk,
    /// The child headcount is unknown, so ratio compliance cannot be decided.
    InsufficientData,
    /// Requirements are met but structural warnings (double-booking,
    /// out-of-window shifts) need a human look.
    NeedsReview,
}

impl ComplianceStatus {
    /// Returns true for days that count as non-compliant in reports.
    pub fn is_non_compliant(&self) -> bool {
        matches!(
            self,
            ComplianceStatus::Understaffed | ComplianceStatus::AdditionAtRisk
        )
    }
}

/// The kind of finding a warning reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceWarningType {
    /// FTE present is below the ratio requirement.
    RatioViolation,
    /// FTE present is below the minimum staff floor.
    FloorViolation,
    /// An addition's qualifying coverage has a gap.
    AdditionGap,
    /// A staff member is double-booked across overlapping shifts.
    OverlappingShift,
    /// A shift has time outside the open blocks.
    OutOfWindowShift,
    /// A shift references a staff id with no personnel settings.
    UnknownPersonnel,
    /// No manager is on shift.
    ManagerAbsent,
    /// No service manager is on shift.
    ServiceManagerAbsent,
    /// Ratio-counted staff are on shift but none is full-time dedicated.
    FullTimeDedicatedAbsent,
}

impl ComplianceWarningType {
    /// Structural warnings describe problems with the schedule itself rather
    /// than with staffing levels.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ComplianceWarningType::OverlappingShift | ComplianceWarningType::OutOfWindowShift
        )
    }
}

/// How serious a warning is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceSeverity {
    /// A regulatory requirement is not met.
    Error,
    /// Something needs attention but is not a violation on its own.
    Warning,
    /// Informational.
    Info,
}

/// A single finding attached to a day's evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    /// What kind of finding this is.
    #[serde(rename = "type")]
    pub warning_type: ComplianceWarningType,
    /// How serious it is.
    pub severity: ComplianceSeverity,
    /// The affected time range, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    /// The affected blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_ids: Vec<String>,
    /// The affected addition, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addition_code: Option<String>,
    /// The affected staff member, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    /// Human-readable detail.
    pub message: String,
}

/// How a block fared against its staffing requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    /// Ratio and floor are both met.
    Met,
    /// Ratio or floor is not met.
    Short,
    /// The floor is met but the ratio requirement is unknown.
    Undetermined,
    /// The block is closed and was not evaluated.
    Closed,
}

/// Headcount and FTE present in one block versus what is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCompliance {
    /// Block id.
    pub block_id: String,
    /// Block label.
    pub label: String,
    /// Block interval.
    pub range: TimeRange,
    /// The ratio applied.
    pub ratio: StaffingRatio,
    /// Staff required by the ratio; `None` when the headcount is unknown.
    pub required_by_ratio: Option<u32>,
    /// Staff required by the facility floor.
    pub required_floor: u32,
    /// Ratio-counted FTE present (not rounded).
    pub actual_fte: Decimal,
    /// Distinct ratio-counted staff present.
    pub actual_headcount: u32,
    /// Distinct staff of any kind present.
    pub total_headcount: u32,
    /// Outcome for the block.
    pub status: BlockStatus,
}

impl BlockCompliance {
    /// The binding requirement: the larger of floor and ratio, when known.
    pub fn required(&self) -> Option<u32> {
        self.required_by_ratio
            .map(|ratio| ratio.max(self.required_floor))
    }
}

/// One staff member's contribution to the day's coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffContribution {
    /// Staff id as referenced by the shifts.
    pub staff_id: String,
    /// Display name, when known.
    pub name: String,
    /// False when no personnel settings exist for this staff id.
    pub known: bool,
    /// Regulatory role, when known.
    pub personnel_type: Option<PersonnelType>,
    /// Employment arrangement, when known.
    pub work_style: Option<WorkStyle>,
    /// Held qualifications.
    pub qualifications: BTreeSet<String>,
    /// Ids of the working shifts that produced this contribution.
    pub shift_ids: Vec<String>,
    /// Scheduled minutes net of breaks (double-booked time counted once).
    pub scheduled_minutes: i64,
    /// Scheduled hours net of breaks.
    pub scheduled_hours: Decimal,
    /// The full-block FTE weight from the rule tables.
    pub fte_weight: Decimal,
    /// Prorated FTE per block id.
    pub block_fte: BTreeMap<String, Decimal>,
    /// Whether the staff member acts as manager.
    pub is_manager: bool,
    /// Whether the staff member acts as service manager.
    pub is_service_manager: bool,
    /// Whether the staff member is full-time dedicated.
    #[serde(default)]
    pub full_time_dedicated: bool,
}

/// Per-staff and per-block detail behind a day's status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaffComplianceBreakdown {
    /// Staff contributions ordered by staff id.
    pub staff: Vec<StaffContribution>,
    /// Block results in operating order.
    pub blocks: Vec<BlockCompliance>,
}

/// A block in which an addition's requirement is not met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionGap {
    /// The uncovered block.
    pub block_id: String,
    /// The block's interval; `None` if the block id is not configured.
    pub range: Option<TimeRange>,
    /// Qualifying staff present.
    pub qualifying_staff: u32,
    /// Qualifying FTE present.
    pub qualifying_fte: Decimal,
    /// Why the block fails.
    pub reason: String,
}

/// The outcome of checking one addition for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionCheckResult {
    /// Addition code.
    pub addition_code: String,
    /// Addition display name.
    pub name: String,
    /// True only if every checked block is covered.
    pub satisfied: bool,
    /// Blocks the requirement was checked against.
    pub checked_blocks: Vec<String>,
    /// Blocks that failed.
    pub gaps: Vec<AdditionGap>,
}

/// A single step in the audit trace recording an evaluation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Regulatory reference for the rule, when known.
    pub rule_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The evaluation of one facility on one date.
///
/// Recomputed on demand; the engine never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStaffingCompliance {
    /// The facility evaluated.
    pub facility_id: String,
    /// The date evaluated.
    pub date: NaiveDate,
    /// Overall status.
    pub status: ComplianceStatus,
    /// Child headcount used; `None` when the data layer had none.
    pub child_headcount: Option<u32>,
    /// Findings in evaluation order.
    pub warnings: Vec<ComplianceWarning>,
    /// Detail behind the status.
    pub breakdown: StaffComplianceBreakdown,
    /// One result per addition the facility opted into.
    pub addition_results: Vec<AdditionCheckResult>,
    /// Trace of each rule application.
    pub audit_steps: Vec<AuditStep>,
}

impl DailyStaffingCompliance {
    /// Returns warnings of the given type.
    pub fn warnings_of(&self, warning_type: ComplianceWarningType) -> Vec<&ComplianceWarning> {
        self.warnings
            .iter()
            .filter(|w| w.warning_type == warning_type)
            .collect()
    }

    /// Returns true if any structural warning was raised.
    pub fn has_structural_warnings(&self) -> bool {
        self.warnings.iter().any(|w| w.warning_type.is_structural())
    }

    /// Returns true if the given addition has a gap on this day.
    pub fn addition_at_risk(&self, addition_code: &str) -> bool {
        self.addition_results
            .iter()
            .any(|r| r.addition_code == addition_code && !r.satisfied)
    }

    /// Looks up a block result by id.
    pub fn block(&self, block_id: &str) -> Option<&BlockCompliance> {
        self.breakdown.blocks.iter().find(|b| b.block_id == block_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn sample_block(required_by_ratio: Option<u32>, floor: u32) -> BlockCompliance {
        BlockCompliance {
            block_id: "am".to_string(),
            label: "AM".to_string(),
            range: TimeRange::new(make_time("09:00"), make_time("13:00")),
            ratio: StaffingRatio { staff: 1, children: 4 },
            required_by_ratio,
            required_floor: floor,
            actual_fte: Decimal::ONE,
            actual_headcount: 1,
            total_headcount: 1,
            status: BlockStatus::Short,
        }
    }

    fn sample_warning(warning_type: ComplianceWarningType) -> ComplianceWarning {
        ComplianceWarning {
            warning_type,
            severity: ComplianceSeverity::Warning,
            time_range: None,
            block_ids: vec![],
            addition_code: None,
            staff_id: Some("st_001".to_string()),
            message: "test".to_string(),
        }
    }

    #[test]
    fn test_required_is_max_of_floor_and_ratio() {
        assert_eq!(sample_block(Some(1), 2).required(), Some(2));
        assert_eq!(sample_block(Some(3), 2).required(), Some(3));
        assert_eq!(sample_block(None, 2).required(), None);
    }

    #[test]
    fn test_structural_warning_types() {
        assert!(ComplianceWarningType::OverlappingShift.is_structural());
        assert!(ComplianceWarningType::OutOfWindowShift.is_structural());
        assert!(!ComplianceWarningType::RatioViolation.is_structural());
        assert!(!ComplianceWarningType::UnknownPersonnel.is_structural());
    }

    #[test]
    fn test_non_compliant_statuses() {
        assert!(ComplianceStatus::Understaffed.is_non_compliant());
        assert!(ComplianceStatus::AdditionAtRisk.is_non_compliant());
        assert!(!ComplianceStatus::InsufficientData.is_non_compliant());
        assert!(!ComplianceStatus::NeedsReview.is_non_compliant());
        assert!(!ComplianceStatus::Compliant.is_non_compliant());
    }

    #[test]
    fn test_warning_serializes_type_field_and_skips_empty() {
        let json = serde_json::to_value(sample_warning(ComplianceWarningType::AdditionGap)).unwrap();
        assert_eq!(json["type"], "addition_gap");
        assert_eq!(json["severity"], "warning");
        assert!(json.get("block_ids").is_none());
        assert!(json.get("addition_code").is_none());
        assert_eq!(json["staff_id"], "st_001");
    }

    #[test]
    fn test_daily_result_helpers() {
        let daily = DailyStaffingCompliance {
            facility_id: "fac_001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            status: ComplianceStatus::NeedsReview,
            child_headcount: Some(6),
            warnings: vec![
                sample_warning(ComplianceWarningType::OverlappingShift),
                sample_warning(ComplianceWarningType::ManagerAbsent),
            ],
            breakdown: StaffComplianceBreakdown {
                staff: vec![],
                blocks: vec![sample_block(Some(2), 2)],
            },
            addition_results: vec![AdditionCheckResult {
                addition_code: "life_support".to_string(),
                name: "Life support".to_string(),
                satisfied: false,
                checked_blocks: vec!["am".to_string()],
                gaps: vec![],
            }],
            audit_steps: vec![],
        };

        assert!(daily.has_structural_warnings());
        assert_eq!(
            daily
                .warnings_of(ComplianceWarningType::ManagerAbsent)
                .len(),
            1
        );
        assert!(daily.addition_at_risk("life_support"));
        assert!(!daily.addition_at_risk("other"));
        assert!(daily.block("am").is_some());
        assert!(daily.block("pm").is_none());
    }
}
