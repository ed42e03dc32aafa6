//! Daily compliance evaluation.
//!
//! Combines a day's coverage with the child headcount and the facility's
//! staffing settings to produce a [`DailyStaffingCompliance`]: per-block
//! requirement checks, addition checks, typed warnings, an audit trace and
//! the overall status.
//!
//! # Status precedence
//!
//! 1. `understaffed` when any open block certainly fails (FTE below the
//!    floor, nobody present, or FTE below a ratio requirement computed from
//!    a known headcount) or when the facility requires a full-time dedicated
//!    staff member and none of the ratio-counted staff on shift is one.
//! 2. `insufficient_data` when the headcount is unknown.
//! 3. `addition_at_risk` when any addition has a gap.
//! 4. `needs_review` when structural warnings exist.
//! 5. `compliant` otherwise.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdditionCheckResult, AuditStep, BlockCompliance, BlockStatus,
    ComplianceSeverity, ComplianceStatus, ComplianceWarning, ComplianceWarningType,
    DailyStaffingCompliance, FacilityStaffingSettings, StaffComplianceBreakdown, TimeRange,
};

use super::addition_check::check_addition_requirement;
use super::coverage::{BlockCoverage, CoverageTimeline};
use super::ratio::required_staff;

/// Evaluates one facility day.
///
/// # Arguments
///
/// * `date` - The date evaluated; must match `coverage.date`
/// * `coverage` - The day's coverage from [`compute_coverage`](super::compute_coverage)
/// * `child_headcount` - Children attending; `None` when the data layer has
///   no count for the date
/// * `settings` - The facility's staffing settings
///
/// # Errors
///
/// Returns `NegativeHeadcount` for a negative child count and `InvalidDate`
/// when the coverage belongs to another date. Compliance findings are never
/// errors; they are the warnings of the returned value.
pub fn evaluate_day(
    date: NaiveDate,
    coverage: &CoverageTimeline,
    child_headcount: Option<i64>,
    settings: &FacilityStaffingSettings,
) -> EngineResult<DailyStaffingCompliance> {
    if coverage.date != date {
        return Err(EngineError::InvalidDate {
            field: "coverage.date".to_string(),
            value: coverage.date.to_string(),
        });
    }

    let headcount = match child_headcount {
        Some(h) if h < 0 => {
            return Err(EngineError::NegativeHeadcount { date, headcount: h });
        }
        Some(h) => Some(u32::try_from(h).unwrap_or(u32::MAX)),
        None => None,
    };

    let mut trace = AuditTrace::default();
    let mut warnings = vec![];

    let block_summary: Vec<serde_json::Value> = coverage
        .blocks
        .iter()
        .map(|b| {
            serde_json::json!({
                "block_id": b.block_id,
                "headcount": b.total_headcount(),
                "ratio_fte": b.fte_for(&settings.ratio_counted_types).normalize().to_string(),
            })
        })
        .collect();
    trace.push(
        "coverage_summary",
        "Coverage Summary",
        "",
        serde_json::json!({
            "date": date.to_string(),
            "staff_on_shift": coverage.staff.len(),
            "child_headcount": headcount,
        }),
        serde_json::json!({ "blocks": block_summary }),
        format!(
            "{} staff on shift across {} blocks",
            coverage.staff.len(),
            coverage.blocks.len()
        ),
    );

    let mut blocks = Vec::with_capacity(coverage.blocks.len());
    for block in &coverage.blocks {
        let result = evaluate_block(block, headcount, settings);
        trace_block(&mut trace, &result);
        warnings.extend(block_warnings(&result, block));
        blocks.push(result);
    }
    let blocks_short = blocks.iter().any(|b| b.status == BlockStatus::Short);
    let any_open = blocks.iter().any(|b| b.status != BlockStatus::Closed);

    let mut addition_results = Vec::with_capacity(settings.addition_requirements.len());
    for requirement in &settings.addition_requirements {
        let result = check_addition_requirement(date, coverage, requirement);
        trace_addition(&mut trace, &result);
        warnings.extend(addition_warnings(&result));
        addition_results.push(result);
    }

    warnings.extend(schedule_warnings(coverage));
    let mut dedicated_absent = false;
    if any_open {
        warnings.extend(role_warnings(coverage, settings));
        if settings.require_full_time_dedicated {
            if let Some(warning) = dedicated_warning(coverage, settings) {
                dedicated_absent = true;
                warnings.push(warning);
            }
        }
    }
    let understaffed = blocks_short || dedicated_absent;

    let additions_at_risk = addition_results.iter().any(|r| !r.satisfied);
    let structural = warnings.iter().any(|w| w.warning_type.is_structural());

    let status = if understaffed {
        ComplianceStatus::Understaffed
    } else if headcount.is_none() {
        ComplianceStatus::InsufficientData
    } else if additions_at_risk {
        ComplianceStatus::AdditionAtRisk
    } else if structural {
        ComplianceStatus::NeedsReview
    } else {
        ComplianceStatus::Compliant
    };

    trace.push(
        "status_derivation",
        "Status Derivation",
        "",
        serde_json::json!({
            "blocks_short": blocks_short,
            "full_time_dedicated_absent": dedicated_absent,
            "headcount_known": headcount.is_some(),
            "additions_at_risk": additions_at_risk,
            "structural_warnings": structural,
        }),
        serde_json::json!({ "status": status }),
        status_reasoning(status),
    );

    if headcount.is_none() {
        warn!(%date, facility_id = %settings.facility_id, "no child headcount for date");
    }
    debug!(
        %date,
        facility_id = %settings.facility_id,
        ?status,
        warnings = warnings.len(),
        "evaluated day"
    );

    Ok(DailyStaffingCompliance {
        facility_id: settings.facility_id.clone(),
        date,
        status,
        child_headcount: headcount,
        warnings,
        breakdown: StaffComplianceBreakdown {
            staff: coverage.staff.clone(),
            blocks,
        },
        addition_results,
        audit_steps: trace.into_steps(),
    })
}

fn evaluate_block(
    block: &BlockCoverage,
    headcount: Option<u32>,
    settings: &FacilityStaffingSettings,
) -> BlockCompliance {
    let ratio = settings
        .block(&block.block_id)
        .map_or(settings.default_ratio, |b| settings.ratio_for(b));
    let actual_fte = block.fte_for(&settings.ratio_counted_types);
    let actual_headcount = block.headcount_for(&settings.ratio_counted_types);

    if block.closed {
        return BlockCompliance {
            block_id: block.block_id.clone(),
            label: block.label.clone(),
            range: block.range,
            ratio,
            required_by_ratio: None,
            required_floor: 0,
            actual_fte,
            actual_headcount,
            total_headcount: block.total_headcount(),
            status: BlockStatus::Closed,
        };
    }

    let required_floor = settings.minimum_staff_floor;
    let required_by_ratio = headcount.map(|h| required_staff(h, ratio));

    let floor_failed = actual_fte < Decimal::from(required_floor);
    let ratio_failed = required_by_ratio.is_some_and(|r| actual_fte < Decimal::from(r));

    let status = if floor_failed || ratio_failed || block.is_empty() {
        BlockStatus::Short
    } else if required_by_ratio.is_none() {
        BlockStatus::Undetermined
    } else {
        BlockStatus::Met
    };

    BlockCompliance {
        block_id: block.block_id.clone(),
        label: block.label.clone(),
        range: block.range,
        ratio,
        required_by_ratio,
        required_floor,
        actual_fte,
        actual_headcount,
        total_headcount: block.total_headcount(),
        status,
    }
}

fn block_warnings(result: &BlockCompliance, block: &BlockCoverage) -> Vec<ComplianceWarning> {
    if result.status != BlockStatus::Short {
        return vec![];
    }

    let mut warnings = vec![];
    let fte = result.actual_fte.round_dp(2);

    if result.actual_fte < Decimal::from(result.required_floor) {
        warnings.push(block_warning(
            ComplianceWarningType::FloorViolation,
            result,
            format!(
                "{} has {} FTE on the floor, minimum is {}",
                display_label(result),
                fte,
                result.required_floor
            ),
        ));
    }

    let ratio_failed = result
        .required_by_ratio
        .is_some_and(|r| result.actual_fte < Decimal::from(r));
    if block.is_empty() {
        warnings.push(block_warning(
            ComplianceWarningType::RatioViolation,
            result,
            format!("{} has no staff scheduled", display_label(result)),
        ));
    } else if ratio_failed {
        warnings.push(block_warning(
            ComplianceWarningType::RatioViolation,
            result,
            format!(
                "{} needs {} staff at {}, has {} FTE",
                display_label(result),
                result.required_by_ratio.unwrap_or_default(),
                result.ratio,
                fte
            ),
        ));
    }

    warnings
}

fn block_warning(
    warning_type: ComplianceWarningType,
    result: &BlockCompliance,
    message: String,
) -> ComplianceWarning {
    ComplianceWarning {
        warning_type,
        severity: ComplianceSeverity::Error,
        time_range: Some(result.range),
        block_ids: vec![result.block_id.clone()],
        addition_code: None,
        staff_id: None,
        message,
    }
}

fn display_label(result: &BlockCompliance) -> String {
    if result.label.is_empty() {
        format!("Block {} ({})", result.block_id, result.range)
    } else {
        format!("Block {} ({})", result.label, result.range)
    }
}

fn addition_warnings(result: &AdditionCheckResult) -> Vec<ComplianceWarning> {
    result
        .gaps
        .iter()
        .map(|gap| ComplianceWarning {
            warning_type: ComplianceWarningType::AdditionGap,
            severity: ComplianceSeverity::Warning,
            time_range: gap.range,
            block_ids: vec![gap.block_id.clone()],
            addition_code: Some(result.addition_code.clone()),
            staff_id: None,
            message: format!("{}: block {}: {}", result.name, gap.block_id, gap.reason),
        })
        .collect()
}

fn schedule_warnings(coverage: &CoverageTimeline) -> Vec<ComplianceWarning> {
    let mut warnings = vec![];

    for overlap in &coverage.overlaps {
        warnings.push(ComplianceWarning {
            warning_type: ComplianceWarningType::OverlappingShift,
            severity: ComplianceSeverity::Warning,
            time_range: Some(overlap.range),
            block_ids: blocks_touching(coverage, &overlap.range),
            addition_code: None,
            staff_id: Some(overlap.staff_id.clone()),
            message: format!(
                "Staff {} is double-booked by shifts {} for {} minutes",
                overlap.staff_id,
                overlap.shift_ids.join(", "),
                overlap.overlap_minutes
            ),
        });
    }

    for shift in &coverage.out_of_window {
        warnings.push(ComplianceWarning {
            warning_type: ComplianceWarningType::OutOfWindowShift,
            severity: ComplianceSeverity::Warning,
            time_range: Some(shift.shift_range),
            block_ids: vec![],
            addition_code: None,
            staff_id: Some(shift.staff_id.clone()),
            message: format!(
                "Shift {} ({}) runs {} minutes outside the open blocks",
                shift.shift_id, shift.shift_range, shift.outside_minutes
            ),
        });
    }

    for staff_id in &coverage.unknown_staff_ids {
        warnings.push(ComplianceWarning {
            warning_type: ComplianceWarningType::UnknownPersonnel,
            severity: ComplianceSeverity::Warning,
            time_range: None,
            block_ids: vec![],
            addition_code: None,
            staff_id: Some(staff_id.clone()),
            message: format!(
                "Staff {} has no personnel settings and contributes no FTE",
                staff_id
            ),
        });
    }

    warnings
}

fn role_warnings(
    coverage: &CoverageTimeline,
    settings: &FacilityStaffingSettings,
) -> Vec<ComplianceWarning> {
    let mut warnings = vec![];

    if settings.role_checks.manager && !coverage.staff.iter().any(|s| s.is_manager) {
        warnings.push(role_warning(
            ComplianceWarningType::ManagerAbsent,
            "No manager is on shift",
        ));
    }
    if settings.role_checks.service_manager
        && !coverage.staff.iter().any(|s| s.is_service_manager)
    {
        warnings.push(role_warning(
            ComplianceWarningType::ServiceManagerAbsent,
            "No service manager is on shift",
        ));
    }

    warnings
}

/// Flags a day where ratio-counted staff work an open block but none of them
/// is full-time dedicated.
fn dedicated_warning(
    coverage: &CoverageTimeline,
    settings: &FacilityStaffingSettings,
) -> Option<ComplianceWarning> {
    let counted: BTreeSet<&str> = coverage
        .blocks
        .iter()
        .filter(|b| !b.closed)
        .flat_map(|b| &b.present)
        .filter(|p| {
            p.personnel_type
                .is_some_and(|t| settings.ratio_counted_types.contains(&t))
        })
        .map(|p| p.staff_id.as_str())
        .collect();
    if counted.is_empty() {
        return None;
    }

    let has_dedicated = coverage
        .staff
        .iter()
        .any(|s| s.full_time_dedicated && counted.contains(s.staff_id.as_str()));
    if has_dedicated {
        return None;
    }

    Some(ComplianceWarning {
        warning_type: ComplianceWarningType::FullTimeDedicatedAbsent,
        severity: ComplianceSeverity::Error,
        time_range: None,
        block_ids: vec![],
        addition_code: None,
        staff_id: None,
        message: format!(
            "None of the {} ratio-counted staff on shift is full-time dedicated",
            counted.len()
        ),
    })
}

fn role_warning(warning_type: ComplianceWarningType, message: &str) -> ComplianceWarning {
    ComplianceWarning {
        warning_type,
        severity: ComplianceSeverity::Warning,
        time_range: None,
        block_ids: vec![],
        addition_code: None,
        staff_id: None,
        message: message.to_string(),
    }
}

fn blocks_touching(coverage: &CoverageTimeline, range: &TimeRange) -> Vec<String> {
    coverage
        .blocks
        .iter()
        .filter(|b| b.range.intersection(range).is_some())
        .map(|b| b.block_id.clone())
        .collect()
}

fn status_reasoning(status: ComplianceStatus) -> String {
    match status {
        ComplianceStatus::Understaffed => {
            "At least one open block fails its ratio or floor, or no full-time dedicated staff member is on shift"
        }
        ComplianceStatus::InsufficientData => {
            "Child headcount unknown; ratio compliance cannot be decided"
        }
        ComplianceStatus::AdditionAtRisk => {
            "Staffing levels met but at least one addition has a coverage gap"
        }
        ComplianceStatus::NeedsReview => {
            "Requirements met but the schedule has overlapping or out-of-window shifts"
        }
        ComplianceStatus::Compliant => "Every block and addition requirement is met",
    }
    .to_string()
}

fn trace_block(trace: &mut AuditTrace, result: &BlockCompliance) {
    let reasoning = match result.status {
        BlockStatus::Closed => format!("Block {} is closed", result.block_id),
        BlockStatus::Undetermined => format!(
            "Block {}: floor of {} met with {} FTE; ratio requirement unknown without headcount",
            result.block_id,
            result.required_floor,
            result.actual_fte.round_dp(2)
        ),
        BlockStatus::Met | BlockStatus::Short => format!(
            "Block {}: required max(floor {}, ratio {}) = {}, present {} FTE",
            result.block_id,
            result.required_floor,
            result
                .required_by_ratio
                .map_or_else(|| "unknown".to_string(), |r| r.to_string()),
            result
                .required()
                .map_or_else(|| result.required_floor.to_string(), |r| r.to_string()),
            result.actual_fte.round_dp(2)
        ),
    };

    trace.push(
        "block_ratio_check",
        "Block Ratio and Floor Check",
        "staffing.block_ratios",
        serde_json::json!({
            "block_id": result.block_id,
            "ratio": result.ratio,
            "required_by_ratio": result.required_by_ratio,
            "required_floor": result.required_floor,
        }),
        serde_json::json!({
            "actual_fte": result.actual_fte.normalize().to_string(),
            "actual_headcount": result.actual_headcount,
            "status": result.status,
        }),
        reasoning,
    );
}

fn trace_addition(trace: &mut AuditTrace, result: &AdditionCheckResult) {
    let reasoning = if result.satisfied {
        format!(
            "{} covered in every checked block ({})",
            result.name,
            result.checked_blocks.join(", ")
        )
    } else {
        let gap_blocks: Vec<&str> = result.gaps.iter().map(|g| g.block_id.as_str()).collect();
        format!("{} has gaps in: {}", result.name, gap_blocks.join(", "))
    };

    trace.push(
        "addition_coverage",
        "Addition Continuous Coverage",
        &format!("additions.{}", result.addition_code),
        serde_json::json!({
            "addition_code": result.addition_code,
            "checked_blocks": result.checked_blocks,
        }),
        serde_json::json!({
            "satisfied": result.satisfied,
            "gap_blocks": result.gaps.iter().map(|g| &g.block_id).collect::<Vec<_>>(),
        }),
        reasoning,
    );
}

/// Sequentially numbered audit steps.
#[derive(Default)]
struct AuditTrace {
    steps: Vec<AuditStep>,
}

impl AuditTrace {
    fn push(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        rule_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            rule_ref: rule_ref.to_string(),
            input,
            output,
            reasoning,
        });
    }

    fn into_steps(self) -> Vec<AuditStep> {
        self.steps
    }
}
