//! Fee addition coverage checks.
//!
//! An addition is satisfied only if every checked block has enough
//! qualifying staff. A single uncovered block invalidates the addition for
//! the whole day; coverage is never averaged across blocks.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{AdditionCheckResult, AdditionCoverage, AdditionGap, AdditionStaffRequirement};

use super::coverage::{BlockCoverage, CoverageTimeline};

/// Checks one addition's staffing requirement against a day's coverage.
///
/// Continuous additions are checked in every open block. Block-restricted
/// additions are checked only in the listed blocks; a listed block id that
/// the facility does not have is reported as a gap. Closed blocks are never
/// checked.
///
/// A present staff member qualifies when their profile is known and
/// [`AdditionStaffRequirement::accepts`] it. A block is covered when at
/// least `min_staff_count` qualifying staff are present and, if `min_fte`
/// is set, their combined prorated FTE reaches it.
///
/// # Example
///
/// ```
/// use staffing_compliance::calculation::{check_addition_requirement, compute_coverage};
/// use staffing_compliance::config::FteRules;
/// use staffing_compliance::models::{
///     AdditionCoverage, AdditionStaffRequirement, OperatingBlock, PersonnelDirectory,
/// };
/// use chrono::{NaiveDate, NaiveTime};
///
/// let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
/// let blocks = vec![OperatingBlock {
///     id: "am".to_string(),
///     label: "AM".to_string(),
///     start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///     end: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
///     ratio: None,
///     closed: false,
/// }];
/// let coverage = compute_coverage(
///     date, &[], &PersonnelDirectory::new(), &blocks, &FteRules::default(),
/// ).unwrap();
///
/// let requirement = AdditionStaffRequirement {
///     addition_code: "nursing_staff".to_string(),
///     name: "Nursing staff".to_string(),
///     accepted_personnel_types: Default::default(),
///     accepted_qualifications: ["nurse".to_string()].into(),
///     any_qualification: true,
///     coverage: AdditionCoverage::Continuous,
///     min_staff_count: 1,
///     min_fte: None,
///     min_years_experience: None,
///     required_work_style: None,
///     assigned_only: false,
/// };
///
/// let result = check_addition_requirement(date, &coverage, &requirement);
/// assert!(!result.satisfied);
/// assert_eq!(result.gaps[0].block_id, "am");
/// ```
pub fn check_addition_requirement(
    date: NaiveDate,
    coverage: &CoverageTimeline,
    requirement: &AdditionStaffRequirement,
) -> AdditionCheckResult {
    let targets: Vec<(String, Option<&BlockCoverage>)> = match &requirement.coverage {
        AdditionCoverage::Continuous => coverage
            .blocks
            .iter()
            .filter(|b| !b.closed)
            .map(|b| (b.block_id.clone(), Some(b)))
            .collect(),
        AdditionCoverage::Blocks { block_ids } => block_ids
            .iter()
            .map(|id| (id.clone(), coverage.block(id)))
            .filter(|(_, b)| !b.is_some_and(|b| b.closed))
            .collect(),
    };

    let mut checked_blocks = Vec::with_capacity(targets.len());
    let mut gaps = vec![];

    for (block_id, block) in targets {
        checked_blocks.push(block_id.clone());

        let Some(block) = block else {
            gaps.push(AdditionGap {
                block_id,
                range: None,
                qualifying_staff: 0,
                qualifying_fte: Decimal::ZERO,
                reason: "block is not configured for this facility".to_string(),
            });
            continue;
        };

        let (qualifying_staff, qualifying_fte) = qualifying_presence(coverage, block, requirement);

        let reason = if qualifying_staff < requirement.min_staff_count {
            Some(format!(
                "{} qualifying staff present, {} required",
                qualifying_staff, requirement.min_staff_count
            ))
        } else {
            match requirement.min_fte {
                Some(min_fte) if qualifying_fte < min_fte => Some(format!(
                    "qualifying FTE {} below required {}",
                    qualifying_fte.round_dp(2),
                    min_fte
                )),
                _ => None,
            }
        };

        if let Some(reason) = reason {
            gaps.push(AdditionGap {
                block_id,
                range: Some(block.range),
                qualifying_staff,
                qualifying_fte,
                reason,
            });
        }
    }

    debug!(
        %date,
        addition_code = %requirement.addition_code,
        checked = checked_blocks.len(),
        gaps = gaps.len(),
        "checked addition requirement"
    );

    AdditionCheckResult {
        addition_code: requirement.addition_code.clone(),
        name: requirement.display_name().to_string(),
        satisfied: gaps.is_empty(),
        checked_blocks,
        gaps,
    }
}

fn qualifying_presence(
    coverage: &CoverageTimeline,
    block: &BlockCoverage,
    requirement: &AdditionStaffRequirement,
) -> (u32, Decimal) {
    block
        .present
        .iter()
        .filter(|p| {
            coverage
                .profile(&p.staff_id)
                .is_some_and(|profile| requirement.accepts(profile))
        })
        .fold((0, Decimal::ZERO), |(count, fte), p| (count + 1, fte + p.fte))
}
