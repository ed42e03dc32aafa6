//! Interval coverage computation.
//!
//! This module converts one day's shifts into per-block coverage: for each
//! operating block, who is present, how many of each personnel type and
//! qualification, and the FTE-weighted count. Each staff member's shifts are
//! merged into disjoint intervals first so a double-booked staff member is
//! counted once per block.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::FteRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    OperatingBlock, PersonnelDirectory, PersonnelType, ShiftWithPattern, StaffContribution,
    StaffPersonnelSettings, TimeRange, merge_ranges, validate_blocks,
};

use super::fte::{minutes_to_hours, prorated_fte};

/// Headcount and FTE for one slice of a block (a personnel type, a
/// qualification, or unknown personnel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageCount {
    /// Distinct staff present.
    pub headcount: u32,
    /// FTE-weighted presence (not rounded).
    pub fte: Decimal,
}

impl CoverageCount {
    fn add(&mut self, fte: Decimal) {
        self.headcount += 1;
        self.fte += fte;
    }
}

/// A staff member present in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentStaff {
    /// Staff id.
    pub staff_id: String,
    /// Regulatory role; `None` for unknown personnel.
    pub personnel_type: Option<PersonnelType>,
    /// Minutes of the block covered.
    pub covered_minutes: i64,
    /// Prorated FTE contributed to the block.
    pub fte: Decimal,
}

/// Coverage of one operating block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCoverage {
    /// Block id.
    pub block_id: String,
    /// Block label.
    pub label: String,
    /// Block interval.
    pub range: TimeRange,
    /// Whether the block is closed.
    pub closed: bool,
    /// Counts per personnel type.
    pub by_personnel_type: BTreeMap<PersonnelType, CoverageCount>,
    /// Counts per held qualification.
    pub by_qualification: BTreeMap<String, CoverageCount>,
    /// Staff present with no personnel settings.
    pub unknown: CoverageCount,
    /// Everyone present, ordered by staff id.
    pub present: Vec<PresentStaff>,
}

impl BlockCoverage {
    /// Distinct staff of any kind present, unknown personnel included.
    pub fn total_headcount(&self) -> u32 {
        self.present.len() as u32
    }

    /// Distinct staff of the given types present.
    pub fn headcount_for(&self, types: &BTreeSet<PersonnelType>) -> u32 {
        types
            .iter()
            .filter_map(|t| self.by_personnel_type.get(t))
            .map(|c| c.headcount)
            .sum()
    }

    /// FTE of the given types present.
    pub fn fte_for(&self, types: &BTreeSet<PersonnelType>) -> Decimal {
        types
            .iter()
            .filter_map(|t| self.by_personnel_type.get(t))
            .map(|c| c.fte)
            .sum()
    }

    /// Returns true when nobody is present.
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }
}

/// A staff member scheduled on overlapping shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftOverlap {
    /// The double-booked staff member.
    pub staff_id: String,
    /// Shifts involved in at least one overlap.
    pub shift_ids: Vec<String>,
    /// Earliest overlap start to latest overlap end.
    pub range: TimeRange,
    /// Total minutes booked more than once.
    pub overlap_minutes: i64,
}

/// A shift with time outside every open block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfWindowShift {
    /// The shift.
    pub shift_id: String,
    /// Its staff member.
    pub staff_id: String,
    /// The full scheduled interval.
    pub shift_range: TimeRange,
    /// Minutes outside the open blocks, which do not count toward coverage.
    /// Gaps between blocks and closed blocks both count as outside.
    pub outside_minutes: i64,
}

/// Coverage of a whole day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTimeline {
    /// The date covered.
    pub date: NaiveDate,
    /// Earliest block start to latest block end.
    pub window: TimeRange,
    /// Block coverage in operating order.
    pub blocks: Vec<BlockCoverage>,
    /// Per-staff contributions, ordered by staff id.
    pub staff: Vec<StaffContribution>,
    /// Profiles of the known staff on shift, keyed by staff id.
    pub profiles: BTreeMap<String, StaffPersonnelSettings>,
    /// Double-booking findings, one per staff member.
    pub overlaps: Vec<ShiftOverlap>,
    /// Shifts with time outside the open blocks.
    pub out_of_window: Vec<OutOfWindowShift>,
    /// Staff ids on shift with no personnel settings.
    pub unknown_staff_ids: Vec<String>,
}

impl CoverageTimeline {
    /// Looks up block coverage by id.
    pub fn block(&self, block_id: &str) -> Option<&BlockCoverage> {
        self.blocks.iter().find(|b| b.block_id == block_id)
    }

    /// Looks up the profile of a present, known staff member.
    pub fn profile(&self, staff_id: &str) -> Option<&StaffPersonnelSettings> {
        self.profiles.get(staff_id)
    }
}

/// Computes per-block coverage for one date.
///
/// # Arguments
///
/// * `date` - The date being evaluated; every shift must fall on it
/// * `shifts` - The day's shifts; day-off and time-less shifts are ignored
/// * `personnel` - Profiles keyed by staff id
/// * `blocks` - The facility's operating blocks
/// * `fte_rules` - FTE weighting rules
///
/// # Errors
///
/// Returns `InvalidSettings` for empty, reversed or overlapping blocks,
/// `InvalidDate` for a shift on another date, and `InvalidShift` for a shift
/// whose start is not before its end.
///
/// A shift for a staff id missing from `personnel` does not fail: that staff
/// member is counted in total headcount with zero FTE and listed in
/// `unknown_staff_ids`.
pub fn compute_coverage(
    date: NaiveDate,
    shifts: &[ShiftWithPattern],
    personnel: &PersonnelDirectory,
    blocks: &[OperatingBlock],
    fte_rules: &FteRules,
) -> EngineResult<CoverageTimeline> {
    validate_blocks(blocks)?;

    let mut ordered: Vec<&OperatingBlock> = blocks.iter().collect();
    ordered.sort_by_key(|b| b.start);
    let window = TimeRange::new(ordered[0].start, ordered[ordered.len() - 1].end);
    let open_ranges: Vec<TimeRange> = ordered
        .iter()
        .filter(|b| !b.closed)
        .map(|b| b.range())
        .collect();

    let mut by_staff: BTreeMap<&str, Vec<(&ShiftWithPattern, TimeRange)>> = BTreeMap::new();
    for shift in shifts {
        if shift.date != date {
            return Err(EngineError::InvalidDate {
                field: format!("shifts.{}.date", shift.id),
                value: shift.date.to_string(),
            });
        }
        shift.validate()?;
        if let Some(range) = shift.time_range() {
            by_staff
                .entry(shift.staff_id.as_str())
                .or_default()
                .push((shift, range));
        }
    }

    let mut block_coverage: Vec<BlockCoverage> = ordered
        .iter()
        .map(|b| BlockCoverage {
            block_id: b.id.clone(),
            label: b.label.clone(),
            range: b.range(),
            closed: b.closed,
            by_personnel_type: BTreeMap::new(),
            by_qualification: BTreeMap::new(),
            unknown: CoverageCount::default(),
            present: vec![],
        })
        .collect();

    let mut staff = Vec::with_capacity(by_staff.len());
    let mut profiles = BTreeMap::new();
    let mut overlaps = vec![];
    let mut out_of_window = vec![];
    let mut unknown_staff_ids = vec![];

    for (staff_id, staff_shifts) in by_staff {
        let profile = personnel.get(staff_id);
        if profile.is_none() {
            warn!(%date, staff_id, "shift references staff with no personnel settings");
            unknown_staff_ids.push(staff_id.to_string());
        }

        if let Some(overlap) = find_overlap(staff_id, &staff_shifts) {
            overlaps.push(overlap);
        }

        for (shift, range) in &staff_shifts {
            let inside_minutes: i64 = open_ranges.iter().map(|o| range.overlap_minutes(o)).sum();
            let outside_minutes = range.minutes() - inside_minutes;
            if outside_minutes > 0 {
                out_of_window.push(OutOfWindowShift {
                    shift_id: shift.id.clone(),
                    staff_id: staff_id.to_string(),
                    shift_range: *range,
                    outside_minutes,
                });
            }
        }

        let merged = merge_ranges(staff_shifts.iter().map(|(_, r)| *r).collect());
        let merged_minutes: i64 = merged.iter().map(TimeRange::minutes).sum();
        let break_minutes = deduplicated_break_minutes(&staff_shifts);
        let scheduled_minutes = (merged_minutes - break_minutes).max(0);

        let weight = profile.map_or(Decimal::ZERO, |p| fte_rules.weight_for(p));
        let mut block_fte = BTreeMap::new();

        for (block, coverage) in ordered.iter().zip(block_coverage.iter_mut()) {
            let covered_minutes: i64 = merged
                .iter()
                .map(|r| r.overlap_minutes(&block.range()))
                .sum();
            if covered_minutes == 0 {
                continue;
            }

            let fte = prorated_fte(weight, covered_minutes, block.minutes());
            match profile {
                Some(p) => {
                    coverage
                        .by_personnel_type
                        .entry(p.personnel_type)
                        .or_default()
                        .add(fte);
                    for qualification in &p.qualifications {
                        coverage
                            .by_qualification
                            .entry(qualification.clone())
                            .or_default()
                            .add(fte);
                    }
                }
                None => coverage.unknown.add(fte),
            }
            coverage.present.push(PresentStaff {
                staff_id: staff_id.to_string(),
                personnel_type: profile.map(|p| p.personnel_type),
                covered_minutes,
                fte,
            });
            block_fte.insert(block.id.clone(), fte);
        }

        staff.push(StaffContribution {
            staff_id: staff_id.to_string(),
            name: profile.map(|p| p.name.clone()).unwrap_or_default(),
            known: profile.is_some(),
            personnel_type: profile.map(|p| p.personnel_type),
            work_style: profile.map(|p| p.work_style),
            qualifications: profile.map(|p| p.qualifications.clone()).unwrap_or_default(),
            shift_ids: staff_shifts.iter().map(|(s, _)| s.id.clone()).collect(),
            scheduled_minutes,
            scheduled_hours: minutes_to_hours(scheduled_minutes),
            fte_weight: weight,
            block_fte,
            is_manager: profile.is_some_and(|p| p.acts_as_manager()),
            is_service_manager: profile.is_some_and(|p| p.acts_as_service_manager()),
            full_time_dedicated: profile.is_some_and(|p| p.is_full_time_dedicated()),
        });

        if let Some(p) = profile {
            profiles.insert(staff_id.to_string(), p.clone());
        }
    }

    debug!(
        %date,
        staff = staff.len(),
        blocks = block_coverage.len(),
        overlaps = overlaps.len(),
        out_of_window = out_of_window.len(),
        "computed coverage"
    );

    Ok(CoverageTimeline {
        date,
        window,
        blocks: block_coverage,
        staff,
        profiles,
        overlaps,
        out_of_window,
        unknown_staff_ids,
    })
}

/// Total break minutes for one staff member's shifts.
///
/// Each run of overlapping shifts contributes its longest break once, so a
/// duplicated shift does not take its break twice. Back-to-back shifts keep
/// their own breaks.
fn deduplicated_break_minutes(shifts: &[(&ShiftWithPattern, TimeRange)]) -> i64 {
    let mut sorted: Vec<&(&ShiftWithPattern, TimeRange)> = shifts.iter().collect();
    sorted.sort_by_key(|(_, r)| *r);

    let mut total = 0;
    let mut run: Option<(NaiveTime, i64)> = None;
    for (shift, range) in sorted {
        let minutes = i64::from(shift.effective_break_minutes());
        run = match run {
            Some((end, longest)) if range.start < end => {
                Some((end.max(range.end), longest.max(minutes)))
            }
            Some((_, longest)) => {
                total += longest;
                Some((range.end, minutes))
            }
            None => Some((range.end, minutes)),
        };
    }
    total + run.map_or(0, |(_, longest)| longest)
}

/// Finds the time a staff member is booked more than once.
fn find_overlap(staff_id: &str, shifts: &[(&ShiftWithPattern, TimeRange)]) -> Option<ShiftOverlap> {
    let mut sorted: Vec<&(&ShiftWithPattern, TimeRange)> = shifts.iter().collect();
    sorted.sort_by(|(a, ra), (b, rb)| ra.cmp(rb).then_with(|| a.id.cmp(&b.id)));

    let mut regions = vec![];
    let mut shift_ids = BTreeSet::new();
    for (i, (a, ra)) in sorted.iter().enumerate() {
        for (b, rb) in sorted.iter().skip(i + 1) {
            if rb.start >= ra.end {
                break;
            }
            if let Some(shared) = ra.intersection(rb) {
                regions.push(shared);
                shift_ids.insert(a.id.clone());
                shift_ids.insert(b.id.clone());
            }
        }
    }

    let regions = merge_ranges(regions);
    let first = regions.first()?;
    let last = regions.last()?;
    Some(ShiftOverlap {
        staff_id: staff_id.to_string(),
        shift_ids: shift_ids.into_iter().collect(),
        range: TimeRange::new(first.start, last.end),
        overlap_minutes: regions.iter().map(TimeRange::minutes).sum(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkStyle;
    use chrono::NaiveTime;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn block(id: &str, start: &str, end: &str) -> OperatingBlock {
        OperatingBlock {
            id: id.to_string(),
            label: id.to_uppercase(),
            start: make_time(start),
            end: make_time(end),
            ratio: None,
            closed: false,
        }
    }

    fn am_pm() -> Vec<OperatingBlock> {
        vec![block("am", "09:00", "13:00"), block("pm", "13:00", "17:00")]
    }

    fn profile(id: &str, personnel_type: PersonnelType, work_style: WorkStyle) -> StaffPersonnelSettings {
        StaffPersonnelSettings {
            staff_id: id.to_string(),
            name: format!("Staff {}", id),
            personnel_type,
            work_style,
            qualifications: BTreeSet::new(),
            years_of_experience: None,
            is_manager: false,
            is_service_manager: false,
            full_time_dedicated: false,
            contracted_weekly_hours: None,
            assigned_addition_codes: BTreeSet::new(),
        }
    }

    fn directory(profiles: Vec<StaffPersonnelSettings>) -> PersonnelDirectory {
        profiles
            .into_iter()
            .map(|p| (p.staff_id.clone(), p))
            .collect::<HashMap<_, _>>()
    }

    fn shift(id: &str, staff_id: &str, start: &str, end: &str) -> ShiftWithPattern {
        ShiftWithPattern {
            id: id.to_string(),
            staff_id: staff_id.to_string(),
            date: make_date("2025-04-01"),
            start_time: Some(make_time(start)),
            end_time: Some(make_time(end)),
            break_minutes: None,
            pattern: None,
        }
    }

    fn compute(shifts: &[ShiftWithPattern], personnel: &PersonnelDirectory) -> CoverageTimeline {
        compute_coverage(
            make_date("2025-04-01"),
            shifts,
            personnel,
            &am_pm(),
            &FteRules::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_full_day_full_timer_counts_one_per_block() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let timeline = compute(&[shift("sh_1", "st_001", "09:00", "17:00")], &personnel);

        for b in &timeline.blocks {
            let count = b.by_personnel_type[&PersonnelType::ChildcareWorker];
            assert_eq!(count.headcount, 1);
            assert_eq!(count.fte, dec("1"));
        }
        assert_eq!(timeline.staff[0].scheduled_minutes, 480);
        assert_eq!(timeline.staff[0].scheduled_hours, dec("8"));
    }

    #[test]
    fn test_partial_overlap_is_prorated() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::PerDiem,
        )]);
        let timeline = compute(&[shift("sh_1", "st_001", "11:00", "14:00")], &personnel);

        let am = timeline.block("am").unwrap();
        let pm = timeline.block("pm").unwrap();
        assert_eq!(am.fte_for(&[PersonnelType::ChildcareWorker].into()), dec("0.5"));
        assert_eq!(pm.fte_for(&[PersonnelType::ChildcareWorker].into()), dec("0.25"));
        assert_eq!(am.present[0].covered_minutes, 120);
    }

    #[test]
    fn test_part_time_weight_from_contracted_hours() {
        let mut p = profile("st_001", PersonnelType::ChildcareWorker, WorkStyle::PartTime);
        p.contracted_weekly_hours = Some(dec("20"));
        let timeline = compute(&[shift("sh_1", "st_001", "09:00", "13:00")], &directory(vec![p]));

        assert_eq!(timeline.staff[0].fte_weight, dec("0.5"));
        assert_eq!(timeline.staff[0].block_fte["am"], dec("0.5"));
        assert!(!timeline.staff[0].block_fte.contains_key("pm"));
    }

    #[test]
    fn test_double_booking_counted_once_with_one_overlap() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let timeline = compute(
            &[
                shift("sh_1", "st_001", "09:00", "13:00"),
                shift("sh_2", "st_001", "10:00", "12:00"),
                shift("sh_3", "st_001", "11:00", "15:00"),
            ],
            &personnel,
        );

        assert_eq!(timeline.overlaps.len(), 1);
        let overlap = &timeline.overlaps[0];
        assert_eq!(overlap.shift_ids, vec!["sh_1", "sh_2", "sh_3"]);
        assert_eq!(
            overlap.range,
            TimeRange::new(make_time("10:00"), make_time("13:00"))
        );

        let am = timeline.block("am").unwrap();
        assert_eq!(am.total_headcount(), 1);
        assert_eq!(am.fte_for(&[PersonnelType::ChildcareWorker].into()), dec("1"));
        // 09:00-15:00 merged
        assert_eq!(timeline.staff[0].scheduled_minutes, 360);
    }

    #[test]
    fn test_duplicate_shift_takes_its_break_once() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let mut first = shift("sh_1", "st_001", "09:00", "17:00");
        first.break_minutes = Some(60);
        let mut second = shift("sh_2", "st_001", "09:00", "17:00");
        second.break_minutes = Some(60);

        let single = compute(&[first.clone()], &personnel);
        let doubled = compute(&[first, second], &personnel);

        assert_eq!(single.staff[0].scheduled_minutes, 420);
        assert_eq!(doubled.staff[0].scheduled_minutes, 420);
        assert_eq!(doubled.staff[0].scheduled_hours, dec("7"));
    }

    #[test]
    fn test_back_to_back_shifts_keep_both_breaks() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let mut am = shift("sh_1", "st_001", "09:00", "13:00");
        am.break_minutes = Some(15);
        let mut pm = shift("sh_2", "st_001", "13:00", "17:00");
        pm.break_minutes = Some(30);
        let timeline = compute(&[am, pm], &personnel);

        assert_eq!(timeline.staff[0].scheduled_minutes, 435);
    }

    #[test]
    fn test_back_to_back_shifts_do_not_overlap() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let timeline = compute(
            &[
                shift("sh_1", "st_001", "09:00", "13:00"),
                shift("sh_2", "st_001", "13:00", "17:00"),
            ],
            &personnel,
        );
        assert!(timeline.overlaps.is_empty());
        assert_eq!(timeline.staff[0].shift_ids.len(), 2);
    }

    #[test]
    fn test_unknown_staff_counted_without_fte() {
        let timeline = compute(&[shift("sh_1", "ghost", "09:00", "13:00")], &directory(vec![]));

        assert_eq!(timeline.unknown_staff_ids, vec!["ghost"]);
        let am = timeline.block("am").unwrap();
        assert_eq!(am.total_headcount(), 1);
        assert_eq!(am.unknown.headcount, 1);
        assert_eq!(am.unknown.fte, Decimal::ZERO);
        assert!(!timeline.staff[0].known);
        assert!(timeline.profile("ghost").is_none());
    }

    #[test]
    fn test_out_of_window_portion_does_not_count() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let timeline = compute(&[shift("sh_1", "st_001", "07:00", "11:00")], &personnel);

        assert_eq!(timeline.out_of_window.len(), 1);
        assert_eq!(timeline.out_of_window[0].outside_minutes, 120);
        assert_eq!(
            timeline
                .block("am")
                .unwrap()
                .fte_for(&[PersonnelType::ChildcareWorker].into()),
            dec("0.5")
        );
    }

    #[test]
    fn test_time_between_blocks_is_out_of_window() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let blocks = vec![block("am", "09:00", "12:00"), block("pm", "13:00", "17:00")];
        let timeline = compute_coverage(
            make_date("2025-04-01"),
            &[shift("sh_1", "st_001", "09:00", "17:00")],
            &personnel,
            &blocks,
            &FteRules::default(),
        )
        .unwrap();

        assert_eq!(timeline.out_of_window.len(), 1);
        assert_eq!(timeline.out_of_window[0].outside_minutes, 60);
    }

    #[test]
    fn test_time_in_closed_block_is_out_of_window() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let mut blocks = am_pm();
        blocks[1].closed = true;
        let timeline = compute_coverage(
            make_date("2025-04-01"),
            &[shift("sh_1", "st_001", "12:00", "15:00")],
            &personnel,
            &blocks,
            &FteRules::default(),
        )
        .unwrap();

        assert_eq!(timeline.out_of_window[0].outside_minutes, 120);
    }

    #[test]
    fn test_qualification_counts() {
        let mut p = profile("st_001", PersonnelType::ChildcareWorker, WorkStyle::FullTime);
        p.qualifications.insert("life_support".to_string());
        let timeline = compute(&[shift("sh_1", "st_001", "09:00", "13:00")], &directory(vec![p]));

        let am = timeline.block("am").unwrap();
        assert_eq!(am.by_qualification["life_support"].headcount, 1);
        assert!(timeline.block("pm").unwrap().by_qualification.is_empty());
    }

    #[test]
    fn test_day_off_shift_is_ignored() {
        let personnel = directory(vec![profile(
            "st_001",
            PersonnelType::ChildcareWorker,
            WorkStyle::FullTime,
        )]);
        let mut off = shift("sh_1", "st_001", "09:00", "13:00");
        off.start_time = None;
        off.end_time = None;
        let timeline = compute(&[off], &personnel);
        assert!(timeline.staff.is_empty());
        assert!(timeline.blocks.iter().all(BlockCoverage::is_empty));
    }

    #[test]
    fn test_reversed_shift_is_rejected() {
        let result = compute_coverage(
            make_date("2025-04-01"),
            &[shift("sh_1", "st_001", "13:00", "09:00")],
            &directory(vec![]),
            &am_pm(),
            &FteRules::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidShift { .. })));
    }

    #[test]
    fn test_shift_on_other_date_is_rejected() {
        let result = compute_coverage(
            make_date("2025-04-02"),
            &[shift("sh_1", "st_001", "09:00", "13:00")],
            &directory(vec![]),
            &am_pm(),
            &FteRules::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidDate { .. })));
    }

    #[test]
    fn test_blocks_reported_in_start_order() {
        let blocks = vec![block("pm", "13:00", "17:00"), block("am", "09:00", "13:00")];
        let timeline = compute_coverage(
            make_date("2025-04-01"),
            &[],
            &directory(vec![]),
            &blocks,
            &FteRules::default(),
        )
        .unwrap();
        assert_eq!(timeline.blocks[0].block_id, "am");
        assert_eq!(
            timeline.window,
            TimeRange::new(make_time("09:00"), make_time("17:00"))
        );
    }
}
