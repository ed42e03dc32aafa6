//! Conversion from raw records to typed engine inputs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::RuleTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    FacilityStaffingSettings, OperatingBlock, PersonnelDirectory, PersonnelType, RoleChecks,
    ShiftPattern, ShiftWithPattern, Staff, StaffPersonnelSettings, WorkStyle,
    build_personnel_directory,
};

use super::parse::{
    invalid, is_dedicated_work_style, non_negative, parse_date, parse_optional_time,
    parse_personnel_type, parse_qualifications, parse_ratio, parse_time, parse_weekday,
    parse_work_style,
};
use super::records::{
    ChildCountRecord, FacilitySettingsRecord, PersonnelSettingsRecord, RawRecords,
    ShiftPatternRecord, ShiftRecord, StaffRecord,
};

/// Personnel type assumed when a row leaves it blank.
const DEFAULT_PERSONNEL_TYPE: PersonnelType = PersonnelType::ChildcareWorker;
/// Work style assumed when a row leaves it blank.
const DEFAULT_WORK_STYLE: WorkStyle = WorkStyle::PartTime;

fn blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Rows mapped for evaluation, plus rows rejected for a known date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappedRows<T> {
    /// Rows that mapped cleanly.
    pub rows: T,
    /// The first mapping error per date.
    pub rejected: BTreeMap<NaiveDate, EngineError>,
}

impl<T> MappedRows<T> {
    fn reject(&mut self, record: &str, date: NaiveDate, error: EngineError) {
        warn!(record, %date, %error, "rejected row");
        self.rejected.entry(date).or_insert(error);
    }
}

/// Maps staff rows.
///
/// A blank personnel type or work style falls back to childcare worker and
/// part time; an unrecognized one is an error. The dedicated flag follows
/// the work style code unless the row sets it.
pub fn map_staff(records: &[StaffRecord]) -> EngineResult<Vec<Staff>> {
    records
        .iter()
        .map(|r| {
            let personnel_type = blank(&r.personnel_type)
                .map(|v| parse_personnel_type("staff", "personnel_type", v))
                .transpose()?
                .unwrap_or(DEFAULT_PERSONNEL_TYPE);
            let work_style = blank(&r.work_style)
                .map(|v| parse_work_style("staff", "work_style", v))
                .transpose()?
                .unwrap_or(DEFAULT_WORK_STYLE);
            let years_of_experience = r
                .years_of_experience
                .map(|y| non_negative("staff", "years_of_experience", y))
                .transpose()?;

            let full_time_dedicated = r
                .full_time_dedicated
                .unwrap_or_else(|| blank(&r.work_style).is_some_and(is_dedicated_work_style));

            Ok(Staff {
                id: r.id.clone(),
                name: r.name.clone().unwrap_or_default(),
                facility_id: r.facility_id.clone().unwrap_or_default(),
                personnel_type,
                work_style,
                qualifications: parse_qualifications(r.qualifications.as_deref()),
                years_of_experience,
                full_time_dedicated,
            })
        })
        .collect()
}

/// Maps personnel settings rows.
///
/// A blank personnel type or work style is taken from the staff member's
/// own row when there is one, and a blank work style carries the staff
/// row's dedicated flag with it.
pub fn map_personnel_settings(
    records: &[PersonnelSettingsRecord],
    staff: &[Staff],
) -> EngineResult<Vec<StaffPersonnelSettings>> {
    let staff_by_id: HashMap<&str, &Staff> = staff.iter().map(|s| (s.id.as_str(), s)).collect();

    records
        .iter()
        .map(|r| {
            let base = staff_by_id.get(r.staff_id.as_str());
            let personnel_type = match blank(&r.personnel_type) {
                Some(v) => parse_personnel_type("personnel_settings", "personnel_type", v)?,
                None => base.map_or(DEFAULT_PERSONNEL_TYPE, |s| s.personnel_type),
            };
            let (work_style, dedicated_by_style) = match blank(&r.work_style) {
                Some(v) => (
                    parse_work_style("personnel_settings", "work_style", v)?,
                    is_dedicated_work_style(v),
                ),
                None => base.map_or((DEFAULT_WORK_STYLE, false), |s| {
                    (s.work_style, s.full_time_dedicated)
                }),
            };
            if let Some(hours) = r.contracted_weekly_hours {
                if hours.is_sign_negative() {
                    return Err(invalid(
                        "personnel_settings",
                        "contracted_weekly_hours",
                        format!("must not be negative, got {}", hours),
                    ));
                }
            }
            let years_of_experience = r
                .years_of_experience
                .map(|y| non_negative("personnel_settings", "years_of_experience", y))
                .transpose()?;

            Ok(StaffPersonnelSettings {
                staff_id: r.staff_id.clone(),
                name: r.staff_name.clone().unwrap_or_default(),
                personnel_type,
                work_style,
                qualifications: parse_qualifications(r.qualifications.as_deref()),
                years_of_experience,
                is_manager: r.is_manager.unwrap_or(false),
                is_service_manager: r.is_service_manager.unwrap_or(false),
                full_time_dedicated: r.full_time_dedicated.unwrap_or(dedicated_by_style),
                contracted_weekly_hours: r.contracted_weekly_hours,
                assigned_addition_codes: r
                    .assigned_addition_codes
                    .iter()
                    .flatten()
                    .cloned()
                    .collect(),
            })
        })
        .collect()
}

fn map_pattern(record: &ShiftPatternRecord) -> EngineResult<ShiftPattern> {
    Ok(ShiftPattern {
        id: record.id.clone(),
        name: record.name.clone().unwrap_or_default(),
        start_time: parse_optional_time("shift_pattern", "start_time", record.start_time.as_deref())?,
        end_time: parse_optional_time("shift_pattern", "end_time", record.end_time.as_deref())?,
        break_minutes: record
            .break_minutes
            .map(|m| non_negative("shift_pattern", "break_minutes", m))
            .transpose()?
            .unwrap_or(0),
        is_day_off: record.is_day_off.unwrap_or(false),
    })
}

fn map_shift(
    record: &ShiftRecord,
    date: NaiveDate,
    patterns: &HashMap<&str, ShiftPattern>,
) -> EngineResult<ShiftWithPattern> {
    let pattern = match blank(&record.shift_pattern_id) {
        Some(id) => Some(patterns.get(id).cloned().ok_or_else(|| {
            invalid(
                "shift",
                "shift_pattern_id",
                format!("shift {} references unknown pattern '{}'", record.id, id),
            )
        })?),
        None => None,
    };

    Ok(ShiftWithPattern {
        id: record.id.clone(),
        staff_id: record.staff_id.clone(),
        date,
        start_time: parse_optional_time("shift", "start_time", record.start_time.as_deref())?,
        end_time: parse_optional_time("shift", "end_time", record.end_time.as_deref())?,
        break_minutes: record
            .break_minutes
            .map(|m| non_negative("shift", "break_minutes", m))
            .transpose()?,
        pattern,
    })
}

/// Maps shift rows, attaching their patterns.
///
/// Rows with `has_shift: false` are placeholders and are dropped. A row
/// whose date parses but whose other fields do not is rejected for that
/// date only. Ordering of start and end is not checked here; the engine
/// rejects bad shifts per date.
///
/// # Errors
///
/// `InvalidRecord` for a shift with an unparseable date or a pattern row
/// that does not map.
pub fn map_shifts(
    records: &[ShiftRecord],
    patterns: &[ShiftPatternRecord],
) -> EngineResult<MappedRows<Vec<ShiftWithPattern>>> {
    let patterns: HashMap<&str, ShiftPattern> = patterns
        .iter()
        .map(|p| map_pattern(p).map(|mapped| (p.id.as_str(), mapped)))
        .collect::<EngineResult<_>>()?;

    let mut mapped: MappedRows<Vec<ShiftWithPattern>> = MappedRows::default();
    for record in records.iter().filter(|r| r.has_shift != Some(false)) {
        let date = parse_date("shift", "date", &record.date)?;
        match map_shift(record, date, &patterns) {
            Ok(shift) => mapped.rows.push(shift),
            Err(error) => mapped.reject("shift", date, error),
        }
    }
    Ok(mapped)
}

/// Maps the facility settings row, filling gaps from the rule tables.
///
/// Blocks without a ratio take the rule table's ratio for their id; a
/// missing default ratio, floor or ratio-counted type list takes the rule
/// table's value. Addition codes are resolved against the catalog.
///
/// # Errors
///
/// `InvalidRecord` for unparseable fields, `AdditionNotFound` for an
/// unknown addition code, and `InvalidSettings` when the resulting blocks
/// are empty, reversed or overlapping.
pub fn map_facility_settings(
    record: &FacilitySettingsRecord,
    rules: &RuleTables,
) -> EngineResult<FacilityStaffingSettings> {
    let staffing = rules.staffing();

    let blocks = record
        .blocks
        .iter()
        .map(|b| {
            let ratio = match blank(&b.ratio) {
                Some(v) => parse_ratio("operating_block", "ratio", v)?,
                None => staffing.ratio_for_block(&b.id),
            };
            Ok(OperatingBlock {
                id: b.id.clone(),
                label: b.label.clone().unwrap_or_else(|| b.id.clone()),
                start: parse_time("operating_block", "start_time", &b.start_time)?,
                end: parse_time("operating_block", "end_time", &b.end_time)?,
                ratio: Some(ratio),
                closed: b.closed.unwrap_or(false),
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let default_ratio = match blank(&record.default_ratio) {
        Some(v) => parse_ratio("facility_settings", "default_ratio", v)?,
        None => staffing.default_ratio,
    };
    let minimum_staff_floor = match record.minimum_staff_floor {
        Some(f) => non_negative("facility_settings", "minimum_staff_floor", f)?,
        None => staffing.minimum_staff_floor,
    };
    let ratio_counted_types = match &record.ratio_counted_types {
        Some(types) => types
            .iter()
            .map(|t| parse_personnel_type("facility_settings", "ratio_counted_types", t))
            .collect::<EngineResult<BTreeSet<_>>>()?,
        None => staffing.ratio_counted_types.clone(),
    };

    let addition_requirements = record
        .addition_codes
        .iter()
        .map(|code| {
            rules
                .addition(code)
                .map(|a| a.requirement.clone())
                .ok_or_else(|| EngineError::AdditionNotFound { code: code.clone() })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let closed_weekdays = record
        .closed_weekdays
        .iter()
        .map(|d| parse_weekday("facility_settings", "closed_weekdays", d))
        .collect::<EngineResult<Vec<_>>>()?;
    let closed_dates = record
        .closed_dates
        .iter()
        .map(|d| parse_date("facility_settings", "closed_dates", d))
        .collect::<EngineResult<BTreeSet<_>>>()?;

    let settings = FacilityStaffingSettings {
        facility_id: record.facility_id.clone(),
        blocks,
        default_ratio,
        minimum_staff_floor,
        ratio_counted_types,
        addition_requirements,
        role_checks: RoleChecks {
            manager: record.check_manager.unwrap_or(true),
            service_manager: record.check_service_manager.unwrap_or(true),
        },
        require_full_time_dedicated: record
            .require_full_time_dedicated
            .unwrap_or(staffing.require_full_time_dedicated),
        closed_weekdays,
        closed_dates,
    };
    settings.validate()?;
    Ok(settings)
}

/// Maps child count rows into a lookup keyed by date.
///
/// Rows with a `null` count are left out, so the date reads as unknown.
/// Negative counts are kept; the evaluator rejects them for their date. A
/// second count for the same date rejects that date.
///
/// # Errors
///
/// `InvalidRecord` for a row with an unparseable date.
pub fn map_child_counts(
    records: &[ChildCountRecord],
) -> EngineResult<MappedRows<BTreeMap<NaiveDate, i64>>> {
    let mut mapped: MappedRows<BTreeMap<NaiveDate, i64>> = MappedRows::default();
    for record in records {
        let date = parse_date("child_count", "date", &record.date)?;
        let Some(count) = record.count else {
            continue;
        };
        if mapped.rows.contains_key(&date) {
            let error = invalid(
                "child_count",
                "date",
                format!("more than one count for {}", date),
            );
            mapped.reject("child_count", date, error);
            continue;
        }
        mapped.rows.insert(date, count);
    }
    Ok(mapped)
}

/// Fully typed inputs for evaluating one facility over a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationInput {
    /// Staff roster.
    pub staff: Vec<Staff>,
    /// Personnel settings rows.
    pub personnel_settings: Vec<StaffPersonnelSettings>,
    /// Shifts for the period.
    pub shifts: Vec<ShiftWithPattern>,
    /// Facility settings.
    pub facility: FacilityStaffingSettings,
    /// Known child counts; a missing date means unknown.
    pub child_counts: BTreeMap<NaiveDate, i64>,
    /// Dates with a shift or count row that failed to map, with the first
    /// error for each.
    pub rejected_rows: BTreeMap<NaiveDate, EngineError>,
}

impl EvaluationInput {
    /// Maps a full set of raw records.
    ///
    /// Shift and count rows that fail after their date parsed are held in
    /// [`rejected_rows`](Self::rejected_rows) rather than failing the whole
    /// mapping.
    pub fn from_records(records: &RawRecords, rules: &RuleTables) -> EngineResult<Self> {
        let staff = map_staff(&records.staff)?;
        let personnel_settings = map_personnel_settings(&records.personnel_settings, &staff)?;
        let shifts = map_shifts(&records.shifts, &records.shift_patterns)?;
        let facility = map_facility_settings(&records.facility, rules)?;
        let child_counts = map_child_counts(&records.child_counts)?;

        let mut rejected_rows = shifts.rejected;
        for (date, error) in child_counts.rejected {
            rejected_rows.entry(date).or_insert(error);
        }

        debug!(
            facility_id = %facility.facility_id,
            staff = staff.len(),
            shifts = shifts.rows.len(),
            child_counts = child_counts.rows.len(),
            rejected_dates = rejected_rows.len(),
            "mapped raw records"
        );

        Ok(Self {
            staff,
            personnel_settings,
            shifts: shifts.rows,
            facility,
            child_counts: child_counts.rows,
            rejected_rows,
        })
    }

    /// Builds the personnel lookup used by coverage computation.
    pub fn personnel_directory(&self) -> PersonnelDirectory {
        build_personnel_directory(&self.staff, &self.personnel_settings)
    }

    /// Groups shifts by date.
    pub fn shifts_by_date(&self) -> BTreeMap<NaiveDate, Vec<ShiftWithPattern>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<ShiftWithPattern>> = BTreeMap::new();
        for shift in &self.shifts {
            grouped.entry(shift.date).or_default().push(shift.clone());
        }
        grouped
    }

    /// The mapping error that rejects a date, if any.
    pub fn rejected_row(&self, date: NaiveDate) -> Option<&EngineError> {
        self.rejected_rows.get(&date)
    }

    /// The child count for a date, if known.
    pub fn child_headcount(&self, date: NaiveDate) -> Option<i64> {
        self.child_counts.get(&date).copied()
    }
}
