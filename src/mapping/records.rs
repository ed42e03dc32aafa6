//! Raw record shapes as returned by the external data store.
//!
//! Every field the store may omit is optional; free-form strings are parsed
//! by the functions in [`super`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A staff row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaffRecord {
    /// Staff id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Owning facility.
    #[serde(default)]
    pub facility_id: Option<String>,
    /// Personnel type as stored (e.g., "childcare_worker").
    #[serde(default)]
    pub personnel_type: Option<String>,
    /// Work style as stored (e.g., "parttime").
    #[serde(default)]
    pub work_style: Option<String>,
    /// Comma-separated qualification codes.
    #[serde(default)]
    pub qualifications: Option<String>,
    /// Years of experience.
    #[serde(default)]
    pub years_of_experience: Option<i64>,
    /// Full-time dedicated flag; derived from the work style when absent.
    #[serde(default)]
    pub full_time_dedicated: Option<bool>,
}

/// A staff personnel settings row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonnelSettingsRecord {
    /// Staff id the row applies to.
    pub staff_id: String,
    /// Personnel type as stored.
    #[serde(default)]
    pub personnel_type: Option<String>,
    /// Work style as stored.
    #[serde(default)]
    pub work_style: Option<String>,
    /// Manager flag.
    #[serde(default)]
    pub is_manager: Option<bool>,
    /// Service manager flag.
    #[serde(default)]
    pub is_service_manager: Option<bool>,
    /// Full-time dedicated flag; derived from the work style when absent.
    #[serde(default)]
    pub full_time_dedicated: Option<bool>,
    /// Contracted weekly hours.
    #[serde(default)]
    pub contracted_weekly_hours: Option<Decimal>,
    /// Additions the staff member is assigned to.
    #[serde(default)]
    pub assigned_addition_codes: Option<Vec<String>>,
    /// Joined staff name.
    #[serde(default)]
    pub staff_name: Option<String>,
    /// Joined comma-separated qualifications.
    #[serde(default)]
    pub qualifications: Option<String>,
    /// Joined years of experience.
    #[serde(default)]
    pub years_of_experience: Option<i64>,
}

/// A shift pattern row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftPatternRecord {
    /// Pattern id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// "HH:MM" or "HH:MM:SS".
    #[serde(default)]
    pub start_time: Option<String>,
    /// "HH:MM" or "HH:MM:SS".
    #[serde(default)]
    pub end_time: Option<String>,
    /// Break in minutes.
    #[serde(default)]
    pub break_minutes: Option<i64>,
    /// Day-off flag.
    #[serde(default)]
    pub is_day_off: Option<bool>,
}

/// A shift row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Shift id.
    pub id: String,
    /// Staff id.
    pub staff_id: String,
    /// "YYYY-MM-DD".
    pub date: String,
    /// Start override.
    #[serde(default)]
    pub start_time: Option<String>,
    /// End override.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Break override in minutes.
    #[serde(default)]
    pub break_minutes: Option<i64>,
    /// Referenced pattern id.
    #[serde(default)]
    pub shift_pattern_id: Option<String>,
    /// False for placeholder rows with no actual shift.
    #[serde(default)]
    pub has_shift: Option<bool>,
}

/// An operating block row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperatingBlockRecord {
    /// Block id.
    pub id: String,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
    /// "HH:MM" or "HH:MM:SS".
    pub start_time: String,
    /// "HH:MM" or "HH:MM:SS".
    pub end_time: String,
    /// Ratio as "staff:children"; filled from the rule tables when absent.
    #[serde(default)]
    pub ratio: Option<String>,
    /// Closed flag.
    #[serde(default)]
    pub closed: Option<bool>,
}

/// A facility staffing settings row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FacilitySettingsRecord {
    /// Facility id.
    pub facility_id: String,
    /// Operating blocks.
    #[serde(default)]
    pub blocks: Vec<OperatingBlockRecord>,
    /// Ratio for blocks without their own.
    #[serde(default)]
    pub default_ratio: Option<String>,
    /// Minimum staff floor.
    #[serde(default)]
    pub minimum_staff_floor: Option<i64>,
    /// Personnel types counted toward ratios.
    #[serde(default)]
    pub ratio_counted_types: Option<Vec<String>>,
    /// Addition codes the facility has opted into.
    #[serde(default)]
    pub addition_codes: Vec<String>,
    /// Warn when no manager is on shift.
    #[serde(default)]
    pub check_manager: Option<bool>,
    /// Warn when no service manager is on shift.
    #[serde(default)]
    pub check_service_manager: Option<bool>,
    /// Require a full-time dedicated staff member on shift.
    #[serde(default)]
    pub require_full_time_dedicated: Option<bool>,
    /// Weekday names the facility does not operate.
    #[serde(default)]
    pub closed_weekdays: Vec<String>,
    /// Dates the facility does not operate.
    #[serde(default)]
    pub closed_dates: Vec<String>,
}

/// A child attendance count row. A `null` count means unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChildCountRecord {
    /// "YYYY-MM-DD".
    pub date: String,
    /// Children attending.
    #[serde(default)]
    pub count: Option<i64>,
}

/// Everything needed to evaluate a facility over a period, as raw rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRecords {
    /// Staff rows.
    #[serde(default)]
    pub staff: Vec<StaffRecord>,
    /// Personnel settings rows.
    #[serde(default)]
    pub personnel_settings: Vec<PersonnelSettingsRecord>,
    /// Shift pattern rows.
    #[serde(default)]
    pub shift_patterns: Vec<ShiftPatternRecord>,
    /// Shift rows.
    #[serde(default)]
    pub shifts: Vec<ShiftRecord>,
    /// Facility settings row.
    pub facility: FacilitySettingsRecord,
    /// Child count rows.
    #[serde(default)]
    pub child_counts: Vec<ChildCountRecord>,
}
