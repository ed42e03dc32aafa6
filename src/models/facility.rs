//! Facility staffing configuration models.
//!
//! This module contains the per-facility settings the engine evaluates
//! against: operating blocks with their ratios, the minimum staff floor, and
//! the fee additions the facility has opted into.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::personnel::{PersonnelType, StaffPersonnelSettings, WorkStyle};
use super::shift::TimeRange;

/// A minimum staff-to-child ratio such as "1:4".
///
/// Serialized in its `staff:children` string form.
///
/// # Example
///
/// ```
/// use staffing_compliance::models::StaffingRatio;
///
/// let ratio: StaffingRatio = "1:4".parse().unwrap();
/// assert_eq!(ratio.staff, 1);
/// assert_eq!(ratio.children, 4);
/// assert_eq!(ratio.to_string(), "1:4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StaffingRatio {
    /// Staff required per group of `children`.
    pub staff: u32,
    /// Children per group.
    pub children: u32,
}

impl StaffingRatio {
    /// Creates a ratio, rejecting zero on either side.
    pub fn new(staff: u32, children: u32) -> EngineResult<Self> {
        if staff == 0 || children == 0 {
            return Err(EngineError::InvalidSettings {
                field: "ratio".to_string(),
                message: format!("ratio {}:{} must be positive on both sides", staff, children),
            });
        }
        Ok(Self { staff, children })
    }
}

impl FromStr for StaffingRatio {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidSettings {
            field: "ratio".to_string(),
            message: format!("expected 'staff:children', got '{}'", s),
        };

        let (staff, children) = s.trim().split_once(':').ok_or_else(invalid)?;
        let staff = staff.trim().parse::<u32>().map_err(|_| invalid())?;
        let children = children.trim().parse::<u32>().map_err(|_| invalid())?;
        StaffingRatio::new(staff, children)
    }
}

impl TryFrom<String> for StaffingRatio {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StaffingRatio> for String {
    fn from(ratio: StaffingRatio) -> Self {
        ratio.to_string()
    }
}

impl std::fmt::Display for StaffingRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.staff, self.children)
    }
}

/// A facility-configured sub-interval of the operating day.
///
/// Blocks are the unit of coverage and ratio evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingBlock {
    /// Identifier (e.g., "am").
    pub id: String,
    /// Display label (e.g., "Morning").
    #[serde(default)]
    pub label: String,
    /// Block start.
    pub start: NaiveTime,
    /// Block end.
    pub end: NaiveTime,
    /// Ratio for this block; falls back to the facility default.
    #[serde(default)]
    pub ratio: Option<StaffingRatio>,
    /// Closed blocks are never evaluated for ratio or continuity.
    #[serde(default)]
    pub closed: bool,
}

impl OperatingBlock {
    /// The block's interval.
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    /// Length of the block in minutes.
    pub fn minutes(&self) -> i64 {
        self.range().minutes()
    }
}

/// Which blocks an addition must be covered in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AdditionCoverage {
    /// Every open block of the operating window.
    #[default]
    Continuous,
    /// Only the listed blocks.
    Blocks {
        /// The block ids that must be covered.
        block_ids: Vec<String>,
    },
}

fn default_true() -> bool {
    true
}

fn default_min_staff_count() -> u32 {
    1
}

/// The staffing condition a fee addition imposes.
///
/// A present staff member qualifies when the requirement lists neither types
/// nor qualifications, when their personnel type is accepted, or when their
/// qualifications satisfy the accepted qualification list. Experience, work
/// style and assignment restrictions apply on top of that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionStaffRequirement {
    /// Addition code (e.g., "specialist_support").
    pub addition_code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Personnel types accepted outright.
    #[serde(default)]
    pub accepted_personnel_types: BTreeSet<PersonnelType>,
    /// Qualifications accepted.
    #[serde(default)]
    pub accepted_qualifications: BTreeSet<String>,
    /// Whether holding any one accepted qualification suffices (otherwise all).
    #[serde(default = "default_true")]
    pub any_qualification: bool,
    /// Which blocks must be covered.
    #[serde(default)]
    pub coverage: AdditionCoverage,
    /// Qualifying staff required in each checked block.
    #[serde(default = "default_min_staff_count")]
    pub min_staff_count: u32,
    /// Qualifying FTE required in each checked block.
    #[serde(default)]
    pub min_fte: Option<Decimal>,
    /// Minimum years of experience for a qualifying staff member.
    #[serde(default)]
    pub min_years_experience: Option<u32>,
    /// Required work style for a qualifying staff member.
    #[serde(default)]
    pub required_work_style: Option<WorkStyle>,
    /// Only staff assigned to this addition code qualify.
    #[serde(default)]
    pub assigned_only: bool,
}

impl AdditionStaffRequirement {
    /// Returns true if the given profile can satisfy this requirement.
    ///
    /// # Example
    ///
    /// ```
    /// use staffing_compliance::models::{
    ///     AdditionCoverage, AdditionStaffRequirement, PersonnelType, StaffPersonnelSettings,
    ///     WorkStyle,
    /// };
    ///
    /// let requirement = AdditionStaffRequirement {
    ///     addition_code: "life_support".to_string(),
    ///     name: "Life support addition".to_string(),
    ///     accepted_personnel_types: [PersonnelType::LifeSupportWorker].into(),
    ///     accepted_qualifications: ["life_support".to_string()].into(),
    ///     any_qualification: true,
    ///     coverage: AdditionCoverage::Continuous,
    ///     min_staff_count: 1,
    ///     min_fte: None,
    ///     min_years_experience: None,
    ///     required_work_style: None,
    ///     assigned_only: false,
    /// };
    ///
    /// let worker = StaffPersonnelSettings {
    ///     staff_id: "st_001".to_string(),
    ///     name: "Sato".to_string(),
    ///     personnel_type: PersonnelType::ChildcareWorker,
    ///     work_style: WorkStyle::FullTime,
    ///     qualifications: ["life_support".to_string()].into(),
    ///     years_of_experience: None,
    ///     is_manager: false,
    ///     is_service_manager: false,
    ///     full_time_dedicated: false,
    ///     contracted_weekly_hours: None,
    ///     assigned_addition_codes: Default::default(),
    /// };
    /// assert!(requirement.accepts(&worker));
    /// ```
    pub fn accepts(&self, profile: &StaffPersonnelSettings) -> bool {
        let role_matches = (self.accepted_personnel_types.is_empty()
            && self.accepted_qualifications.is_empty())
            || self.accepted_personnel_types.contains(&profile.personnel_type)
            || self.qualification_matches(&profile.qualifications);
        if !role_matches {
            return false;
        }

        if let Some(min_years) = self.min_years_experience {
            if profile.years_of_experience.unwrap_or(0) < min_years {
                return false;
            }
        }

        if let Some(work_style) = self.required_work_style {
            if profile.work_style != work_style {
                return false;
            }
        }

        !self.assigned_only || profile.assigned_addition_codes.contains(&self.addition_code)
    }

    fn qualification_matches(&self, held: &BTreeSet<String>) -> bool {
        if self.accepted_qualifications.is_empty() {
            return false;
        }
        if self.any_qualification {
            self.accepted_qualifications.iter().any(|q| held.contains(q))
        } else {
            self.accepted_qualifications.iter().all(|q| held.contains(q))
        }
    }

    /// The display name, falling back to the code.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.addition_code
        } else {
            &self.name
        }
    }
}

/// Advisory presence checks for leadership roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChecks {
    /// Warn when no manager is on shift.
    #[serde(default = "default_true")]
    pub manager: bool,
    /// Warn when no service manager is on shift.
    #[serde(default = "default_true")]
    pub service_manager: bool,
}

impl Default for RoleChecks {
    fn default() -> Self {
        Self {
            manager: true,
            service_manager: true,
        }
    }
}

/// Returns the personnel types whose FTE counts toward ratios by default.
pub fn default_ratio_counted_types() -> BTreeSet<PersonnelType> {
    [
        PersonnelType::ChildcareWorker,
        PersonnelType::LifeSupportWorker,
        PersonnelType::OtherQualified,
    ]
    .into_iter()
    .collect()
}

fn default_ratio() -> StaffingRatio {
    StaffingRatio {
        staff: 1,
        children: 10,
    }
}

/// Per-facility staffing configuration, as currently active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityStaffingSettings {
    /// The facility these settings belong to.
    pub facility_id: String,
    /// Operating blocks of the day.
    pub blocks: Vec<OperatingBlock>,
    /// Ratio for blocks without their own.
    #[serde(default = "default_ratio")]
    pub default_ratio: StaffingRatio,
    /// Minimum staff on the floor regardless of ratio.
    #[serde(default)]
    pub minimum_staff_floor: u32,
    /// Personnel types whose FTE counts toward ratio and floor.
    #[serde(default = "default_ratio_counted_types")]
    pub ratio_counted_types: BTreeSet<PersonnelType>,
    /// Additions the facility has opted into.
    #[serde(default)]
    pub addition_requirements: Vec<AdditionStaffRequirement>,
    /// Leadership presence checks.
    #[serde(default)]
    pub role_checks: RoleChecks,
    /// Require at least one full-time dedicated member of ratio-counted
    /// staff on any day with ratio-counted staff on shift.
    #[serde(default)]
    pub require_full_time_dedicated: bool,
    /// Weekdays the facility does not operate.
    #[serde(default)]
    pub closed_weekdays: Vec<Weekday>,
    /// Specific dates the facility does not operate.
    #[serde(default)]
    pub closed_dates: BTreeSet<NaiveDate>,
}

impl FacilityStaffingSettings {
    /// The ratio that applies to a block.
    pub fn ratio_for(&self, block: &OperatingBlock) -> StaffingRatio {
        block.ratio.unwrap_or(self.default_ratio)
    }

    /// The full operating window spanned by all blocks.
    pub fn operating_window(&self) -> Option<TimeRange> {
        let start = self.blocks.iter().map(|b| b.start).min()?;
        let end = self.blocks.iter().map(|b| b.end).max()?;
        Some(TimeRange::new(start, end))
    }

    /// Returns true if the facility does not operate on the given date.
    pub fn is_closed_on(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        self.closed_dates.contains(&date) || self.closed_weekdays.contains(&date.weekday())
    }

    /// Looks up a block by id.
    pub fn block(&self, id: &str) -> Option<&OperatingBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Checks block layout invariants.
    ///
    /// Blocks must be non-empty, uniquely named, each start before it ends,
    /// and not overlap one another.
    pub fn validate(&self) -> EngineResult<()> {
        validate_blocks(&self.blocks)
    }
}

/// Checks that blocks are well-formed, uniquely identified and disjoint.
pub fn validate_blocks(blocks: &[OperatingBlock]) -> EngineResult<()> {
    if blocks.is_empty() {
        return Err(EngineError::InvalidSettings {
            field: "blocks".to_string(),
            message: "at least one operating block is required".to_string(),
        });
    }

    let mut ids = BTreeSet::new();
    for block in blocks {
        if block.start >= block.end {
            return Err(EngineError::InvalidSettings {
                field: format!("blocks.{}", block.id),
                message: format!("block {} is empty or reversed", block.range()),
            });
        }
        if !ids.insert(block.id.as_str()) {
            return Err(EngineError::InvalidSettings {
                field: format!("blocks.{}", block.id),
                message: "duplicate block id".to_string(),
            });
        }
    }

    let mut sorted: Vec<&OperatingBlock> = blocks.iter().collect();
    sorted.sort_by_key(|b| b.start);
    for pair in sorted.windows(2) {
        if pair[0].end > pair[1].start {
            return Err(EngineError::InvalidSettings {
                field: format!("blocks.{}", pair[1].id),
                message: format!(
                    "block {} overlaps block {}",
                    pair[1].id, pair[0].id
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
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

    fn profile(personnel_type: PersonnelType, quals: &[&str]) -> StaffPersonnelSettings {
        StaffPersonnelSettings {
            staff_id: "st_001".to_string(),
            name: "Test".to_string(),
            personnel_type,
            work_style: WorkStyle::FullTime,
            qualifications: quals.iter().map(|q| q.to_string()).collect(),
            years_of_experience: Some(3),
            is_manager: false,
            is_service_manager: false,
            full_time_dedicated: false,
            contracted_weekly_hours: None,
            assigned_addition_codes: BTreeSet::new(),
        }
    }

    fn requirement() -> AdditionStaffRequirement {
        AdditionStaffRequirement {
            addition_code: "specialist_support".to_string(),
            name: String::new(),
            accepted_personnel_types: BTreeSet::new(),
            accepted_qualifications: ["pt", "ot"].iter().map(|q| q.to_string()).collect(),
            any_qualification: true,
            coverage: AdditionCoverage::Continuous,
            min_staff_count: 1,
            min_fte: None,
            min_years_experience: None,
            required_work_style: None,
            assigned_only: false,
        }
    }

    #[test]
    fn test_ratio_parse_and_display() {
        let ratio: StaffingRatio = " 2 : 9 ".parse().unwrap();
        assert_eq!(ratio, StaffingRatio { staff: 2, children: 9 });
        assert_eq!(ratio.to_string(), "2:9");
    }

    #[test]
    fn test_ratio_rejects_zero_and_garbage() {
        assert!("1:0".parse::<StaffingRatio>().is_err());
        assert!("0:4".parse::<StaffingRatio>().is_err());
        assert!("one to four".parse::<StaffingRatio>().is_err());
    }

    #[test]
    fn test_ratio_serde_uses_string_form() {
        let ratio = StaffingRatio { staff: 1, children: 4 };
        assert_eq!(serde_json::to_string(&ratio).unwrap(), "\"1:4\"");
        let parsed: StaffingRatio = serde_json::from_str("\"1:3\"").unwrap();
        assert_eq!(parsed.children, 3);
        assert!(serde_json::from_str::<StaffingRatio>("\"1:x\"").is_err());
    }

    #[test]
    fn test_any_qualification_accepts_single_match() {
        let req = requirement();
        assert!(req.accepts(&profile(PersonnelType::OtherQualified, &["ot"])));
        assert!(!req.accepts(&profile(PersonnelType::OtherQualified, &["nurse"])));
    }

    #[test]
    fn test_all_qualifications_requires_every_match() {
        let mut req = requirement();
        req.any_qualification = false;
        assert!(!req.accepts(&profile(PersonnelType::OtherQualified, &["ot"])));
        assert!(req.accepts(&profile(PersonnelType::OtherQualified, &["ot", "pt"])));
    }

    #[test]
    fn test_personnel_type_accepted_without_qualification() {
        let mut req = requirement();
        req.accepted_personnel_types.insert(PersonnelType::LifeSupportWorker);
        assert!(req.accepts(&profile(PersonnelType::LifeSupportWorker, &[])));
    }

    #[test]
    fn test_open_requirement_accepts_anyone() {
        let mut req = requirement();
        req.accepted_qualifications.clear();
        assert!(req.accepts(&profile(PersonnelType::UnqualifiedHelper, &[])));
    }

    #[test]
    fn test_experience_work_style_and_assignment_restrictions() {
        let mut req = requirement();
        req.min_years_experience = Some(5);
        assert!(!req.accepts(&profile(PersonnelType::OtherQualified, &["pt"])));

        req.min_years_experience = None;
        req.required_work_style = Some(WorkStyle::PartTime);
        assert!(!req.accepts(&profile(PersonnelType::OtherQualified, &["pt"])));

        req.required_work_style = None;
        req.assigned_only = true;
        let mut assigned = profile(PersonnelType::OtherQualified, &["pt"]);
        assert!(!req.accepts(&assigned));
        assigned
            .assigned_addition_codes
            .insert("specialist_support".to_string());
        assert!(req.accepts(&assigned));
    }

    #[test]
    fn test_validate_blocks_accepts_adjacent_blocks() {
        let blocks = vec![block("pm", "13:00", "17:00"), block("am", "09:00", "13:00")];
        assert!(validate_blocks(&blocks).is_ok());
    }

    #[test]
    fn test_validate_blocks_rejects_overlap_duplicates_and_empty() {
        assert!(validate_blocks(&[]).is_err());
        assert!(
            validate_blocks(&[block("am", "09:00", "13:00"), block("pm", "12:00", "17:00")])
                .is_err()
        );
        assert!(
            validate_blocks(&[block("am", "09:00", "13:00"), block("am", "13:00", "17:00")])
                .is_err()
        );
        assert!(validate_blocks(&[block("am", "13:00", "09:00")]).is_err());
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{
            "facility_id": "fac_001",
            "blocks": [
                { "id": "am", "start": "09:00:00", "end": "13:00:00", "ratio": "1:4" },
                { "id": "pm", "start": "13:00:00", "end": "17:00:00" }
            ],
            "minimum_staff_floor": 2,
            "closed_weekdays": ["Sun"]
        }"#;

        let settings: FacilityStaffingSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.ratio_for(&settings.blocks[0]).children, 4);
        assert_eq!(settings.ratio_for(&settings.blocks[1]).children, 10);
        assert_eq!(settings.ratio_counted_types, default_ratio_counted_types());
        assert!(settings.role_checks.manager);
        assert_eq!(
            settings.operating_window(),
            Some(TimeRange::new(make_time("09:00"), make_time("17:00")))
        );
        // 2025-04-06 is a Sunday
        assert!(settings.is_closed_on(NaiveDate::from_ymd_opt(2025, 4, 6).unwrap()));
        assert!(!settings.is_closed_on(NaiveDate::from_ymd_opt(2025, 4, 7).unwrap()));
    }
}
