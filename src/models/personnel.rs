//! Staff and personnel classification models.
//!
//! This module defines the regulatory role ([`PersonnelType`]), the
//! employment arrangement ([`WorkStyle`]), the facility-owned [`Staff`]
//! record and the per-staff [`StaffPersonnelSettings`] profile the engine
//! reads when converting presence into coverage.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The regulatory role of a staff member.
///
/// Drives which ratio and addition rules a staff member's presence counts
/// toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonnelType {
    /// Facility manager.
    Manager,
    /// Child development support manager (service manager).
    ServiceManager,
    /// Childcare worker or child instructor.
    ChildcareWorker,
    /// Life-support worker.
    LifeSupportWorker,
    /// Other qualified specialist (therapists, psychologists, nurses).
    OtherQualified,
    /// Helper without a recognised qualification.
    UnqualifiedHelper,
}

impl PersonnelType {
    /// All personnel types in declaration order.
    pub const ALL: [PersonnelType; 6] = [
        PersonnelType::Manager,
        PersonnelType::ServiceManager,
        PersonnelType::ChildcareWorker,
        PersonnelType::LifeSupportWorker,
        PersonnelType::OtherQualified,
        PersonnelType::UnqualifiedHelper,
    ];

    /// Returns the snake_case code used in configuration and records.
    pub fn code(&self) -> &'static str {
        match self {
            PersonnelType::Manager => "manager",
            PersonnelType::ServiceManager => "service_manager",
            PersonnelType::ChildcareWorker => "childcare_worker",
            PersonnelType::LifeSupportWorker => "life_support_worker",
            PersonnelType::OtherQualified => "other_qualified",
            PersonnelType::UnqualifiedHelper => "unqualified_helper",
        }
    }
}

impl std::fmt::Display for PersonnelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The employment arrangement of a staff member.
///
/// Determines how presence converts into a full-time-equivalent contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStyle {
    /// Full-time employment.
    FullTime,
    /// Part-time employment with contracted weekly hours.
    PartTime,
    /// Per-diem (spot) engagement, counted only for blocks actually worked.
    PerDiem,
}

impl WorkStyle {
    /// Returns the snake_case code used in configuration and records.
    pub fn code(&self) -> &'static str {
        match self {
            WorkStyle::FullTime => "full_time",
            WorkStyle::PartTime => "part_time",
            WorkStyle::PerDiem => "per_diem",
        }
    }
}

impl std::fmt::Display for WorkStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A staff member owned by a facility.
///
/// Shifts reference staff by id and never own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The facility the staff member belongs to.
    pub facility_id: String,
    /// Regulatory role.
    pub personnel_type: PersonnelType,
    /// Employment arrangement.
    pub work_style: WorkStyle,
    /// Held qualifications (e.g., "nursery_teacher", "life_support").
    #[serde(default)]
    pub qualifications: BTreeSet<String>,
    /// Years of relevant experience, when known.
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    /// Full-time and assigned to this service only.
    #[serde(default)]
    pub full_time_dedicated: bool,
}

/// The regulatory profile of one staff member as seen by the engine.
///
/// Explicit settings rows take precedence over the classification stored on
/// the [`Staff`] record; see [`build_personnel_directory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffPersonnelSettings {
    /// The staff member this profile describes.
    pub staff_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Regulatory role.
    pub personnel_type: PersonnelType,
    /// Employment arrangement.
    pub work_style: WorkStyle,
    /// Held qualifications.
    #[serde(default)]
    pub qualifications: BTreeSet<String>,
    /// Years of relevant experience, when known.
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    /// Whether this staff member serves as facility manager.
    #[serde(default)]
    pub is_manager: bool,
    /// Whether this staff member serves as service manager.
    #[serde(default)]
    pub is_service_manager: bool,
    /// Full-time and assigned to this service only.
    #[serde(default)]
    pub full_time_dedicated: bool,
    /// Contracted weekly hours for part-time FTE weighting.
    #[serde(default)]
    pub contracted_weekly_hours: Option<Decimal>,
    /// Addition codes this staff member is assigned to.
    #[serde(default)]
    pub assigned_addition_codes: BTreeSet<String>,
}

impl StaffPersonnelSettings {
    /// Returns true if the staff member acts as manager, either by role flag
    /// or by personnel type.
    pub fn acts_as_manager(&self) -> bool {
        self.is_manager || self.personnel_type == PersonnelType::Manager
    }

    /// Returns true if the staff member acts as service manager, either by
    /// role flag or by personnel type.
    pub fn acts_as_service_manager(&self) -> bool {
        self.is_service_manager || self.personnel_type == PersonnelType::ServiceManager
    }

    /// Returns true for a dedicated full-time member of staff. The flag only
    /// counts while the work style is full time.
    pub fn is_full_time_dedicated(&self) -> bool {
        self.full_time_dedicated && self.work_style == WorkStyle::FullTime
    }
}

impl From<&Staff> for StaffPersonnelSettings {
    fn from(staff: &Staff) -> Self {
        StaffPersonnelSettings {
            staff_id: staff.id.clone(),
            name: staff.name.clone(),
            personnel_type: staff.personnel_type,
            work_style: staff.work_style,
            qualifications: staff.qualifications.clone(),
            years_of_experience: staff.years_of_experience,
            is_manager: staff.personnel_type == PersonnelType::Manager,
            is_service_manager: staff.personnel_type == PersonnelType::ServiceManager,
            full_time_dedicated: staff.full_time_dedicated,
            contracted_weekly_hours: None,
            assigned_addition_codes: BTreeSet::new(),
        }
    }
}

/// Personnel profiles keyed by staff id.
pub type PersonnelDirectory = HashMap<String, StaffPersonnelSettings>;

/// Builds the personnel directory consumed by coverage computation.
///
/// Every [`Staff`] record yields a default profile. A settings row for the
/// same staff id replaces it, inheriting the staff name, qualifications and
/// experience when the row leaves them empty. Settings rows for staff not in
/// the roster are still included.
///
/// # Example
///
/// ```
/// use staffing_compliance::models::{build_personnel_directory, PersonnelType, Staff, WorkStyle};
///
/// let staff = vec![Staff {
///     id: "st_001".to_string(),
///     name: "Sato".to_string(),
///     facility_id: "fac_001".to_string(),
///     personnel_type: PersonnelType::ChildcareWorker,
///     work_style: WorkStyle::FullTime,
///     qualifications: Default::default(),
///     years_of_experience: None,
///     full_time_dedicated: false,
/// }];
///
/// let directory = build_personnel_directory(&staff, &[]);
/// assert_eq!(directory["st_001"].personnel_type, PersonnelType::ChildcareWorker);
/// ```
pub fn build_personnel_directory(
    staff: &[Staff],
    settings: &[StaffPersonnelSettings],
) -> PersonnelDirectory {
    let mut directory: PersonnelDirectory = staff
        .iter()
        .map(|s| (s.id.clone(), StaffPersonnelSettings::from(s)))
        .collect();

    for row in settings {
        let mut merged = row.clone();
        if let Some(base) = directory.get(&row.staff_id) {
            if merged.name.is_empty() {
                merged.name = base.name.clone();
            }
            if merged.qualifications.is_empty() {
                merged.qualifications = base.qualifications.clone();
            }
            if merged.years_of_experience.is_none() {
                merged.years_of_experience = base.years_of_experience;
            }
        }
        directory.insert(row.staff_id.clone(), merged);
    }

    directory
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quals(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|q| q.to_string()).collect()
    }

    fn create_test_staff(id: &str, personnel_type: PersonnelType) -> Staff {
        Staff {
            id: id.to_string(),
            name: format!("Staff {}", id),
            facility_id: "fac_001".to_string(),
            personnel_type,
            work_style: WorkStyle::FullTime,
            qualifications: quals(&["nursery_teacher"]),
            years_of_experience: Some(6),
            full_time_dedicated: true,
        }
    }

    #[test]
    fn test_personnel_type_serialization() {
        assert_eq!(
            serde_json::to_string(&PersonnelType::ServiceManager).unwrap(),
            "\"service_manager\""
        );
        assert_eq!(
            serde_json::to_string(&PersonnelType::LifeSupportWorker).unwrap(),
            "\"life_support_worker\""
        );
        let parsed: PersonnelType = serde_json::from_str("\"unqualified_helper\"").unwrap();
        assert_eq!(parsed, PersonnelType::UnqualifiedHelper);
    }

    #[test]
    fn test_code_matches_serde_name() {
        for personnel_type in PersonnelType::ALL {
            let json = serde_json::to_string(&personnel_type).unwrap();
            assert_eq!(json, format!("\"{}\"", personnel_type.code()));
        }
        assert_eq!(
            serde_json::to_string(&WorkStyle::PerDiem).unwrap(),
            format!("\"{}\"", WorkStyle::PerDiem.code())
        );
    }

    #[test]
    fn test_settings_from_staff_sets_role_flags() {
        let manager = create_test_staff("st_001", PersonnelType::Manager);
        let settings = StaffPersonnelSettings::from(&manager);
        assert!(settings.is_manager);
        assert!(!settings.is_service_manager);
        assert!(settings.acts_as_manager());
        assert_eq!(settings.qualifications, quals(&["nursery_teacher"]));
    }

    #[test]
    fn test_role_flag_overrides_personnel_type() {
        let worker = create_test_staff("st_002", PersonnelType::ChildcareWorker);
        let mut settings = StaffPersonnelSettings::from(&worker);
        assert!(!settings.acts_as_service_manager());
        settings.is_service_manager = true;
        assert!(settings.acts_as_service_manager());
    }

    #[test]
    fn test_dedicated_flag_needs_full_time() {
        let worker = create_test_staff("st_003", PersonnelType::ChildcareWorker);
        let mut settings = StaffPersonnelSettings::from(&worker);
        assert!(settings.is_full_time_dedicated());
        settings.work_style = WorkStyle::PartTime;
        assert!(!settings.is_full_time_dedicated());
    }

    #[test]
    fn test_directory_settings_row_overrides_staff_defaults() {
        let staff = vec![create_test_staff("st_001", PersonnelType::ChildcareWorker)];
        let row = StaffPersonnelSettings {
            staff_id: "st_001".to_string(),
            name: String::new(),
            personnel_type: PersonnelType::LifeSupportWorker,
            work_style: WorkStyle::PartTime,
            qualifications: BTreeSet::new(),
            years_of_experience: None,
            is_manager: false,
            is_service_manager: false,
            full_time_dedicated: false,
            contracted_weekly_hours: Some(Decimal::new(20, 0)),
            assigned_addition_codes: quals(&["staff_allocation"]),
        };

        let directory = build_personnel_directory(&staff, &[row]);
        let merged = &directory["st_001"];
        assert_eq!(merged.personnel_type, PersonnelType::LifeSupportWorker);
        assert_eq!(merged.work_style, WorkStyle::PartTime);
        assert_eq!(merged.name, "Staff st_001");
        assert_eq!(merged.qualifications, quals(&["nursery_teacher"]));
        assert_eq!(merged.years_of_experience, Some(6));
        assert_eq!(merged.contracted_weekly_hours, Some(Decimal::new(20, 0)));
    }

    #[test]
    fn test_directory_keeps_settings_for_staff_outside_roster() {
        let row = StaffPersonnelSettings::from(&create_test_staff(
            "st_009",
            PersonnelType::OtherQualified,
        ));
        let directory = build_personnel_directory(&[], &[row]);
        assert!(directory.contains_key("st_009"));
    }
}
