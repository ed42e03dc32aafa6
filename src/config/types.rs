//! Rule-table types for staffing compliance.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML rule tables.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AdditionStaffRequirement, PersonnelType, StaffPersonnelSettings, StaffingRatio, WorkStyle,
    default_ratio_counted_types,
};

/// Metadata about the rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    /// Short code of the regulatory scheme (e.g., "JP-DSS-2024").
    pub code: String,
    /// The human-readable name of the rule set.
    pub name: String,
    /// The version or effective date of the rules.
    pub version: String,
    /// URL to the regulatory source.
    #[serde(default)]
    pub source_url: String,
}

/// How a work style converts a full block of presence into FTE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FteWeighting {
    /// A fixed fraction.
    Fixed {
        /// The FTE weight for a full block.
        weight: Decimal,
    },
    /// Contracted weekly hours divided by the standard weekly hours.
    ContractedHours {
        /// Weight used when no contracted hours are recorded.
        fallback: Decimal,
    },
}

/// An FTE weighting that applies to one personnel type and work style pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FteOverride {
    /// The personnel type matched.
    pub personnel_type: PersonnelType,
    /// The work style matched.
    pub work_style: WorkStyle,
    /// The weighting applied.
    pub weighting: FteWeighting,
}

/// FTE weighting rules.
///
/// Overrides for a specific personnel type and work style pair win over the
/// per-work-style defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FteRules {
    /// The facility's standard full-time weekly hours.
    pub standard_weekly_hours: Decimal,
    /// Weighting for full-time staff.
    pub full_time: FteWeighting,
    /// Weighting for part-time staff.
    pub part_time: FteWeighting,
    /// Weighting for per-diem staff.
    pub per_diem: FteWeighting,
    /// Pair-specific overrides.
    #[serde(default)]
    pub overrides: Vec<FteOverride>,
}

impl Default for FteRules {
    fn default() -> Self {
        Self {
            standard_weekly_hours: Decimal::new(40, 0),
            full_time: FteWeighting::Fixed {
                weight: Decimal::ONE,
            },
            part_time: FteWeighting::ContractedHours {
                fallback: Decimal::new(5, 1),
            },
            per_diem: FteWeighting::Fixed {
                weight: Decimal::ONE,
            },
            overrides: vec![],
        }
    }
}

impl FteRules {
    /// Returns the weighting for a personnel type and work style pair.
    pub fn weighting_for(&self, personnel_type: PersonnelType, work_style: WorkStyle) -> FteWeighting {
        self.overrides
            .iter()
            .find(|o| o.personnel_type == personnel_type && o.work_style == work_style)
            .map(|o| o.weighting)
            .unwrap_or(match work_style {
                WorkStyle::FullTime => self.full_time,
                WorkStyle::PartTime => self.part_time,
                WorkStyle::PerDiem => self.per_diem,
            })
    }

    /// Returns the FTE weight for a full block of presence by this staff
    /// member, clamped to `[0, 1]`.
    ///
    /// Contracted-hours weights are rounded to two decimal places.
    ///
    /// # Example
    ///
    /// ```
    /// use staffing_compliance::config::FteRules;
    /// use staffing_compliance::models::{PersonnelType, StaffPersonnelSettings, WorkStyle};
    /// use rust_decimal::Decimal;
    ///
    /// let rules = FteRules::default();
    /// let part_timer = StaffPersonnelSettings {
    ///     staff_id: "st_001".to_string(),
    ///     name: "Sato".to_string(),
    ///     personnel_type: PersonnelType::ChildcareWorker,
    ///     work_style: WorkStyle::PartTime,
    ///     qualifications: Default::default(),
    ///     years_of_experience: None,
    ///     is_manager: false,
    ///     is_service_manager: false,
    ///     full_time_dedicated: false,
    ///     contracted_weekly_hours: Some(Decimal::new(30, 0)),
    ///     assigned_addition_codes: Default::default(),
    /// };
    /// assert_eq!(rules.weight_for(&part_timer), Decimal::new(75, 2));
    /// ```
    pub fn weight_for(&self, profile: &StaffPersonnelSettings) -> Decimal {
        let weight = match self.weighting_for(profile.personnel_type, profile.work_style) {
            FteWeighting::Fixed { weight } => weight,
            FteWeighting::ContractedHours { fallback } => match profile.contracted_weekly_hours {
                Some(hours) if self.standard_weekly_hours > Decimal::ZERO => {
                    (hours / self.standard_weekly_hours).round_dp(2)
                }
                _ => fallback,
            },
        };
        weight.clamp(Decimal::ZERO, Decimal::ONE)
    }
}

/// A default ratio for a conventionally named block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRatioRule {
    /// Block id the ratio applies to (e.g., "am").
    pub block_id: String,
    /// The ratio.
    pub ratio: StaffingRatio,
}

/// Baseline staffing rules applied when facility settings leave a value out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingRules {
    /// Ratio for blocks without a specific rule.
    pub default_ratio: StaffingRatio,
    /// Minimum staff on the floor regardless of ratio.
    pub minimum_staff_floor: u32,
    /// Per-block ratio defaults.
    #[serde(default)]
    pub block_ratios: Vec<BlockRatioRule>,
    /// Personnel types whose FTE counts toward ratio and floor.
    #[serde(default = "default_ratio_counted_types")]
    pub ratio_counted_types: BTreeSet<PersonnelType>,
    /// Whether a full-time dedicated staff member must be on shift.
    #[serde(default)]
    pub require_full_time_dedicated: bool,
}

impl StaffingRules {
    /// Returns the default ratio for a block id.
    pub fn ratio_for_block(&self, block_id: &str) -> StaffingRatio {
        self.block_ratios
            .iter()
            .find(|r| r.block_id == block_id)
            .map(|r| r.ratio)
            .unwrap_or(self.default_ratio)
    }
}

/// Contents of `rules.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Rule-set metadata.
    pub metadata: RuleMetadata,
    /// FTE weighting rules.
    #[serde(default)]
    pub fte: FteRules,
    /// Baseline staffing rules.
    pub staffing: StaffingRules,
}

/// A fee addition in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionDefinition {
    /// The staffing condition.
    #[serde(flatten)]
    pub requirement: AdditionStaffRequirement,
    /// Regulatory reference for the addition.
    #[serde(default)]
    pub reference: String,
}

/// Contents of `additions.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionsConfig {
    /// The addition catalog.
    pub additions: Vec<AdditionDefinition>,
}

/// The complete rule tables loaded from YAML files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTables {
    metadata: RuleMetadata,
    fte: FteRules,
    staffing: StaffingRules,
    additions: BTreeMap<String, AdditionDefinition>,
}

impl RuleTables {
    /// Creates rule tables from their component parts.
    ///
    /// Later catalog entries with a duplicate code replace earlier ones.
    pub fn new(
        metadata: RuleMetadata,
        fte: FteRules,
        staffing: StaffingRules,
        additions: Vec<AdditionDefinition>,
    ) -> Self {
        let additions = additions
            .into_iter()
            .map(|a| (a.requirement.addition_code.clone(), a))
            .collect();
        Self {
            metadata,
            fte,
            staffing,
            additions,
        }
    }

    /// Returns the rule-set metadata.
    pub fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    /// Returns the FTE weighting rules.
    pub fn fte(&self) -> &FteRules {
        &self.fte
    }

    /// Returns the baseline staffing rules.
    pub fn staffing(&self) -> &StaffingRules {
        &self.staffing
    }

    /// Returns the addition catalog keyed by code.
    pub fn additions(&self) -> &BTreeMap<String, AdditionDefinition> {
        &self.additions
    }

    /// Looks up an addition by code.
    pub fn addition(&self, code: &str) -> Option<&AdditionDefinition> {
        self.additions.get(code)
    }
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::new(
            RuleMetadata {
                code: "default".to_string(),
                name: "Built-in defaults".to_string(),
                version: "0".to_string(),
                source_url: String::new(),
            },
            FteRules::default(),
            StaffingRules {
                default_ratio: StaffingRatio {
                    staff: 1,
                    children: 10,
                },
                minimum_staff_floor: 2,
                block_ratios: vec![],
                ratio_counted_types: default_ratio_counted_types(),
                require_full_time_dedicated: false,
            },
            vec![],
        )
    }
}
