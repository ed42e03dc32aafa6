//! Core data models for the Staffing Compliance Engine.
//!
//! This module contains the domain entities consumed by the engine (staff,
//! personnel settings, shifts, facility settings) and the result values it
//! produces (daily compliance, monthly summary, work-schedule report).

mod compliance_result;
mod facility;
mod personnel;
mod report;
mod shift;

pub use compliance_result::{
    AdditionCheckResult, AdditionGap, AuditStep, BlockCompliance, BlockStatus,
    ComplianceSeverity, ComplianceStatus, ComplianceWarning, ComplianceWarningType,
    DailyStaffingCompliance, StaffComplianceBreakdown, StaffContribution,
};
pub use facility::{
    AdditionCoverage, AdditionStaffRequirement, FacilityStaffingSettings, OperatingBlock,
    RoleChecks, StaffingRatio, default_ratio_counted_types, validate_blocks,
};
pub use personnel::{
    PersonnelDirectory, PersonnelType, Staff, StaffPersonnelSettings, WorkStyle,
    build_personnel_directory,
};
pub use report::{
    AdditionMonthlyCount, MonthlyAggregate, MonthlyComplianceSummary, StaffScheduleLine,
    WarningFrequency, WorkScheduleReport,
};
pub use shift::{ShiftPattern, ShiftWithPattern, TimeRange, merge_ranges};
