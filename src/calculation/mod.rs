//! Calculation logic for the Staffing Compliance Engine.
//!
//! This module contains the pure evaluation pipeline: interval coverage per
//! operating block, ratio and floor checks, continuous-coverage checks for
//! fee additions, daily status derivation, monthly aggregation, and the
//! batch driver that runs them over a date range. Nothing here performs
//! I/O or holds state between calls.

mod addition_check;
mod coverage;
mod daily_compliance;
mod fte;
mod monthly;
mod range;
mod ratio;

pub use addition_check::check_addition_requirement;
pub use coverage::{
    BlockCoverage, CoverageCount, CoverageTimeline, OutOfWindowShift, PresentStaff,
    ShiftOverlap, compute_coverage,
};
pub use daily_compliance::evaluate_day;
pub use fte::{minutes_to_hours, prorated_fte};
pub use monthly::aggregate_month;
pub use range::{MonthlyEvaluation, RangeEvaluation, RejectedDay, evaluate_month, evaluate_range};
pub use ratio::required_staff;
