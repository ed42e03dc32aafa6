//! Staffing Compliance Engine for childcare and disability-support facilities
//!
//! This crate evaluates a facility's scheduled shifts against regulatory
//! staffing rules: child-to-staff ratios per operating block, a minimum
//! staff floor, and continuous qualified-staff coverage for fee additions.
//! It produces a daily status with warnings and an audit trail, and folds
//! daily results into monthly summaries and work-schedule reports.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod mapping;
pub mod models;
