//! Mapping boundary between the external data store and the engine.
//!
//! The store returns loosely typed rows: dates and times as strings,
//! qualifications as a comma-separated list, enums as free-form text. This
//! module turns them into the typed entities in [`crate::models`] so the
//! engine only ever sees validated input. Every parsing failure is an
//! [`EngineError::InvalidRecord`](crate::error::EngineError::InvalidRecord)
//! naming the record and field. A dated shift or count row that fails is
//! held against its date so the other dates still evaluate.
//!
//! # Example
//!
//! ```no_run
//! use staffing_compliance::config::ConfigLoader;
//! use staffing_compliance::mapping::{EvaluationInput, RawRecords};
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! let json = std::fs::read_to_string("records.json").unwrap();
//! let records: RawRecords = serde_json::from_str(&json).unwrap();
//! let input = EvaluationInput::from_records(&records, config.tables()).unwrap();
//! println!("{} shifts", input.shifts.len());
//! ```

mod convert;
mod parse;
mod records;

pub use convert::{
    EvaluationInput, MappedRows, map_child_counts, map_facility_settings,
    map_personnel_settings, map_shifts, map_staff,
};
pub use records::{
    ChildCountRecord, FacilitySettingsRecord, OperatingBlockRecord, PersonnelSettingsRecord,
    RawRecords, ShiftPatternRecord, ShiftRecord, StaffRecord,
};
