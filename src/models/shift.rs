//! Shift model and related types.
//!
//! This module defines [`ShiftPattern`] and [`ShiftWithPattern`] for
//! representing a staff member's scheduled presence on a date, plus the
//! [`TimeRange`] interval type shared by coverage computation.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A half-open interval `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: NaiveTime,
    /// Exclusive end.
    pub end: NaiveTime,
}

impl TimeRange {
    /// Creates a new range. No ordering check is performed here.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Returns the length of the range in minutes, or zero when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use staffing_compliance::models::TimeRange;
    /// use chrono::NaiveTime;
    ///
    /// let range = TimeRange::new(
    ///     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
    /// );
    /// assert_eq!(range.minutes(), 210);
    /// ```
    pub fn minutes(&self) -> i64 {
        if self.end <= self.start {
            return 0;
        }
        (self.end - self.start).num_minutes()
    }

    /// Returns true if the range has no duration.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns the intersection of two ranges, if they share any time.
    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(TimeRange { start, end })
        } else {
            None
        }
    }

    /// Returns the number of minutes shared with another range.
    pub fn overlap_minutes(&self, other: &TimeRange) -> i64 {
        self.intersection(other).map_or(0, |r| r.minutes())
    }

    /// Returns true if `other` lies entirely within this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Merges overlapping or touching ranges into a sorted, disjoint list.
///
/// # Examples
///
/// ```
/// use staffing_compliance::models::{merge_ranges, TimeRange};
/// use chrono::NaiveTime;
///
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
/// let merged = merge_ranges(vec![
///     TimeRange::new(t(13), t(17)),
///     TimeRange::new(t(9), t(12)),
///     TimeRange::new(t(11), t(14)),
/// ]);
/// assert_eq!(merged, vec![TimeRange::new(t(9), t(17))]);
/// ```
pub fn merge_ranges(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.retain(|r| !r.is_empty());
    ranges.sort();

    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// A reusable time-block pattern such as "AM", "PM" or "full day".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPattern {
    /// Unique identifier for the pattern.
    pub id: String,
    /// Display name (e.g., "AM").
    pub name: String,
    /// Default start time.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Default end time.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Default unpaid break in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Whether the pattern represents a day off.
    #[serde(default)]
    pub is_day_off: bool,
}

/// A staff member's scheduled presence on one date.
///
/// Explicit start/end/break values on the shift override the pattern's
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWithPattern {
    /// Unique identifier for the shift.
    pub id: String,
    /// The staff member scheduled.
    pub staff_id: String,
    /// The calendar date of the shift.
    pub date: NaiveDate,
    /// Start time override.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// End time override.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Break override in minutes.
    #[serde(default)]
    pub break_minutes: Option<u32>,
    /// The time-block pattern this shift follows.
    #[serde(default)]
    pub pattern: Option<ShiftPattern>,
}

impl ShiftWithPattern {
    /// Effective start time: the shift's own value, else the pattern's.
    pub fn effective_start(&self) -> Option<NaiveTime> {
        self.start_time
            .or_else(|| self.pattern.as_ref().and_then(|p| p.start_time))
    }

    /// Effective end time: the shift's own value, else the pattern's.
    pub fn effective_end(&self) -> Option<NaiveTime> {
        self.end_time
            .or_else(|| self.pattern.as_ref().and_then(|p| p.end_time))
    }

    /// Effective break in minutes.
    pub fn effective_break_minutes(&self) -> u32 {
        self.break_minutes
            .or_else(|| self.pattern.as_ref().map(|p| p.break_minutes))
            .unwrap_or(0)
    }

    /// Returns true for shifts that put the staff member on the floor.
    ///
    /// Day-off patterns and shifts without a resolvable start and end are
    /// not working shifts.
    pub fn is_working(&self) -> bool {
        let day_off = self.pattern.as_ref().is_some_and(|p| p.is_day_off);
        !day_off && self.effective_start().is_some() && self.effective_end().is_some()
    }

    /// The scheduled interval, for working shifts.
    pub fn time_range(&self) -> Option<TimeRange> {
        if !self.is_working() {
            return None;
        }
        Some(TimeRange::new(self.effective_start()?, self.effective_end()?))
    }

    /// Validates the shift's ordering invariant.
    ///
    /// Non-working shifts are always valid. A working shift must start
    /// strictly before it ends and its break must fit inside it.
    pub fn validate(&self) -> EngineResult<()> {
        let Some(range) = self.time_range() else {
            return Ok(());
        };

        if range.start >= range.end {
            return Err(EngineError::InvalidShift {
                shift_id: self.id.clone(),
                message: format!(
                    "start time {} must be before end time {}",
                    range.start.format("%H:%M"),
                    range.end.format("%H:%M")
                ),
            });
        }

        if i64::from(self.effective_break_minutes()) >= range.minutes() {
            return Err(EngineError::InvalidShift {
                shift_id: self.id.clone(),
                message: format!(
                    "break of {} minutes does not fit in a {} minute shift",
                    self.effective_break_minutes(),
                    range.minutes()
                ),
            });
        }

        Ok(())
    }

    /// Scheduled minutes net of breaks.
    pub fn worked_minutes(&self) -> i64 {
        self.time_range()
            .map(|r| (r.minutes() - i64::from(self.effective_break_minutes())).max(0))
            .unwrap_or(0)
    }

    /// Scheduled hours net of breaks.
    ///
    /// # Examples
    ///
    /// ```
    /// use staffing_compliance::models::ShiftWithPattern;
    /// use chrono::{NaiveDate, NaiveTime};
    /// use rust_decimal::Decimal;
    ///
    /// let shift = ShiftWithPattern {
    ///     id: "sh_001".to_string(),
    ///     staff_id: "st_001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
    ///     start_time: NaiveTime::from_hms_opt(9, 0, 0),
    ///     end_time: NaiveTime::from_hms_opt(17, 30, 0),
    ///     break_minutes: Some(30),
    ///     pattern: None,
    /// };
    /// assert_eq!(shift.worked_hours(), Decimal::new(80, 1));
    /// ```
    pub fn worked_hours(&self) -> Decimal {
        Decimal::new(self.worked_minutes(), 0) / Decimal::new(60, 0)
    }
}
