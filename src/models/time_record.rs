//! Time record model and related types.
//!
//! This module defines the [`TimeRecord`] struct (one clock-in to clock-out
//! attendance span) together with the [`TimeRecordFilter`] used for listing
//! and the [`OpenState`] snapshot returned to callers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PauseRecord;

/// Prefix used when clock-out notes are appended to a record.
pub const CLOCK_OUT_NOTE_PREFIX: &str = "Saída";

/// Represents one continuous attendance span for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRecord {
    /// Unique identifier, assigned at clock-in.
    pub id: Uuid,
    /// The employee this span belongs to.
    pub employee_id: String,
    /// The instant the span was opened.
    pub timestamp_in: DateTime<Utc>,
    /// The instant the span was closed; `None` while open.
    #[serde(default)]
    pub timestamp_out: Option<DateTime<Utc>>,
    /// Business day of `timestamp_in`, used for filtering and grouping.
    pub date: NaiveDate,
    /// Free-text annotation.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TimeRecord {
    /// Returns true while the span has not been clocked out.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::TimeRecord;
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use uuid::Uuid;
    ///
    /// let record = TimeRecord {
    ///     id: Uuid::new_v4(),
    ///     employee_id: "emp3".to_string(),
    ///     timestamp_in: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
    ///     timestamp_out: None,
    ///     date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
    ///     notes: None,
    /// };
    /// assert!(record.is_open());
    /// ```
    pub fn is_open(&self) -> bool {
        self.timestamp_out.is_none()
    }

    /// Appends a clock-out note without discarding what is already there.
    ///
    /// Existing notes `A` become `"A (Saída: B)"`; an empty record gets
    /// `"Saída: B"`.
    pub fn append_clock_out_note(&mut self, note: &str) {
        let current = self.notes.as_deref().unwrap_or("");
        self.notes = Some(if current.is_empty() {
            format!("{}: {}", CLOCK_OUT_NOTE_PREFIX, note)
        } else {
            format!("{} ({}: {})", current, CLOCK_OUT_NOTE_PREFIX, note)
        });
    }
}

/// Filter for listing time records. Unset fields match everything.
///
/// Date bounds are inclusive and compared against [`TimeRecord::date`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecordFilter {
    /// Only records for this employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Only records on or after this date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Only records on or before this date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl TimeRecordFilter {
    /// A filter restricted to one employee.
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::default()
        }
    }

    /// Returns true if the record satisfies every bound that is set.
    pub fn matches(&self, record: &TimeRecord) -> bool {
        if let Some(employee_id) = &self.employee_id {
            if &record.employee_id != employee_id {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if record.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.date > end {
                return false;
            }
        }
        true
    }
}

/// The open record and open pause of an employee, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenState {
    /// The employee's open time record.
    pub record: Option<TimeRecord>,
    /// The open pause of that record.
    pub pause: Option<PauseRecord>,
}

impl OpenState {
    /// True when the employee is clocked in.
    pub fn is_clocked_in(&self) -> bool {
        self.record.is_some()
    }

    /// True when the employee is clocked in and currently paused.
    pub fn is_on_pause(&self) -> bool {
        self.pause.is_some()
    }
}
