//! Request types for the attendance API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{PauseType, TimeRecordFilter};

/// Body for clock-in, clock-out and end-pause.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotesRequest {
    /// Optional free-text note.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body for `POST /time-records/:id/pauses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPauseRequest {
    /// Why work is being suspended.
    pub pause_type: PauseType,
    /// Optional note recorded when the pause starts.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query string for `GET /time-records`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTimeRecordsQuery {
    /// Restrict to one employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Inclusive lower date bound (`YYYY-MM-DD`).
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound (`YYYY-MM-DD`).
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl From<ListTimeRecordsQuery> for TimeRecordFilter {
    fn from(query: ListTimeRecordsQuery) -> Self {
        TimeRecordFilter {
            // `?employee_id=` means "everyone"
            employee_id: query.employee_id.filter(|id| !id.is_empty()),
            start_date: query.start_date,
            end_date: query.end_date,
        }
    }
}

/// Query string for date-bounded per-employee endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateRangeQuery {
    /// Inclusive lower date bound.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl DateRangeQuery {
    /// Builds a filter for one employee within this range.
    pub fn for_employee(self, employee_id: String) -> TimeRecordFilter {
        TimeRecordFilter {
            employee_id: Some(employee_id),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
