//! Storage for time records and pause records.
//!
//! [`TimeRecordStore`] is the repository seam: the service only talks to
//! this trait, so the in-memory implementation can be swapped for a real
//! database without touching the state machine. Stores do not enforce the
//! attendance invariants themselves; that is the service's job.

mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ClockResult;
use crate::models::{PauseRecord, TimeRecord, TimeRecordFilter};

pub use memory::InMemoryTimeRecordStore;

/// Query and mutation primitives over the two attendance collections.
#[async_trait]
pub trait TimeRecordStore: Send + Sync {
    /// Appends a new time record.
    async fn insert_time_record(&self, record: TimeRecord) -> ClockResult<()>;

    /// Appends a new pause record.
    async fn insert_pause_record(&self, pause: PauseRecord) -> ClockResult<()>;

    /// Replaces the stored record with the same id.
    ///
    /// Returns a `Storage` error if no record has that id.
    async fn update_time_record(&self, record: TimeRecord) -> ClockResult<()>;

    /// Replaces the stored pause with the same id.
    ///
    /// Returns a `Storage` error if no pause has that id.
    async fn update_pause_record(&self, pause: PauseRecord) -> ClockResult<()>;

    /// Looks a time record up by id.
    async fn get_time_record(&self, id: Uuid) -> ClockResult<Option<TimeRecord>>;

    /// Looks a pause record up by id.
    async fn get_pause_record(&self, id: Uuid) -> ClockResult<Option<PauseRecord>>;

    /// Returns the employee's record with no `timestamp_out`, if any.
    async fn find_open_time_record(&self, employee_id: &str) -> ClockResult<Option<TimeRecord>>;

    /// Returns the record's pause with no `timestamp_end`, if any.
    async fn find_open_pause(&self, time_record_id: Uuid) -> ClockResult<Option<PauseRecord>>;

    /// All pauses of a record, ordered by `timestamp_start` ascending.
    async fn list_pauses(&self, time_record_id: Uuid) -> ClockResult<Vec<PauseRecord>>;

    /// Records matching every bound of the filter, most recent
    /// `timestamp_in` first.
    async fn list_time_records(&self, filter: &TimeRecordFilter) -> ClockResult<Vec<TimeRecord>>;
}
