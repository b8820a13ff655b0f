//! The attendance state machine.
//!
//! Per employee: `CLOCKED_OUT` -> clock-in -> `CLOCKED_IN` -> clock-out ->
//! `CLOCKED_OUT`. While clocked in: `WORKING` -> start-pause -> `ON_PAUSE`
//! -> end-pause -> `WORKING`.
//!
//! Every mutating operation holds `write_lock` for its whole
//! check-then-write sequence, so two concurrent requests can never both pass
//! a precondition before either has written.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    DailySummary, EffectiveDuration, compute_effective_duration, format_hours_minutes,
    pause_duration, summarize_by_date,
};
use crate::error::{ClockError, ClockResult};
use crate::models::{OpenState, PauseRecord, PauseType, TimeRecord, TimeRecordFilter};
use crate::store::TimeRecordStore;

use super::clock::{Clock, SystemClock};

/// A pause with its length, as shown next to its notes in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseDetails {
    /// The pause itself.
    #[serde(flatten)]
    pub pause: PauseRecord,
    /// Length in whole minutes; `None` while the pause is open.
    pub duration_minutes: Option<i64>,
    /// Length formatted for display; `None` while the pause is open.
    pub duration_display: Option<String>,
}

impl From<PauseRecord> for PauseDetails {
    fn from(pause: PauseRecord) -> Self {
        let duration = pause_duration(&pause);
        Self {
            duration_minutes: duration.map(|d| d.num_minutes()),
            duration_display: duration.map(format_hours_minutes),
            pause,
        }
    }
}

/// A time record together with its pauses and computed worked time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRecordDetails {
    /// The record itself.
    pub record: TimeRecord,
    /// Its pauses with their lengths, oldest first.
    pub pauses: Vec<PauseDetails>,
    /// Effective minutes; `None` while the record is open.
    pub effective_minutes: Option<i64>,
    /// Effective decimal hours; `None` while the record is open.
    pub effective_hours: Option<Decimal>,
    /// Effective time formatted for display; `None` while the record is open.
    pub effective_display: Option<String>,
}

impl TimeRecordDetails {
    /// Builds the details view from a record and its pauses.
    pub fn new(record: TimeRecord, pauses: Vec<PauseRecord>) -> Self {
        let effective = compute_effective_duration(&record, &pauses);
        Self {
            effective_minutes: effective.minutes(),
            effective_hours: effective.hours(),
            effective_display: effective.duration().map(format_hours_minutes),
            record,
            pauses: pauses.into_iter().map(PauseDetails::from).collect(),
        }
    }
}

/// Time clock operations over a [`TimeRecordStore`].
///
/// The service takes ownership of its store, which makes it the only
/// component able to mutate attendance data.
///
/// # Example
///
/// ```
/// use attendance_engine::models::PauseType;
/// use attendance_engine::service::TimeClockService;
/// use attendance_engine::store::InMemoryTimeRecordStore;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let service = TimeClockService::new(InMemoryTimeRecordStore::new());
///
///     let record = service.clock_in("emp3", Some("morning shift")).await.unwrap();
///     let pause = service.start_pause(record.id, PauseType::Break, None).await.unwrap();
///     service.end_pause(pause.id, None).await.unwrap();
///     let closed = service.clock_out(record.id, None).await.unwrap().unwrap();
///
///     assert!(!closed.is_open());
/// });
/// ```
pub struct TimeClockService<S, C = SystemClock> {
    store: S,
    clock: C,
    utc_offset: FixedOffset,
    write_lock: Mutex<()>,
}

impl<S: TimeRecordStore> TimeClockService<S, SystemClock> {
    /// Creates a service on the wall clock with business dates in UTC.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: TimeRecordStore, C: Clock> TimeClockService<S, C> {
    /// Creates a service with an explicit time source.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            utc_offset: Utc.fix(),
            write_lock: Mutex::new(()),
        }
    }

    /// Sets the offset used to derive a record's business `date`.
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    /// The business day an instant falls on.
    pub fn business_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// Opens a new time record for the employee.
    ///
    /// Fails with `AlreadyClockedIn` if the employee already has an open
    /// record.
    pub async fn clock_in(&self, employee_id: &str, notes: Option<&str>) -> ClockResult<TimeRecord> {
        let _guard = self.write_lock.lock().await;

        if let Some(open) = self.store.find_open_time_record(employee_id).await? {
            warn!(
                employee_id = %employee_id,
                time_record_id = %open.id,
                "Clock-in rejected: record already open"
            );
            return Err(ClockError::AlreadyClockedIn {
                employee_id: employee_id.to_string(),
                time_record_id: open.id,
            });
        }

        let now = self.clock.now();
        let record = TimeRecord {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            timestamp_in: now,
            timestamp_out: None,
            date: self.business_date(now),
            notes: clean_note(notes),
        };
        self.store.insert_time_record(record.clone()).await?;

        info!(
            employee_id = %employee_id,
            time_record_id = %record.id,
            date = %record.date,
            "Clocked in"
        );
        Ok(record)
    }

    /// Closes a time record.
    ///
    /// Returns `Ok(None)` if the record does not exist. Fails with
    /// `OpenPauseExists` while one of its pauses is running, and with
    /// `InvalidOrClosedRecord` if it was already clocked out. Notes are
    /// appended to the existing ones, never replacing them.
    pub async fn clock_out(
        &self,
        time_record_id: Uuid,
        notes: Option<&str>,
    ) -> ClockResult<Option<TimeRecord>> {
        let _guard = self.write_lock.lock().await;

        let Some(mut record) = self.store.get_time_record(time_record_id).await? else {
            warn!(time_record_id = %time_record_id, "Clock-out for unknown record");
            return Ok(None);
        };

        if let Some(pause) = self.store.find_open_pause(time_record_id).await? {
            warn!(
                time_record_id = %time_record_id,
                pause_record_id = %pause.id,
                "Clock-out rejected: pause still open"
            );
            return Err(ClockError::OpenPauseExists {
                time_record_id,
                pause_record_id: pause.id,
            });
        }

        if !record.is_open() {
            warn!(time_record_id = %time_record_id, "Clock-out rejected: record already closed");
            return Err(ClockError::InvalidOrClosedRecord { time_record_id });
        }

        record.timestamp_out = Some(self.clock.now());
        if let Some(note) = clean_note(notes) {
            record.append_clock_out_note(&note);
        }
        self.store.update_time_record(record.clone()).await?;

        info!(
            employee_id = %record.employee_id,
            time_record_id = %record.id,
            "Clocked out"
        );
        Ok(Some(record))
    }

    /// Opens a pause inside an open time record.
    ///
    /// Fails with `InvalidOrClosedRecord` if the record is missing or
    /// closed, and with `PauseAlreadyOpen` if a pause is already running.
    pub async fn start_pause(
        &self,
        time_record_id: Uuid,
        pause_type: PauseType,
        notes_start: Option<&str>,
    ) -> ClockResult<PauseRecord> {
        let _guard = self.write_lock.lock().await;

        let record = self.store.get_time_record(time_record_id).await?;
        if !record.as_ref().is_some_and(TimeRecord::is_open) {
            warn!(
                time_record_id = %time_record_id,
                "Pause rejected: record missing or closed"
            );
            return Err(ClockError::InvalidOrClosedRecord { time_record_id });
        }

        if let Some(open) = self.store.find_open_pause(time_record_id).await? {
            warn!(
                time_record_id = %time_record_id,
                pause_record_id = %open.id,
                "Pause rejected: another pause is open"
            );
            return Err(ClockError::PauseAlreadyOpen {
                time_record_id,
                pause_record_id: open.id,
            });
        }

        let pause = PauseRecord {
            id: Uuid::new_v4(),
            time_record_id,
            pause_type,
            timestamp_start: self.clock.now(),
            timestamp_end: None,
            notes_start: clean_note(notes_start),
            notes_end: None,
        };
        self.store.insert_pause_record(pause.clone()).await?;

        info!(
            time_record_id = %time_record_id,
            pause_record_id = %pause.id,
            pause_type = %pause.pause_type,
            "Pause started"
        );
        Ok(pause)
    }

    /// Ends a running pause.
    ///
    /// Returns `Ok(None)` if the pause is unknown or already ended.
    pub async fn end_pause(
        &self,
        pause_record_id: Uuid,
        notes_end: Option<&str>,
    ) -> ClockResult<Option<PauseRecord>> {
        let _guard = self.write_lock.lock().await;

        let pause = self.store.get_pause_record(pause_record_id).await?;
        let Some(mut pause) = pause.filter(PauseRecord::is_open) else {
            warn!(pause_record_id = %pause_record_id, "End-pause for unknown or closed pause");
            return Ok(None);
        };

        pause.timestamp_end = Some(self.clock.now());
        if let Some(note) = clean_note(notes_end) {
            pause.notes_end = Some(note);
        }
        self.store.update_pause_record(pause.clone()).await?;

        info!(
            time_record_id = %pause.time_record_id,
            pause_record_id = %pause.id,
            "Pause ended"
        );
        Ok(Some(pause))
    }

    /// The employee's open record and, if paused, its open pause.
    pub async fn open_state(&self, employee_id: &str) -> ClockResult<OpenState> {
        let Some(record) = self.store.find_open_time_record(employee_id).await? else {
            return Ok(OpenState::default());
        };
        let pause = self.store.find_open_pause(record.id).await?;
        Ok(OpenState {
            record: Some(record),
            pause,
        })
    }

    /// Records matching the filter, most recent first.
    pub async fn list_time_records(&self, filter: &TimeRecordFilter) -> ClockResult<Vec<TimeRecord>> {
        self.store.list_time_records(filter).await
    }

    /// Pauses of a record, oldest first.
    pub async fn list_pauses(&self, time_record_id: Uuid) -> ClockResult<Vec<PauseRecord>> {
        self.store.list_pauses(time_record_id).await
    }

    /// Pauses of a record with their lengths, oldest first.
    pub async fn list_pause_details(&self, time_record_id: Uuid) -> ClockResult<Vec<PauseDetails>> {
        let pauses = self.store.list_pauses(time_record_id).await?;
        Ok(pauses.into_iter().map(PauseDetails::from).collect())
    }

    /// A record with its pauses and effective duration, if it exists.
    pub async fn time_record_details(
        &self,
        time_record_id: Uuid,
    ) -> ClockResult<Option<TimeRecordDetails>> {
        let Some(record) = self.store.get_time_record(time_record_id).await? else {
            return Ok(None);
        };
        let pauses = self.store.list_pauses(record.id).await?;
        Ok(Some(TimeRecordDetails::new(record, pauses)))
    }

    /// Effective worked time of a stored record.
    pub async fn effective_duration(
        &self,
        time_record_id: Uuid,
    ) -> ClockResult<Option<EffectiveDuration>> {
        let Some(record) = self.store.get_time_record(time_record_id).await? else {
            return Ok(None);
        };
        let pauses = self.store.list_pauses(record.id).await?;
        Ok(Some(compute_effective_duration(&record, &pauses)))
    }

    /// Per-day worked totals for the records matching the filter.
    pub async fn daily_summary(&self, filter: &TimeRecordFilter) -> ClockResult<Vec<DailySummary>> {
        let records = self.store.list_time_records(filter).await?;
        let mut pauses = Vec::new();
        for record in &records {
            pauses.extend(self.store.list_pauses(record.id).await?);
        }
        Ok(summarize_by_date(&records, &pauses))
    }
}

/// Blank notes are treated as absent; anything else is stored verbatim.
fn clean_note(note: Option<&str>) -> Option<String> {
    note.filter(|n| !n.trim().is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ManualClock;
    use crate::store::InMemoryTimeRecordStore;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, hour, minute, 0).unwrap()
    }

    fn create_service() -> (
        TimeClockService<InMemoryTimeRecordStore, Arc<ManualClock>>,
        Arc<ManualClock>,
    ) {
        let clock = Arc::new(ManualClock::new(at(9, 0)));
        let service = TimeClockService::with_clock(InMemoryTimeRecordStore::new(), clock.clone());
        (service, clock)
    }

    #[tokio::test]
    async fn test_clock_in_opens_record() {
        let (service, _) = create_service();

        let record = service.clock_in("emp3", Some("  ")).await.unwrap();

        assert!(record.is_open());
        assert_eq!(record.employee_id, "emp3");
        assert_eq!(record.timestamp_in, at(9, 0));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert!(record.notes.is_none());
    }

    #[tokio::test]
    async fn test_second_clock_in_is_rejected() {
        let (service, _) = create_service();
        let first = service.clock_in("emp3", None).await.unwrap();

        let result = service.clock_in("emp3", None).await;

        match result {
            Err(ClockError::AlreadyClockedIn {
                employee_id,
                time_record_id,
            }) => {
                assert_eq!(employee_id, "emp3");
                assert_eq!(time_record_id, first.id);
            }
            other => panic!("Expected AlreadyClockedIn, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clock_in_allowed_for_other_employee() {
        let (service, _) = create_service();
        service.clock_in("emp3", None).await.unwrap();
        assert!(service.clock_in("emp2", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_business_date_uses_offset() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 16, 1, 0, 0).unwrap()));
        let service = TimeClockService::with_clock(InMemoryTimeRecordStore::new(), clock)
            .with_utc_offset(FixedOffset::west_opt(3 * 3600).unwrap());

        let record = service.clock_in("emp3", None).await.unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }

    #[tokio::test]
    async fn test_clock_out_unknown_record_is_none() {
        let (service, _) = create_service();
        assert!(service.clock_out(Uuid::new_v4(), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clock_out_blocked_by_open_pause() {
        let (service, _) = create_service();
        let record = service.clock_in("emp3", None).await.unwrap();
        let pause = service
            .start_pause(record.id, PauseType::Break, None)
            .await
            .unwrap();

        let result = service.clock_out(record.id, None).await;

        assert!(matches!(
            result,
            Err(ClockError::OpenPauseExists { pause_record_id, .. }) if pause_record_id == pause.id
        ));
        let state = service.open_state("emp3").await.unwrap();
        assert_eq!(state.record.map(|r| r.id), Some(record.id));
    }

    #[tokio::test]
    async fn test_clock_out_twice_is_rejected() {
        let (service, clock) = create_service();
        let record = service.clock_in("emp3", None).await.unwrap();
        clock.advance(Duration::hours(8));
        service.clock_out(record.id, None).await.unwrap();

        let result = service.clock_out(record.id, None).await;
        assert!(matches!(result, Err(ClockError::InvalidOrClosedRecord { .. })));
    }

    #[tokio::test]
    async fn test_clock_out_appends_notes() {
        let (service, clock) = create_service();
        let record = service.clock_in("emp3", Some("A")).await.unwrap();
        clock.set(at(18, 0));

        let closed = service.clock_out(record.id, Some("B")).await.unwrap().unwrap();

        assert_eq!(closed.timestamp_out, Some(at(18, 0)));
        assert_eq!(closed.notes.as_deref(), Some("A (Saída: B)"));
    }

    #[tokio::test]
    async fn test_notes_are_stored_verbatim() {
        let (service, clock) = create_service();
        let record = service.clock_in("emp3", Some("  A ")).await.unwrap();
        assert_eq!(record.notes.as_deref(), Some("  A "));

        let pause = service
            .start_pause(record.id, PauseType::Break, Some(" coffee"))
            .await
            .unwrap();
        assert_eq!(pause.notes_start.as_deref(), Some(" coffee"));
        let ended = service.end_pause(pause.id, Some("   ")).await.unwrap().unwrap();
        assert!(ended.notes_end.is_none());

        clock.advance(Duration::hours(8));
        let closed = service.clock_out(record.id, Some("B ")).await.unwrap().unwrap();
        assert_eq!(closed.notes.as_deref(), Some("  A  (Saída: B )"));
    }

    #[tokio::test]
    async fn test_start_pause_on_closed_record_is_rejected() {
        let (service, _) = create_service();
        let record = service.clock_in("emp3", None).await.unwrap();
        service.clock_out(record.id, None).await.unwrap();

        let result = service.start_pause(record.id, PauseType::Reunion, None).await;
        assert!(matches!(result, Err(ClockError::InvalidOrClosedRecord { .. })));
    }

    #[tokio::test]
    async fn test_start_pause_on_unknown_record_is_rejected() {
        let (service, _) = create_service();
        let result = service
            .start_pause(Uuid::new_v4(), PauseType::Alignment, None)
            .await;
        assert!(matches!(result, Err(ClockError::InvalidOrClosedRecord { .. })));
    }

    #[tokio::test]
    async fn test_second_open_pause_is_rejected() {
        let (service, _) = create_service();
        let record = service.clock_in("emp3", None).await.unwrap();
        service
            .start_pause(record.id, PauseType::Break, Some("coffee"))
            .await
            .unwrap();

        let result = service.start_pause(record.id, PauseType::Reunion, None).await;
        assert!(matches!(result, Err(ClockError::PauseAlreadyOpen { .. })));
    }

    #[tokio::test]
    async fn test_end_pause_sets_end_and_notes() {
        let (service, clock) = create_service();
        let record = service.clock_in("emp3", None).await.unwrap();
        clock.set(at(10, 0));
        let pause = service
            .start_pause(record.id, PauseType::Break, Some("coffee"))
            .await
            .unwrap();
        clock.set(at(10, 15));

        let ended = service.end_pause(pause.id, Some("back")).await.unwrap().unwrap();

        assert_eq!(ended.timestamp_start, at(10, 0));
        assert_eq!(ended.timestamp_end, Some(at(10, 15)));
        assert_eq!(ended.notes_start.as_deref(), Some("coffee"));
        assert_eq!(ended.notes_end.as_deref(), Some("back"));
    }

    #[tokio::test]
    async fn test_end_pause_unknown_or_closed_is_none() {
        let (service, _) = create_service();
        assert!(service.end_pause(Uuid::new_v4(), None).await.unwrap().is_none());

        let record = service.clock_in("emp3", None).await.unwrap();
        let pause = service
            .start_pause(record.id, PauseType::Break, None)
            .await
            .unwrap();
        service.end_pause(pause.id, None).await.unwrap();
        assert!(service.end_pause(pause.id, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_state_reports_pause() {
        let (service, _) = create_service();
        assert_eq!(service.open_state("emp3").await.unwrap(), OpenState::default());

        let record = service.clock_in("emp3", None).await.unwrap();
        let pause = service
            .start_pause(record.id, PauseType::Alignment, None)
            .await
            .unwrap();

        let state = service.open_state("emp3").await.unwrap();
        assert!(state.is_clocked_in());
        assert!(state.is_on_pause());
        assert_eq!(state.pause, Some(pause));
    }

    #[tokio::test]
    async fn test_details_and_effective_duration() {
        let (service, clock) = create_service();
        let record = service.clock_in("emp3", None).await.unwrap();
        clock.set(at(10, 0));
        let pause = service
            .start_pause(record.id, PauseType::Break, None)
            .await
            .unwrap();
        clock.set(at(10, 15));
        service.end_pause(pause.id, None).await.unwrap();
        clock.set(at(18, 0));
        service.clock_out(record.id, None).await.unwrap();

        let details = service.time_record_details(record.id).await.unwrap().unwrap();
        assert_eq!(details.pauses.len(), 1);
        assert_eq!(details.pauses[0].pause.id, pause.id);
        assert_eq!(details.pauses[0].duration_minutes, Some(15));
        assert_eq!(details.pauses[0].duration_display.as_deref(), Some("15min"));
        assert_eq!(details.effective_minutes, Some(8 * 60 + 45));
        assert_eq!(details.effective_hours, Some(Decimal::new(875, 2)));
        assert_eq!(details.effective_display.as_deref(), Some("8h 45min"));

        let effective = service.effective_duration(record.id).await.unwrap();
        assert_eq!(
            effective,
            Some(EffectiveDuration::Closed(Duration::minutes(8 * 60 + 45)))
        );
    }

    #[tokio::test]
    async fn test_open_pause_has_no_duration_yet() {
        let (service, clock) = create_service();
        let record = service.clock_in("emp3", None).await.unwrap();
        let first = service
            .start_pause(record.id, PauseType::Reunion, None)
            .await
            .unwrap();
        clock.advance(Duration::hours(1));
        service.end_pause(first.id, None).await.unwrap();
        service
            .start_pause(record.id, PauseType::Break, None)
            .await
            .unwrap();

        let pauses = service.list_pause_details(record.id).await.unwrap();

        assert_eq!(pauses.len(), 2);
        assert_eq!(pauses[0].duration_minutes, Some(60));
        assert_eq!(pauses[0].duration_display.as_deref(), Some("1h"));
        assert!(pauses[1].pause.is_open());
        assert!(pauses[1].duration_minutes.is_none());
        assert!(pauses[1].duration_display.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_clock_ins_leave_one_open_record() {
        let (service, _) = create_service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.clock_in("emp3", None).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        let records = service
            .list_time_records(&TimeRecordFilter::for_employee("emp3"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }
}
