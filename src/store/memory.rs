//! In-memory [`TimeRecordStore`].
//!
//! Data lives only as long as the process. Both collections sit behind one
//! `RwLock`, so every individual call sees a consistent snapshot.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{ClockError, ClockResult};
use crate::models::{PauseRecord, TimeRecord, TimeRecordFilter};

use super::TimeRecordStore;

#[derive(Debug, Default)]
struct Collections {
    time_records: Vec<TimeRecord>,
    pause_records: Vec<PauseRecord>,
}

/// Vec-backed store for tests, demos and the default server.
#[derive(Debug, Default)]
pub struct InMemoryTimeRecordStore {
    inner: RwLock<Collections>,
}

impl InMemoryTimeRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with existing records, e.g. seed data.
    pub fn with_records(time_records: Vec<TimeRecord>, pause_records: Vec<PauseRecord>) -> Self {
        Self {
            inner: RwLock::new(Collections {
                time_records,
                pause_records,
            }),
        }
    }

    fn read(&self) -> ClockResult<RwLockReadGuard<'_, Collections>> {
        self.inner.read().map_err(|_| ClockError::Storage {
            message: "in-memory store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> ClockResult<RwLockWriteGuard<'_, Collections>> {
        self.inner.write().map_err(|_| ClockError::Storage {
            message: "in-memory store lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl TimeRecordStore for InMemoryTimeRecordStore {
    async fn insert_time_record(&self, record: TimeRecord) -> ClockResult<()> {
        self.write()?.time_records.push(record);
        Ok(())
    }

    async fn insert_pause_record(&self, pause: PauseRecord) -> ClockResult<()> {
        self.write()?.pause_records.push(pause);
        Ok(())
    }

    async fn update_time_record(&self, record: TimeRecord) -> ClockResult<()> {
        let mut guard = self.write()?;
        let slot = guard
            .time_records
            .iter_mut()
            .find(|tr| tr.id == record.id)
            .ok_or_else(|| ClockError::Storage {
                message: format!("cannot update unknown time record {}", record.id),
            })?;
        *slot = record;
        Ok(())
    }

    async fn update_pause_record(&self, pause: PauseRecord) -> ClockResult<()> {
        let mut guard = self.write()?;
        let slot = guard
            .pause_records
            .iter_mut()
            .find(|pr| pr.id == pause.id)
            .ok_or_else(|| ClockError::Storage {
                message: format!("cannot update unknown pause record {}", pause.id),
            })?;
        *slot = pause;
        Ok(())
    }

    async fn get_time_record(&self, id: Uuid) -> ClockResult<Option<TimeRecord>> {
        Ok(self.read()?.time_records.iter().find(|tr| tr.id == id).cloned())
    }

    async fn get_pause_record(&self, id: Uuid) -> ClockResult<Option<PauseRecord>> {
        Ok(self.read()?.pause_records.iter().find(|pr| pr.id == id).cloned())
    }

    async fn find_open_time_record(&self, employee_id: &str) -> ClockResult<Option<TimeRecord>> {
        Ok(self
            .read()?
            .time_records
            .iter()
            .find(|tr| tr.employee_id == employee_id && tr.is_open())
            .cloned())
    }

    async fn find_open_pause(&self, time_record_id: Uuid) -> ClockResult<Option<PauseRecord>> {
        Ok(self
            .read()?
            .pause_records
            .iter()
            .find(|pr| pr.time_record_id == time_record_id && pr.is_open())
            .cloned())
    }

    async fn list_pauses(&self, time_record_id: Uuid) -> ClockResult<Vec<PauseRecord>> {
        let mut pauses: Vec<PauseRecord> = self
            .read()?
            .pause_records
            .iter()
            .filter(|pr| pr.time_record_id == time_record_id)
            .cloned()
            .collect();
        pauses.sort_by_key(|pr| pr.timestamp_start);
        Ok(pauses)
    }

    async fn list_time_records(&self, filter: &TimeRecordFilter) -> ClockResult<Vec<TimeRecord>> {
        let mut records: Vec<TimeRecord> = self
            .read()?
            .time_records
            .iter()
            .filter(|tr| filter.matches(tr))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp_in.cmp(&a.timestamp_in));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PauseType;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, minute, 0).unwrap()
    }

    fn record(employee_id: &str, timestamp_in: DateTime<Utc>, open: bool) -> TimeRecord {
        TimeRecord {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            timestamp_in,
            timestamp_out: if open {
                None
            } else {
                Some(timestamp_in + chrono::Duration::hours(8))
            },
            date: timestamp_in.date_naive(),
            notes: None,
        }
    }

    fn pause(time_record_id: Uuid, start: DateTime<Utc>, open: bool) -> PauseRecord {
        PauseRecord {
            id: Uuid::new_v4(),
            time_record_id,
            pause_type: PauseType::Break,
            timestamp_start: start,
            timestamp_end: if open {
                None
            } else {
                Some(start + chrono::Duration::minutes(15))
            },
            notes_start: None,
            notes_end: None,
        }
    }

    #[tokio::test]
    async fn test_find_open_time_record_ignores_closed_and_other_employees() {
        let closed = record("emp3", at(14, 9, 0), false);
        let other = record("emp2", at(15, 9, 0), true);
        let open = record("emp3", at(15, 9, 0), true);
        let store = InMemoryTimeRecordStore::with_records(
            vec![closed, other, open.clone()],
            vec![],
        );

        let found = store.find_open_time_record("emp3").await.unwrap();
        assert_eq!(found, Some(open));
        assert!(store.find_open_time_record("emp9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pauses_orders_by_start_ascending() {
        let tr = record("emp3", at(15, 9, 0), true);
        let late = pause(tr.id, at(15, 15, 0), false);
        let early = pause(tr.id, at(15, 10, 0), false);
        let foreign = pause(Uuid::new_v4(), at(15, 11, 0), false);
        let store = InMemoryTimeRecordStore::with_records(
            vec![tr.clone()],
            vec![late.clone(), foreign, early.clone()],
        );

        let pauses = store.list_pauses(tr.id).await.unwrap();
        assert_eq!(pauses, vec![early, late]);
    }

    #[tokio::test]
    async fn test_find_open_pause() {
        let tr = record("emp3", at(15, 9, 0), true);
        let closed = pause(tr.id, at(15, 10, 0), false);
        let open = pause(tr.id, at(15, 12, 0), true);
        let store =
            InMemoryTimeRecordStore::with_records(vec![tr.clone()], vec![closed, open.clone()]);

        assert_eq!(store.find_open_pause(tr.id).await.unwrap(), Some(open));
    }

    #[tokio::test]
    async fn test_list_time_records_filters_and_orders_descending() {
        let d13 = record("emp3", at(13, 9, 0), false);
        let d14 = record("emp3", at(14, 9, 0), false);
        let d15 = record("emp3", at(15, 9, 0), true);
        let other = record("emp2", at(14, 9, 0), false);
        let store = InMemoryTimeRecordStore::with_records(
            vec![d14.clone(), d13.clone(), other, d15.clone()],
            vec![],
        );

        let filter = TimeRecordFilter {
            employee_id: Some("emp3".to_string()),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 14),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 15),
        };
        let records = store.list_time_records(&filter).await.unwrap();
        assert_eq!(records, vec![d15, d14]);

        let all = store
            .list_time_records(&TimeRecordFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all.last(), Some(&d13));
    }

    #[tokio::test]
    async fn test_update_replaces_existing_record() {
        let mut tr = record("emp3", at(15, 9, 0), true);
        let store = InMemoryTimeRecordStore::new();
        store.insert_time_record(tr.clone()).await.unwrap();

        tr.timestamp_out = Some(at(15, 18, 0));
        store.update_time_record(tr.clone()).await.unwrap();

        assert_eq!(store.get_time_record(tr.id).await.unwrap(), Some(tr));
    }

    #[tokio::test]
    async fn test_update_unknown_record_is_storage_error() {
        let store = InMemoryTimeRecordStore::new();
        let result = store
            .update_pause_record(pause(Uuid::new_v4(), at(15, 10, 0), true))
            .await;

        assert!(matches!(result, Err(ClockError::Storage { .. })));
    }
}
