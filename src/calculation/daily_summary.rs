//! Per-day aggregation of effective worked time.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PauseRecord, TimeRecord};

use super::effective_duration::{EffectiveDuration, effective_duration_of, format_hours_minutes};

/// Worked-time totals for one business day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// The business day.
    pub date: NaiveDate,
    /// Number of records on that day, open or closed.
    pub record_count: usize,
    /// Number of records still open; they contribute no time.
    pub open_record_count: usize,
    /// Sum of the effective durations of closed records, in minutes.
    pub effective_minutes: i64,
    /// The same total in decimal hours.
    pub effective_hours: Decimal,
    /// The same total formatted for display.
    pub effective_display: String,
}

/// Groups records by `date` and totals their effective durations.
///
/// `pauses` may contain pauses of any record; each is matched to its
/// owner by `time_record_id`. Days are returned most recent first.
pub fn summarize_by_date(records: &[TimeRecord], pauses: &[PauseRecord]) -> Vec<DailySummary> {
    let mut pauses_by_record: HashMap<Uuid, Vec<&PauseRecord>> = HashMap::new();
    for pause in pauses {
        pauses_by_record
            .entry(pause.time_record_id)
            .or_default()
            .push(pause);
    }

    // (records, open records, worked time)
    let mut days: BTreeMap<NaiveDate, (usize, usize, Duration)> = BTreeMap::new();
    for record in records {
        let own_pauses = pauses_by_record
            .get(&record.id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let entry = days
            .entry(record.date)
            .or_insert((0, 0, Duration::zero()));
        entry.0 += 1;
        match effective_duration_of(record, own_pauses.iter().copied()) {
            EffectiveDuration::Open => entry.1 += 1,
            EffectiveDuration::Closed(worked) => entry.2 = entry.2 + worked,
        }
    }

    days.into_iter()
        .rev()
        .map(|(date, (record_count, open_record_count, worked))| {
            let effective_minutes = worked.num_minutes();
            DailySummary {
                date,
                record_count,
                open_record_count,
                effective_minutes,
                effective_hours: (Decimal::new(effective_minutes, 0) / Decimal::new(60, 0))
                    .round_dp(2),
                effective_display: format_hours_minutes(worked),
            }
        })
        .collect()
}
