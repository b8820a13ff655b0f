//! Effective duration of a time record.
//!
//! The effective duration is the span between clock-in and clock-out minus
//! the closed pauses taken inside it. It is clamped at zero so overlapping
//! or malformed pause data never yields a negative result.

use chrono::Duration;
use rust_decimal::Decimal;

use crate::models::{PauseRecord, TimeRecord};

/// Worked time of a record, or `Open` if it has not been clocked out yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveDuration {
    /// The record has no `timestamp_out`; there is no numeric duration.
    Open,
    /// Net worked time of a closed record. Never negative.
    Closed(Duration),
}

impl EffectiveDuration {
    /// The closed duration, if any.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            EffectiveDuration::Open => None,
            EffectiveDuration::Closed(duration) => Some(*duration),
        }
    }

    /// Whole worked minutes of a closed record.
    pub fn minutes(&self) -> Option<i64> {
        self.duration().map(|d| d.num_minutes())
    }

    /// Worked hours as a decimal, rounded to two places.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::calculation::EffectiveDuration;
    /// use chrono::Duration;
    /// use rust_decimal::Decimal;
    ///
    /// let worked = EffectiveDuration::Closed(Duration::minutes(525));
    /// assert_eq!(worked.hours(), Some(Decimal::new(875, 2))); // 8.75
    /// assert_eq!(EffectiveDuration::Open.hours(), None);
    /// ```
    pub fn hours(&self) -> Option<Decimal> {
        self.minutes()
            .map(|minutes| (Decimal::new(minutes, 0) / Decimal::new(60, 0)).round_dp(2))
    }
}

/// Computes the effective duration of a record given its pauses.
///
/// Only pauses with a `timestamp_end` are subtracted; an open pause
/// contributes nothing. The caller passes the pauses belonging to `record`.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::{EffectiveDuration, compute_effective_duration};
/// use attendance_engine::models::{PauseRecord, PauseType, TimeRecord};
/// use chrono::{Duration, TimeZone, Utc};
/// use uuid::Uuid;
///
/// let record = TimeRecord {
///     id: Uuid::new_v4(),
///     employee_id: "emp3".to_string(),
///     timestamp_in: Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
///     timestamp_out: Some(Utc.with_ymd_and_hms(2026, 1, 15, 18, 0, 0).unwrap()),
///     date: chrono::NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     notes: None,
/// };
/// let pause = PauseRecord {
///     id: Uuid::new_v4(),
///     time_record_id: record.id,
///     pause_type: PauseType::Break,
///     timestamp_start: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
///     timestamp_end: Some(Utc.with_ymd_and_hms(2026, 1, 15, 10, 15, 0).unwrap()),
///     notes_start: None,
///     notes_end: None,
/// };
///
/// let effective = compute_effective_duration(&record, &[pause]);
/// assert_eq!(effective, EffectiveDuration::Closed(Duration::minutes(8 * 60 + 45)));
/// ```
pub fn compute_effective_duration(record: &TimeRecord, pauses: &[PauseRecord]) -> EffectiveDuration {
    effective_duration_of(record, pauses.iter())
}

/// Same as [`compute_effective_duration`] over any iterator of pauses.
pub(crate) fn effective_duration_of<'a, I>(record: &TimeRecord, pauses: I) -> EffectiveDuration
where
    I: IntoIterator<Item = &'a PauseRecord>,
{
    let Some(timestamp_out) = record.timestamp_out else {
        return EffectiveDuration::Open;
    };

    let total = timestamp_out - record.timestamp_in;
    let paused = pauses
        .into_iter()
        .filter_map(|p| p.timestamp_end.map(|end| end - p.timestamp_start))
        .fold(Duration::zero(), |acc, d| acc + d);

    EffectiveDuration::Closed((total - paused).max(Duration::zero()))
}

/// Length of a single pause, `None` while it is still open.
pub fn pause_duration(pause: &PauseRecord) -> Option<Duration> {
    pause
        .timestamp_end
        .map(|end| (end - pause.timestamp_start).max(Duration::zero()))
}

/// Formats a duration as hours and minutes, e.g. `"8h 45min"`.
///
/// Zero (or negative) durations render as `"0 min"`.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::format_hours_minutes;
/// use chrono::Duration;
///
/// assert_eq!(format_hours_minutes(Duration::minutes(525)), "8h 45min");
/// assert_eq!(format_hours_minutes(Duration::minutes(120)), "2h");
/// assert_eq!(format_hours_minutes(Duration::minutes(15)), "15min");
/// assert_eq!(format_hours_minutes(Duration::zero()), "0 min");
/// ```
pub fn format_hours_minutes(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match (hours, minutes) {
        (0, 0) => "0 min".to_string(),
        (0, m) => format!("{}min", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}min", h, m),
    }
}
