//! Duration calculations for the attendance engine.
//!
//! This module contains the pure functions that turn time records and their
//! pauses into worked time: the effective duration of a single record,
//! per-pause durations, display formatting and per-day totals.

mod daily_summary;
mod effective_duration;

pub use daily_summary::{DailySummary, summarize_by_date};
pub use effective_duration::{
    EffectiveDuration, compute_effective_duration, format_hours_minutes, pause_duration,
};
