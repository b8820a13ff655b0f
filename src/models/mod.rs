//! Core data models for the attendance engine.
//!
//! This module contains the attendance entities shared by the store, the
//! service and the HTTP layer.

mod pause_record;
mod time_record;

pub use pause_record::{PauseRecord, PauseType};
pub use time_record::{CLOCK_OUT_NOTE_PREFIX, OpenState, TimeRecord, TimeRecordFilter};
