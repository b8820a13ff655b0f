//! Error types for the attendance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a time clock operation can report. "Not found" is not
//! an error here: lookups that can legitimately miss return `Ok(None)`.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::ClockError;
///
/// let error = ClockError::AlreadyClockedIn {
///     employee_id: "emp3".to_string(),
///     time_record_id: uuid::Uuid::nil(),
/// };
/// assert!(error.to_string().starts_with("Employee 'emp3' is already clocked in"));
/// ```
#[derive(Debug, Error)]
pub enum ClockError {
    /// The employee already has an open time record.
    #[error("Employee '{employee_id}' is already clocked in (time record {time_record_id})")]
    AlreadyClockedIn {
        /// The employee that tried to clock in.
        employee_id: String,
        /// The record that is still open.
        time_record_id: Uuid,
    },

    /// Clock-out was attempted while a pause is still running.
    #[error("Cannot clock out time record {time_record_id}: pause {pause_record_id} is still open")]
    OpenPauseExists {
        /// The record being closed.
        time_record_id: Uuid,
        /// The pause that must be ended first.
        pause_record_id: Uuid,
    },

    /// The time record does not exist or has already been closed.
    #[error("Time record {time_record_id} not found or already closed")]
    InvalidOrClosedRecord {
        /// The offending time record id.
        time_record_id: Uuid,
    },

    /// A pause is already running for this time record.
    #[error("Time record {time_record_id} already has an open pause ({pause_record_id})")]
    PauseAlreadyOpen {
        /// The time record the pause was requested for.
        time_record_id: Uuid,
        /// The pause that is already open.
        pause_record_id: Uuid,
    },

    /// The backing store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The field that was invalid.
        field: String,
        /// Why it was rejected.
        message: String,
    },
}

impl ClockError {
    /// Returns true for state-machine violations the caller can act on
    /// (as opposed to storage or configuration failures).
    pub fn is_state_violation(&self) -> bool {
        matches!(
            self,
            ClockError::AlreadyClockedIn { .. }
                | ClockError::OpenPauseExists { .. }
                | ClockError::InvalidOrClosedRecord { .. }
                | ClockError::PauseAlreadyOpen { .. }
        )
    }
}

/// A type alias for Results that return ClockError.
pub type ClockResult<T> = Result<T, ClockError>;
