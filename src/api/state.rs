//! Application state for the attendance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::FixedOffset;

use crate::service::{Clock, SystemClock, TimeClockService};
use crate::store::InMemoryTimeRecordStore;

/// The concrete service the HTTP layer runs on.
pub type SharedTimeClock = TimeClockService<InMemoryTimeRecordStore, Arc<dyn Clock>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    service: Arc<SharedTimeClock>,
}

impl AppState {
    /// Wraps an already-built service.
    pub fn new(service: SharedTimeClock) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// An empty in-memory service on the given clock and business offset.
    pub fn in_memory(clock: Arc<dyn Clock>, utc_offset: FixedOffset) -> Self {
        Self::new(
            TimeClockService::with_clock(InMemoryTimeRecordStore::new(), clock)
                .with_utc_offset(utc_offset),
        )
    }

    /// An empty in-memory service on the wall clock.
    pub fn with_system_clock(utc_offset: FixedOffset) -> Self {
        Self::in_memory(Arc::new(SystemClock), utc_offset)
    }

    /// Returns the time clock service.
    pub fn service(&self) -> &SharedTimeClock {
        &self.service
    }
}
