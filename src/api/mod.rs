//! HTTP API module for the attendance engine.
//!
//! This module exposes the time clock over JSON endpoints: clock-in,
//! clock-out, pauses, open state and record listings.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DateRangeQuery, ListTimeRecordsQuery, NotesRequest, StartPauseRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::{AppState, SharedTimeClock};
