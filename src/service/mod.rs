//! Time clock service: the attendance state machine and its time source.

mod clock;
mod time_clock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use time_clock::{PauseDetails, TimeClockService, TimeRecordDetails};
