//! Configuration loading for the attendance service.
//!
//! This module loads the server and time clock settings from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/attendance.yaml").unwrap();
//! println!("Listening on {}", loader.config().server.bind_address);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, MAX_UTC_OFFSET_MINUTES, ServerConfig, TimeClockConfig};
