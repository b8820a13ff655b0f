//! Configuration types for the attendance service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use chrono::FixedOffset;
use serde::Deserialize;

/// Largest accepted business-day offset from UTC, in minutes.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Time clock settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimeClockConfig {
    /// Offset from UTC used to derive a record's business `date`.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl TimeClockConfig {
    /// The configured offset, or `None` if it is out of range.
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }
}

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Time clock settings.
    #[serde(default)]
    pub time_clock: TimeClockConfig,
}
