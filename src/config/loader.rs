//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file.

use chrono::FixedOffset;
use std::fs;
use std::path::Path;

use crate::error::{ClockError, ClockResult};

use super::types::{AppConfig, MAX_UTC_OFFSET_MINUTES};

/// Loads, validates and provides access to the service configuration.
///
/// # File format
///
/// ```yaml
/// server:
///   bind_address: "127.0.0.1:3000"
/// time_clock:
///   utc_offset_minutes: -180
/// ```
///
/// Every section and field is optional; missing values fall back to
/// [`AppConfig::default`].
///
/// # Example
///
/// ```
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::from_yaml_str("time_clock:\n  utc_offset_minutes: -180\n")?;
/// assert_eq!(loader.utc_offset().local_minus_utc(), -180 * 60);
/// assert_eq!(loader.config().server.bind_address, "127.0.0.1:3000");
/// # Ok::<(), attendance_engine::error::ClockError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    utc_offset: FixedOffset,
}

impl ConfigLoader {
    /// Loads configuration from the specified file.
    ///
    /// Returns `ConfigNotFound` if the file cannot be read,
    /// `ConfigParseError` if it is not valid YAML for [`AppConfig`], and
    /// `InvalidConfig` if a value is out of range.
    pub fn load<P: AsRef<Path>>(path: P) -> ClockResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ClockError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Loads configuration from the file if it exists, defaults otherwise.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> ClockResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Self::from_config(AppConfig::default())
        }
    }

    /// Parses configuration from an in-memory YAML document.
    pub fn from_yaml_str(content: &str) -> ClockResult<Self> {
        Self::parse(content, "<inline>")
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: AppConfig) -> ClockResult<Self> {
        let utc_offset = Self::validate(&config)?;
        Ok(Self { config, utc_offset })
    }

    fn parse(content: &str, path: &str) -> ClockResult<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).map_err(|e| ClockError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Self::from_config(config)
    }

    fn validate(config: &AppConfig) -> ClockResult<FixedOffset> {
        let minutes = config.time_clock.utc_offset_minutes;
        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
            return Err(ClockError::InvalidConfig {
                field: "time_clock.utc_offset_minutes".to_string(),
                message: format!(
                    "{} is outside the range -{}..={}",
                    minutes, MAX_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES
                ),
            });
        }

        if config.server.bind_address.trim().is_empty() {
            return Err(ClockError::InvalidConfig {
                field: "server.bind_address".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        config
            .time_clock
            .offset()
            .ok_or_else(|| ClockError::InvalidConfig {
                field: "time_clock.utc_offset_minutes".to_string(),
                message: format!("{} is not a valid UTC offset", minutes),
            })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the offset used to derive business dates.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/attendance.yaml"
    }

    #[test]
    fn test_load_bundled_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().server.bind_address, "127.0.0.1:3000");
        assert_eq!(loader.config().time_clock.utc_offset_minutes, -180);
        assert_eq!(loader.utc_offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let loader = ConfigLoader::from_yaml_str("{}").unwrap();
        assert_eq!(loader.config(), &AppConfig::default());
        assert_eq!(loader.utc_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/attendance.yaml");

        match result {
            Err(ClockError::ConfigNotFound { path }) => {
                assert!(path.contains("attendance.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_load_or_default_falls_back_when_missing() {
        let loader = ConfigLoader::load_or_default("/nonexistent/attendance.yaml").unwrap();
        assert_eq!(loader.config(), &AppConfig::default());
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("time_clock: [not, a, map");
        assert!(matches!(result, Err(ClockError::ConfigParseError { .. })));
    }

    #[test]
    fn test_wrong_type_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("time_clock:\n  utc_offset_minutes: soon\n");
        assert!(matches!(result, Err(ClockError::ConfigParseError { .. })));
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        let result = ConfigLoader::from_yaml_str("time_clock:\n  utc_offset_minutes: 900\n");

        match result {
            Err(ClockError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "time_clock.utc_offset_minutes");
            }
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[test]
    fn test_extreme_offsets_are_rejected() {
        for minutes in [i32::MIN, i32::MAX, -841] {
            let yaml = format!("time_clock:\n  utc_offset_minutes: {}\n", minutes);
            let result = ConfigLoader::from_yaml_str(&yaml);
            assert!(
                matches!(result, Err(ClockError::InvalidConfig { .. })),
                "{} should be rejected",
                minutes
            );
        }
    }

    #[test]
    fn test_offset_range_bounds_are_accepted() {
        let east = ConfigLoader::from_yaml_str("time_clock:\n  utc_offset_minutes: 840\n").unwrap();
        assert_eq!(east.utc_offset().local_minus_utc(), 840 * 60);

        let west = ConfigLoader::from_yaml_str("time_clock:\n  utc_offset_minutes: -840\n").unwrap();
        assert_eq!(west.utc_offset().local_minus_utc(), -840 * 60);
    }

    #[test]
    fn test_empty_bind_address_is_rejected() {
        let result = ConfigLoader::from_yaml_str("server:\n  bind_address: \"  \"\n");
        assert!(matches!(result, Err(ClockError::InvalidConfig { .. })));
    }
}
