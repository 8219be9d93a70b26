//! Configuration types.

use serde::{Deserialize, Serialize};
use veritas_core::KeyPolicy;
use veritas_telemetry::logging::create_env_filter;
use veritas_telemetry::{LogConfig, LogFormat};

use crate::ConfigFileError;

/// Complete Veritas configuration.
///
/// # Example
///
/// ```
/// use veritas_config::VeritasConfig;
///
/// let config = VeritasConfig::default();
/// assert_eq!(config.engine.max_depth, 32);
/// assert!(config.engine.collapse_single_error);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct VeritasConfig {
    /// Validation engine settings.
    #[serde(default)]
    pub engine: EngineSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl VeritasConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigFileError::InvalidValue` if:
    /// - `engine.max_depth` is 0
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        if self.engine.max_depth == 0 {
            return Err(ConfigFileError::invalid_value(
                "engine.max_depth",
                "must be at least 1",
            ));
        }

        if let Err(e) = create_env_filter(&self.logging.level) {
            return Err(ConfigFileError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty debug logs with source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            engine: EngineSection::default(),
            logging: LoggingSection {
                enabled: true,
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
            },
        }
    }

    /// Create a production configuration preset.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Validation engine settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct EngineSection {
    /// Parameter name policy for schemas built through the facade.
    pub key_policy: KeyPolicy,

    /// Render a single error as a bare record.
    pub collapse_single_error: bool,

    /// Deepest allowed nested schema invocation.
    pub max_depth: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            key_policy: KeyPolicy::String,
            collapse_single_error: true,
            max_depth: 32,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingSection {
    /// Whether to install a log subscriber.
    pub enabled: bool,

    /// Filter directive.
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to include file/line info.
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            include_location: false,
        }
    }
}

impl LoggingSection {
    /// Converts into the telemetry crate's logging configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            file_line_info: self.include_location,
            ..LogConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(VeritasConfig::default().validate().is_ok());
        assert!(VeritasConfig::development().validate().is_ok());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut config = VeritasConfig::default();
        config.engine.max_depth = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigFileError::InvalidValue { ref field, .. }) if field == "engine.max_depth"
        ));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut config = VeritasConfig::default();
        config.logging.level = "veritas=loud".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigFileError::InvalidValue { ref field, .. }) if field == "logging.level"
        ));
    }

    #[test]
    fn test_to_log_config() {
        let log = VeritasConfig::development().logging.to_log_config();
        assert_eq!(log.format, LogFormat::Pretty);
        assert!(log.file_line_info);
        assert_eq!(log.level, "debug");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = VeritasConfig::development();
        let text = toml::to_string(&config).unwrap();
        let parsed: VeritasConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<VeritasConfig, _> = toml::from_str("[engine]\nmax_dept = 3\n");
        assert!(result.is_err());
    }
}
