//! Configuration loader with layered approach.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use veritas_core::KeyPolicy;
use veritas_telemetry::LogFormat;

use crate::{ConfigFileError, VeritasConfig};

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Default values
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables (`PREFIX__SECTION__KEY`)
///
/// # Example
///
/// ```no_run
/// use veritas_config::ConfigLoader;
///
/// # fn main() -> Result<(), veritas_config::ConfigFileError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("veritas.toml")?
///     .with_env_prefix("VERITAS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: VeritasConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: VeritasConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = VeritasConfig::default();
        self
    }

    /// Start with the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use veritas_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = VeritasConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = VeritasConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension (`.toml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigFileError` if the file is missing, unreadable, not
    /// parsable, or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigFileError::file_not_found(path));
        }

        let content =
            fs::read_to_string(path).map_err(|e| ConfigFileError::read_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigFileError::UnsupportedFormat(path.display().to_string()))?;

        self.with_string(&content, &extension)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigFileError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigFileError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigFileError` if parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use veritas_config::ConfigLoader;
    /// use veritas_core::KeyPolicy;
    ///
    /// let toml = r#"
    ///     [engine]
    ///     key_policy = "atom"
    ///     max_depth = 8
    /// "#;
    ///
    /// let config = ConfigLoader::new().with_string(toml, "toml").unwrap().load().unwrap();
    /// assert_eq!(config.engine.key_policy, KeyPolicy::Atom);
    /// assert_eq!(config.engine.max_depth, 8);
    /// assert!(config.engine.collapse_single_error);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigFileError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => return Err(ConfigFileError::UnsupportedFormat(other.to_string())),
        };
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// With prefix `VERITAS`:
    /// - `VERITAS__ENGINE__MAX_DEPTH=16`
    /// - `VERITAS__LOGGING__FORMAT=pretty`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if present.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Apply environment overrides, validate, and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigFileError` if an override cannot be parsed or the
    /// final configuration is invalid.
    pub fn load(mut self) -> Result<VeritasConfig, ConfigFileError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: HashMap<String, String> = env::vars().collect();
            self.apply_env_overrides(&prefix, &vars)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Return the configuration without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> VeritasConfig {
        self.config
    }

    fn apply_env_overrides(
        &mut self,
        prefix: &str,
        vars: &HashMap<String, String>,
    ) -> Result<(), ConfigFileError> {
        let marker = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(rest) = key.strip_prefix(&marker) {
                self.apply_env_var(key, rest, value)?;
            }
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, path: &str, value: &str) -> Result<(), ConfigFileError> {
        let parts: Vec<&str> = path.split("__").collect();

        match parts.as_slice() {
            ["ENGINE", "KEY_POLICY"] => {
                self.config.engine.key_policy = match value.to_lowercase().as_str() {
                    "string" => KeyPolicy::String,
                    "atom" => KeyPolicy::Atom,
                    _ => {
                        return Err(ConfigFileError::env_parse_error(
                            key,
                            "expected 'string' or 'atom'",
                        ))
                    }
                };
            }
            ["ENGINE", "COLLAPSE_SINGLE_ERROR"] => {
                self.config.engine.collapse_single_error = parse_bool(value)
                    .ok_or_else(|| ConfigFileError::env_parse_error(key, "expected boolean"))?;
            }
            ["ENGINE", "MAX_DEPTH"] => {
                self.config.engine.max_depth = value
                    .parse()
                    .map_err(|_| ConfigFileError::env_parse_error(key, "expected integer"))?;
            }
            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigFileError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigFileError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigFileError::env_parse_error(key, "expected boolean"))?;
            }
            // Unknown keys are ignored.
            _ => {}
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_loader_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, VeritasConfig::default());
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"engine": {"collapse_single_error": false}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert!(!config.engine.collapse_single_error);
        assert_eq!(config.engine.max_depth, 32);
    }

    #[test]
    fn test_loader_rejects_unknown_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(matches!(result, Err(ConfigFileError::UnsupportedFormat(ref f)) if f == "yaml"));
    }

    #[test]
    fn test_loader_with_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nformat = \"pretty\"\nlevel = \"warn\"").unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.engine, crate::EngineSection::default());
    }

    #[test]
    fn test_loader_file_with_unknown_field() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"engine": {{"depth": 3}}}}"#).unwrap();

        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigFileError::JsonError(_))));
    }

    #[test]
    fn test_loader_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/veritas.toml");
        assert!(matches!(result, Err(ConfigFileError::FileNotFound { .. })));

        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/veritas.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, VeritasConfig::default());
    }

    #[test]
    fn test_load_validates() {
        let result = ConfigLoader::new()
            .with_string("[engine]\nmax_depth = 0\n", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigFileError::InvalidValue { .. })));

        let config = ConfigLoader::new()
            .with_string("[engine]\nmax_depth = 0\n", "toml")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.engine.max_depth, 0);
    }

    #[test]
    fn test_env_overrides() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_overrides(
                "TEST",
                &vars(&[
                    ("TEST__ENGINE__KEY_POLICY", "atom"),
                    ("TEST__ENGINE__MAX_DEPTH", "4"),
                    ("TEST__ENGINE__COLLAPSE_SINGLE_ERROR", "off"),
                    ("TEST__LOGGING__FORMAT", "Pretty"),
                    ("TEST__LOGGING__INCLUDE_LOCATION", "yes"),
                    ("TEST__UNKNOWN__KEY", "ignored"),
                    ("OTHER__ENGINE__MAX_DEPTH", "99"),
                ]),
            )
            .unwrap();

        assert_eq!(loader.config.engine.key_policy, KeyPolicy::Atom);
        assert_eq!(loader.config.engine.max_depth, 4);
        assert!(!loader.config.engine.collapse_single_error);
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
        assert!(loader.config.logging.include_location);
    }

    #[test]
    fn test_env_override_parse_errors() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_overrides("TEST", &vars(&[("TEST__ENGINE__MAX_DEPTH", "deep")]));
        assert!(matches!(result, Err(ConfigFileError::EnvParseError { ref var, .. }) if var == "TEST__ENGINE__MAX_DEPTH"));

        let result = loader.apply_env_overrides("TEST", &vars(&[("TEST__ENGINE__KEY_POLICY", "symbol")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
