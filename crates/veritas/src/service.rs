//! The configured validation service.

use std::path::Path;

use thiserror::Error;
use tracing::info;
use veritas_config::{ConfigFileError, ConfigLoader, VeritasConfig};
use veritas_core::{ConfigError, ErrorPayload, Input, Params, RawMap};
use veritas_engine::{Engine, EngineConfig, Outcome};
use veritas_schema::{Schema, SchemaBuilder};
use veritas_telemetry::TelemetryError;

/// Errors raised while setting up Veritas.
#[derive(Debug, Error)]
pub enum VeritasError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigFileError),

    /// Telemetry could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// A schema is misconfigured.
    #[error(transparent)]
    Schema(#[from] ConfigError),
}

/// Result type for facade operations.
pub type VeritasResult<T> = Result<T, VeritasError>;

/// A configured engine plus the defaults applied to new schemas.
///
/// # Example
///
/// ```
/// use veritas::prelude::*;
///
/// let veritas = Veritas::new(VeritasConfig::default());
/// let schema = veritas
///     .schema("search")
///     .param(ParamDef::builder("page", TypeRef::integer()).default(1))
///     .build()
///     .unwrap();
///
/// let params = veritas.bind(&schema, &Input::new(), |_| ()).unwrap();
/// assert_eq!(params["page"], Value::Integer(1));
/// ```
#[derive(Debug, Clone)]
pub struct Veritas {
    config: VeritasConfig,
    engine: Engine,
}

impl Veritas {
    /// Creates a service from configuration without touching global state.
    #[must_use]
    pub fn new(config: VeritasConfig) -> Self {
        let engine = Engine::new(EngineConfig {
            max_depth: config.engine.max_depth,
            collapse_single_error: config.engine.collapse_single_error,
        });
        Self { config, engine }
    }

    /// Validates the configuration, installs logging and describes metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a global log
    /// subscriber is already installed.
    pub fn init(config: VeritasConfig) -> VeritasResult<Self> {
        config.validate()?;
        veritas_telemetry::init_telemetry(&config.logging.to_log_config())?;

        info!(
            key_policy = %config.engine.key_policy,
            max_depth = config.engine.max_depth,
            collapse_single_error = config.engine.collapse_single_error,
            "veritas initialized"
        );
        Ok(Self::new(config))
    }

    /// Loads configuration from an optional file and `VERITAS__*` variables,
    /// then initializes.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or initialization fails.
    pub fn from_env(file: Option<&Path>) -> VeritasResult<Self> {
        let loader = match file {
            Some(path) => ConfigLoader::new().with_file(path)?,
            None => ConfigLoader::new(),
        };
        let config = loader.with_dotenv().with_env_prefix("VERITAS").load()?;
        Self::init(config)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &VeritasConfig {
        &self.config
    }

    /// Returns the engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Starts a schema using the configured key policy.
    pub fn schema(&self, name: impl Into<String>) -> SchemaBuilder {
        Schema::builder(name).key_policy(self.config.engine.key_policy)
    }

    /// Validates one invocation.
    pub fn validate(&self, schema: &Schema, input: &Input) -> Outcome {
        self.engine.validate(schema, input)
    }

    /// Validates a single unified bucket.
    pub fn validate_map(&self, schema: &Schema, map: RawMap) -> Outcome {
        self.engine.validate(schema, &Input::from_auto(map))
    }

    /// Validates and returns the typed mapping or the rendered failure.
    ///
    /// # Errors
    ///
    /// Returns the renderer's output when validation fails.
    pub fn bind<R, F>(&self, schema: &Schema, input: &Input, render: F) -> Result<Params, R>
    where
        F: FnOnce(ErrorPayload) -> R,
    {
        self.engine.bind(schema, input, render)
    }
}

impl Default for Veritas {
    fn default() -> Self {
        Self::new(VeritasConfig::default())
    }
}
