//! Immutable schemas and the builder that produces them.
//!
//! A [`Schema`] is built once, typically at startup, and then shared
//! (behind an `Arc`) across any number of concurrent validations. All
//! configuration problems surface from [`SchemaBuilder::build`]; nothing
//! about a built schema can fail at request time.
//!
//! # Example
//!
//! ```
//! use veritas_schema::{Bounds, ParamDef, Schema, TypeRef};
//!
//! let schema = Schema::builder("search")
//!     .param(ParamDef::builder("q", TypeRef::string()).required())
//!     .param(
//!         ParamDef::builder("page", TypeRef::integer())
//!             .default(1)
//!             .numericality(Bounds::new().gte(1)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.name(), "search");
//! assert_eq!(schema.len(), 2);
//! assert!(schema.param("page").is_some());
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value as Raw;
use tracing::{debug, warn};
use veritas_core::{ConfigError, ConfigResult, KeyPolicy, Params, Value};

use crate::param::{ParamBuilder, ParamDef};
use crate::registry::TypeRegistry;

/// A cross-parameter check function.
pub type GlobalFn = Arc<dyn Fn(&Params) -> Result<(), String> + Send + Sync>;

/// A cross-parameter validator.
///
/// Runs only when every parameter coerced and validated cleanly, and sees
/// the full typed mapping.
#[derive(Clone)]
pub struct GlobalValidator {
    check: GlobalFn,
    halt: bool,
}

impl GlobalValidator {
    /// Creates a validator; later validators still run if it fails.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Params) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            halt: false,
        }
    }

    /// Creates a validator that stops the remaining ones if it fails.
    pub fn halting<F>(check: F) -> Self
    where
        F: Fn(&Params) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            check: Arc::new(check),
            halt: true,
        }
    }

    /// Runs the check.
    pub fn check(&self, params: &Params) -> Result<(), String> {
        (self.check)(params)
    }

    /// Returns true if a failure stops the remaining validators.
    #[must_use]
    pub fn halts(&self) -> bool {
        self.halt
    }
}

impl fmt::Debug for GlobalValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalValidator")
            .field("halt", &self.halt)
            .finish_non_exhaustive()
    }
}

/// A built, immutable schema.
#[derive(Clone)]
pub struct Schema {
    name: String,
    params: Vec<ParamDef>,
    types: TypeRegistry,
    globals: Vec<GlobalValidator>,
    key_policy: KeyPolicy,
}

impl Schema {
    /// Starts building a schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Returns the schema name (used in logs and metrics).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Returns the type table the schema was resolved against.
    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns the global validators in order.
    #[must_use]
    pub fn globals(&self) -> &[GlobalValidator] {
        &self.globals
    }

    /// Returns the key policy.
    #[must_use]
    pub fn key_policy(&self) -> KeyPolicy {
        self.key_policy
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if the schema declares no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("globals", &self.globals.len())
            .field("key_policy", &self.key_policy)
            .finish()
    }
}

/// Builder for [`Schema`].
#[must_use]
pub struct SchemaBuilder {
    name: String,
    types: TypeRegistry,
    params: Vec<ParamBuilder>,
    globals: Vec<GlobalValidator>,
    key_policy: KeyPolicy,
}

impl SchemaBuilder {
    /// Creates a builder with the builtin types registered.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: TypeRegistry::with_builtins(),
            params: Vec::new(),
            globals: Vec::new(),
            key_policy: KeyPolicy::default(),
        }
    }

    /// Registers (or overrides) a scalar type for this schema.
    pub fn register_type<F>(mut self, name: impl Into<String>, coercer: F) -> Self
    where
        F: Fn(&Raw) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.types.register(name, coercer);
        self
    }

    /// Replaces the whole type table.
    pub fn registry(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    /// Declares a parameter.
    pub fn param(mut self, param: ParamBuilder) -> Self {
        self.params.push(param);
        self
    }

    /// Adds a global validator that lets later ones run on failure.
    pub fn global<F>(mut self, check: F) -> Self
    where
        F: Fn(&Params) -> Result<(), String> + Send + Sync + 'static,
    {
        self.globals.push(GlobalValidator::new(check));
        self
    }

    /// Adds a global validator that stops later ones on failure.
    pub fn global_halting<F>(mut self, check: F) -> Self
    where
        F: Fn(&Params) -> Result<(), String> + Send + Sync + 'static,
    {
        self.globals.push(GlobalValidator::halting(check));
        self
    }

    /// Sets the key policy.
    pub fn key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    /// Validates the configuration and freezes the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found. Every error found is logged.
    pub fn build(self) -> ConfigResult<Schema> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        let mut params = Vec::with_capacity(self.params.len());

        for param in self.params {
            if !seen.insert(param.name().to_string()) {
                errors.push(ConfigError::DuplicateParam {
                    name: param.name().to_string(),
                });
                continue;
            }
            match param.resolve(&self.types, self.key_policy) {
                Ok(def) => params.push(def),
                Err(found) => errors.extend(found),
            }
        }

        if let Some(first) = errors.first() {
            for error in &errors {
                warn!(schema = %self.name, error = %error, "invalid schema configuration");
            }
            return Err(first.clone());
        }

        debug!(
            schema = %self.name,
            params = params.len(),
            globals = self.globals.len(),
            key_policy = %self.key_policy,
            "schema built"
        );

        Ok(Schema {
            name: self.name,
            params,
            types: self.types,
            globals: self.globals,
            key_policy: self.key_policy,
        })
    }
}

impl fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("globals", &self.globals.len())
            .finish_non_exhaustive()
    }
}
