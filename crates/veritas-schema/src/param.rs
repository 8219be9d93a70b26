//! Parameter definitions and their builder.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value as Raw;
use veritas_core::{ConfigError, Input, KeyPolicy, Source, Value};

use crate::registry::TypeRegistry;
use crate::types::{ResolvedType, TypeRef};
use crate::validator::{Bounds, Builtin, CustomFn, Validator};

/// Computes a default without looking at the input.
pub type NullaryProvider = Arc<dyn Fn() -> Raw + Send + Sync>;

/// Computes a default from the raw input of the invocation.
pub type UnaryProvider = Arc<dyn Fn(&Input) -> Raw + Send + Sync>;

/// A default computed at request time.
#[derive(Clone)]
pub enum DefaultProvider {
    /// Takes no arguments.
    Nullary(NullaryProvider),
    /// Receives the full raw input.
    Unary(UnaryProvider),
}

impl DefaultProvider {
    /// Invokes the provider.
    pub fn provide(&self, input: &Input) -> Raw {
        match self {
            Self::Nullary(f) => f(),
            Self::Unary(f) => f(input),
        }
    }
}

/// What an absent or `null` parameter resolves to.
#[derive(Clone, Default)]
pub enum DefaultValue {
    /// No default; the value stays `null`.
    #[default]
    None,
    /// Substituted verbatim, then coerced like any raw value.
    Static(Raw),
    /// Computed per request.
    Provider(DefaultProvider),
}

impl DefaultValue {
    /// Resolves the default for one invocation, if any.
    pub fn resolve(&self, input: &Input) -> Option<Raw> {
        match self {
            Self::None => None,
            Self::Static(raw) => Some(raw.clone()),
            Self::Provider(provider) => Some(provider.provide(input)),
        }
    }

    /// Returns true if no default is configured.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Static(raw) => write!(f, "Static({raw})"),
            Self::Provider(DefaultProvider::Nullary(_)) => write!(f, "Provider(fn/0)"),
            Self::Provider(DefaultProvider::Unary(_)) => write!(f, "Provider(fn/1)"),
        }
    }
}

/// A resolved parameter of a built schema.
#[derive(Clone)]
pub struct ParamDef {
    name: String,
    type_ref: TypeRef,
    resolved: ResolvedType,
    required: bool,
    source: Source,
    default: DefaultValue,
    validator: Option<Validator>,
}

impl ParamDef {
    /// Starts building a parameter.
    ///
    /// # Example
    ///
    /// ```
    /// use veritas_schema::{Bounds, ParamDef, TypeRef};
    ///
    /// let age = ParamDef::builder("age", TypeRef::integer())
    ///     .required()
    ///     .from_query()
    ///     .numericality(Bounds::new().gte(0));
    /// assert_eq!(age.name(), "age");
    /// ```
    pub fn builder(name: impl Into<String>, type_ref: TypeRef) -> ParamBuilder {
        ParamBuilder::new(name, type_ref)
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Returns the resolved type.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedType {
        &self.resolved
    }

    /// Returns true if the parameter must not resolve to `null`.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the bucket the parameter is read from.
    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns the default.
    #[must_use]
    pub fn default_value(&self) -> &DefaultValue {
        &self.default
    }

    /// Returns the validator, if any.
    #[must_use]
    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }
}

impl fmt::Debug for ParamDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamDef")
            .field("name", &self.name)
            .field("type", &self.type_ref.to_string())
            .field("required", &self.required)
            .field("source", &self.source)
            .field("default", &self.default)
            .field("validator", &self.validator.as_ref().map(Validator::kind))
            .finish()
    }
}

/// A validator as configured, before patterns are compiled and
/// exclusivity is checked.
#[derive(Clone)]
enum ValidatorSpec {
    Custom(CustomFn),
    Numericality(Bounds),
    Length(Bounds),
    Size(Bounds),
    In(Vec<Value>),
    Format(String),
}

impl ValidatorSpec {
    fn kind(&self) -> &'static str {
        match self {
            Self::Custom(_) => "custom",
            Self::Numericality(_) => "numericality",
            Self::Length(_) => "length",
            Self::Size(_) => "size",
            Self::In(_) => "in",
            Self::Format(_) => "format",
        }
    }

    fn compile(self, param: &str) -> Result<Validator, ConfigError> {
        let empty = |constraint: &str| ConfigError::EmptyConstraint {
            param: param.to_string(),
            constraint: constraint.to_string(),
        };

        let builtin = match self {
            Self::Custom(f) => return Ok(Validator::Custom(f)),
            Self::Numericality(bounds) if bounds.is_empty() => return Err(empty("numericality")),
            Self::Length(bounds) if bounds.is_empty() => return Err(empty("length")),
            Self::Size(bounds) if bounds.is_empty() => return Err(empty("size")),
            Self::In(values) if values.is_empty() => return Err(empty("in")),
            Self::Numericality(bounds) => Builtin::Numericality(bounds),
            Self::Length(bounds) => Builtin::Length(bounds),
            Self::Size(bounds) => Builtin::Size(bounds),
            Self::In(values) => Builtin::In(values),
            Self::Format(pattern) => {
                let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
                    param: param.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
                Builtin::Format(regex)
            }
        };
        Ok(Validator::Builtin(builtin))
    }
}

/// Builder for [`ParamDef`].
///
/// Nothing is checked until the owning schema is built.
#[derive(Clone)]
#[must_use]
pub struct ParamBuilder {
    name: String,
    type_ref: TypeRef,
    required: bool,
    source: Source,
    default: DefaultValue,
    validators: Vec<ValidatorSpec>,
}

impl ParamBuilder {
    /// Creates a builder for an optional parameter read from the unified bucket.
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            required: false,
            source: Source::Auto,
            default: DefaultValue::None,
            validators: Vec::new(),
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marks the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the bucket the parameter is read from.
    pub fn source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Reads the parameter from the path bucket.
    pub fn from_path(self) -> Self {
        self.source(Source::Path)
    }

    /// Reads the parameter from the body bucket.
    pub fn from_body(self) -> Self {
        self.source(Source::Body)
    }

    /// Reads the parameter from the query bucket.
    pub fn from_query(self) -> Self {
        self.source(Source::Query)
    }

    /// Substitutes `raw` when the value is absent or `null`.
    pub fn default(mut self, raw: impl Into<Raw>) -> Self {
        self.default = DefaultValue::Static(raw.into());
        self
    }

    /// Computes the default with a zero-argument function.
    pub fn default_with<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Raw + Send + Sync + 'static,
    {
        self.default = DefaultValue::Provider(DefaultProvider::Nullary(Arc::new(provider)));
        self
    }

    /// Computes the default from the raw input of the invocation.
    pub fn default_from<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Input) -> Raw + Send + Sync + 'static,
    {
        self.default = DefaultValue::Provider(DefaultProvider::Unary(Arc::new(provider)));
        self
    }

    /// Adds a custom validator.
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(ValidatorSpec::Custom(Arc::new(validator)));
        self
    }

    /// Adds numeric bounds.
    pub fn numericality(mut self, bounds: Bounds) -> Self {
        self.validators.push(ValidatorSpec::Numericality(bounds));
        self
    }

    /// Adds bounds on a string's length.
    pub fn length(mut self, bounds: Bounds) -> Self {
        self.validators.push(ValidatorSpec::Length(bounds));
        self
    }

    /// Adds bounds on a collection's size.
    pub fn size(mut self, bounds: Bounds) -> Self {
        self.validators.push(ValidatorSpec::Size(bounds));
        self
    }

    /// Restricts the value to an allowed list.
    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.validators
            .push(ValidatorSpec::In(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Requires strings to match `pattern` (unanchored).
    pub fn format(mut self, pattern: impl Into<String>) -> Self {
        self.validators.push(ValidatorSpec::Format(pattern.into()));
        self
    }

    /// Resolves the parameter, collecting every problem found.
    pub(crate) fn resolve(
        self,
        registry: &TypeRegistry,
        key_policy: KeyPolicy,
    ) -> Result<ParamDef, Vec<ConfigError>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(ConfigError::InvalidName {
                name: self.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        } else if !key_policy.accepts(&self.name) {
            errors.push(ConfigError::InvalidName {
                name: self.name.clone(),
                reason: format!("not an identifier under the {key_policy} key policy"),
            });
        }

        let resolved = match self.type_ref.resolve(&self.name, registry) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let mut validators = self.validators.into_iter();
        let validator = match (validators.next(), validators.next()) {
            (Some(first), Some(second)) => {
                errors.push(ConfigError::ConflictingValidators {
                    param: self.name.clone(),
                    first: first.kind().to_string(),
                    second: second.kind().to_string(),
                });
                None
            }
            (Some(spec), None) => match spec.compile(&self.name) {
                Ok(validator) => Some(validator),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
            _ => None,
        };

        match resolved {
            Some(resolved) if errors.is_empty() => Ok(ParamDef {
                name: self.name,
                type_ref: self.type_ref,
                resolved,
                required: self.required,
                source: self.source,
                default: self.default,
                validator,
            }),
            _ => Err(errors),
        }
    }
}

impl fmt::Debug for ParamBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamBuilder")
            .field("name", &self.name)
            .field("type", &self.type_ref.to_string())
            .field(
                "validators",
                &self.validators.iter().map(ValidatorSpec::kind).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
