//! The validation engine.
//!
//! Runs a built [`Schema`] against raw [`Input`]: extraction, coercion,
//! per-parameter validation, global validation and error formatting. The
//! engine holds only configuration, so one instance can serve every schema
//! and every thread.

use std::time::Instant;

use serde_json::Value as Raw;
use tracing::{debug, trace};
use veritas_core::{ErrorEntry, ErrorPayload, Input, ParamError, Params, INVALID_INPUT};
use veritas_schema::Schema;
use veritas_telemetry::metrics::{record_validation, OUTCOME_INVALID, OUTCOME_VALID};

use crate::extract::extract;
use crate::format::{format_error, format_errors};
use crate::globals::run_globals;
use crate::outcome::Outcome;
use crate::pipeline::resolve_param;

/// Default maximum nesting depth of nested schemas.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest allowed nested schema invocation; the top level is depth 0.
    pub max_depth: usize,
    /// Render a single error as a bare record instead of a one-element list.
    pub collapse_single_error: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            collapse_single_error: true,
        }
    }
}

/// Runs schemas against input.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use veritas_core::Value;
/// use veritas_engine::Engine;
/// use veritas_schema::{ParamDef, Schema, TypeRef};
///
/// let schema = Schema::builder("user")
///     .param(ParamDef::builder("age", TypeRef::integer()).required())
///     .build()
///     .unwrap();
///
/// let outcome = Engine::default().validate_value(&schema, &json!({"age": "42"}));
/// assert_eq!(outcome.params().unwrap()["age"], Value::Integer(42));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates one invocation.
    ///
    /// Never panics on bad input; every problem ends up in the outcome.
    pub fn validate(&self, schema: &Schema, input: &Input) -> Outcome {
        let started = Instant::now();
        let outcome = match self.run(schema, input, 0) {
            Ok(params) => Outcome::Valid(params),
            Err(errors) => Outcome::Invalid(errors),
        };
        finish(schema, started, &outcome);
        outcome
    }

    /// Validates a top-level JSON value, which must be an object.
    ///
    /// Any other value yields a single parameter-less `"invalid"` error.
    pub fn validate_value(&self, schema: &Schema, raw: &Raw) -> Outcome {
        match raw {
            Raw::Object(map) => self.validate(schema, &Input::from_auto(map.clone())),
            _ => {
                let error = ParamError::Coercion(INVALID_INPUT.to_string());
                let outcome = Outcome::Invalid(format_error(None, error));
                finish(schema, Instant::now(), &outcome);
                outcome
            }
        }
    }

    /// Validates and either returns the typed mapping or renders the failure.
    ///
    /// The renderer receives the failure body shaped per
    /// [`EngineConfig::collapse_single_error`].
    ///
    /// # Errors
    ///
    /// Returns whatever the renderer produced when validation fails.
    pub fn bind<R, F>(&self, schema: &Schema, input: &Input, render: F) -> Result<Params, R>
    where
        F: FnOnce(ErrorPayload) -> R,
    {
        match self.validate(schema, input) {
            Outcome::Valid(params) => Ok(params),
            Outcome::Invalid(errors) => Err(render(ErrorPayload::from_entries(
                errors,
                self.config.collapse_single_error,
            ))),
        }
    }

    /// Runs a schema at the given nesting depth.
    pub(crate) fn run(
        &self,
        schema: &Schema,
        input: &Input,
        depth: usize,
    ) -> Result<Params, Vec<ErrorEntry>> {
        let mut params = Params::with_capacity(schema.len());
        let mut failed: Vec<(String, ParamError)> = Vec::new();

        for extracted in extract(schema, input) {
            let name = extracted.param.name();
            match resolve_param(self, extracted.param, &extracted.raw, depth) {
                Ok(value) => {
                    trace!(
                        schema = %schema.name(),
                        param = %name,
                        depth,
                        outcome = OUTCOME_VALID,
                        "parameter resolved"
                    );
                    params.insert(name.to_string(), value);
                }
                Err(error) => {
                    trace!(
                        schema = %schema.name(),
                        param = %name,
                        depth,
                        outcome = OUTCOME_INVALID,
                        "parameter resolved"
                    );
                    failed.push((name.to_string(), error));
                }
            }
        }

        if !failed.is_empty() {
            return Err(format_errors(failed, None));
        }

        match run_globals(schema, &params) {
            Ok(()) => Ok(params),
            Err(error) => Err(format_errors(Vec::new(), Some(error))),
        }
    }
}

fn finish(schema: &Schema, started: Instant, outcome: &Outcome) {
    let elapsed = started.elapsed();
    let errors = outcome.errors();
    let label = if errors.is_empty() {
        OUTCOME_VALID
    } else {
        OUTCOME_INVALID
    };

    debug!(
        schema = %schema.name(),
        outcome = label,
        error_count = errors.len(),
        duration_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        "validation finished"
    );
    record_validation(schema.name(), elapsed, errors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use veritas_core::{ErrorCode, Value};
    use veritas_schema::{fixtures, Bounds, ParamDef, TypeRef};

    fn user_schema() -> Schema {
        Schema::builder("user")
            .param(ParamDef::builder("name", TypeRef::string()).required())
            .param(ParamDef::builder("age", TypeRef::integer()).numericality(Bounds::new().gte(0)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_success_preserves_declaration_order() {
        let outcome =
            Engine::default().validate_value(&user_schema(), &json!({"age": "42", "name": "Ada"}));

        let params = outcome.params().unwrap();
        let keys: Vec<&String> = params.keys().collect();
        assert_eq!(keys, vec!["name", "age"]);
        assert_eq!(params["age"], Value::Integer(42));
    }

    #[test]
    fn test_errors_accumulate_per_parameter() {
        let outcome = Engine::default().validate_value(&user_schema(), &json!({"age": "-1"}));

        let errors = outcome.errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].param.as_deref(), Some("name"));
        assert_eq!(errors[0].error_code, ErrorCode::Missing);
        assert_eq!(errors[1].param.as_deref(), Some("age"));
        assert_eq!(errors[1].message, "Validation error: must be >= 0");
    }

    #[test]
    fn test_non_object_input() {
        let outcome = Engine::default().validate_value(&user_schema(), &json!([1, 2]));

        assert_eq!(outcome.errors(), &[ErrorEntry::invalid_input()]);
    }

    #[test]
    fn test_bind_renders_collapsed_payload() {
        let engine = Engine::default();
        let input = Input::from_auto(json!({"age": 1}).as_object().cloned().unwrap());

        let rendered = engine
            .bind(&user_schema(), &input, |payload| serde_json::to_value(payload).unwrap())
            .unwrap_err();
        assert_eq!(
            rendered,
            json!({"param": "name", "message": "Validation error: required", "error_code": "MISSING"})
        );

        let engine = Engine::new(EngineConfig {
            collapse_single_error: false,
            ..EngineConfig::default()
        });
        let rendered = engine
            .bind(&user_schema(), &input, |payload| payload.entries().len())
            .unwrap_err();
        assert_eq!(rendered, 1);
    }

    #[test]
    fn test_bind_returns_typed_params() {
        let input = Input::from_auto(json!({"name": "Ada"}).as_object().cloned().unwrap());
        let params = Engine::default()
            .bind(&user_schema(), &input, |_| ())
            .unwrap();

        assert_eq!(params["name"], Value::from("Ada"));
        assert_eq!(params["age"], Value::Null);
    }

    #[test]
    fn test_nested_depth_counts_levels() {
        let engine = Engine::new(EngineConfig {
            max_depth: 1,
            ..EngineConfig::default()
        });
        let order = fixtures::order_schema();
        let input = Input::new()
            .with_path(json!({"id": 1}).as_object().cloned().unwrap())
            .with_body(
                json!({"shipping": {"country": "DE"}, "items": [{"x": "a"}]})
                    .as_object()
                    .cloned()
                    .unwrap(),
            );

        assert!(engine.validate(&order, &input).is_valid());

        let wrapper = Schema::builder("wrapper")
            .param(ParamDef::builder("order", TypeRef::nested(order)))
            .build()
            .unwrap();
        let outcome =
            engine.validate_value(&wrapper, &json!({"order": {"id": 1, "items": [{"x": "a"}]}}));
        assert_eq!(
            outcome.errors(),
            &[ErrorEntry::for_param("order.items", "nesting too deep")]
        );
    }
}
