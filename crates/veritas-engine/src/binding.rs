//! Framework-agnostic binding helpers.
//!
//! An HTTP layer hands over its decoded buckets, renders failures with its
//! own renderer, and on success replaces its parameter bag with the typed
//! mapping. These helpers use a default [`Engine`]; hosts that need custom
//! limits call the engine directly.

use serde_json::Value as Raw;
use veritas_core::{ErrorPayload, Input, Params};
use veritas_schema::Schema;

use crate::engine::Engine;
use crate::outcome::Outcome;

/// Validates `input` against `schema`, rendering failures with `render`.
///
/// # Errors
///
/// Returns the renderer's output when validation fails.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use veritas_core::{ErrorPayload, Input};
/// use veritas_engine::bind;
/// use veritas_schema::{ParamDef, Schema, TypeRef};
///
/// let schema = Schema::builder("user")
///     .param(ParamDef::builder("id", TypeRef::integer()).required().from_path())
///     .build()
///     .unwrap();
///
/// let status = bind(&schema, &Input::new(), |payload| match payload {
///     ErrorPayload::One(_) => 400,
///     ErrorPayload::Many(_) => 422,
/// });
/// assert_eq!(status, Err(400));
/// ```
pub fn bind<R, F>(schema: &Schema, input: &Input, render: F) -> Result<Params, R>
where
    F: FnOnce(ErrorPayload) -> R,
{
    Engine::default().bind(schema, input, render)
}

/// Validates a top-level JSON value against `schema`.
pub fn validate_value(schema: &Schema, raw: &Raw) -> Outcome {
    Engine::default().validate_value(schema, raw)
}

/// Validation methods on [`Schema`].
pub trait SchemaExt {
    /// Validates one invocation with a default [`Engine`].
    fn validate(&self, input: &Input) -> Outcome;

    /// Validates one invocation with the given engine.
    fn validate_with(&self, engine: &Engine, input: &Input) -> Outcome;
}

impl SchemaExt for Schema {
    fn validate(&self, input: &Input) -> Outcome {
        Engine::default().validate(self, input)
    }

    fn validate_with(&self, engine: &Engine, input: &Input) -> Outcome {
        engine.validate(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use veritas_core::Value;
    use veritas_schema::{ParamDef, TypeRef};

    #[test]
    fn test_schema_ext_validate() {
        let schema = Schema::builder("flags")
            .param(ParamDef::builder("dry_run", TypeRef::boolean()).default(json!(false)))
            .build()
            .unwrap();

        let outcome = schema.validate(&Input::new());
        assert_eq!(outcome.params().unwrap()["dry_run"], Value::Bool(false));
    }

    #[test]
    fn test_validate_value_rejects_scalars() {
        let schema = Schema::builder("empty").build().unwrap();

        for raw in [json!(null), json!("x"), json!(1), json!([])] {
            let outcome = validate_value(&schema, &raw);
            assert_eq!(outcome.errors().len(), 1);
            assert_eq!(outcome.errors()[0].param, None);
            assert_eq!(outcome.errors()[0].message, "Validation error: invalid");
        }
        assert!(validate_value(&schema, &json!({})).is_valid());
    }
}
