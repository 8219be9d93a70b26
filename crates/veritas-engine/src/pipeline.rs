//! Per-parameter coercion and validation.

use serde_json::Value as Raw;
use veritas_core::{ErrorEntry, Input, ParamError, Value, INVALID_INPUT, REQUIRED};
use veritas_schema::{ParamDef, ResolvedType, Schema};

use crate::engine::Engine;

/// Reason reported when nested schemas go deeper than the configured limit.
pub const NESTING_TOO_DEEP: &str = "nesting too deep";

/// Coerces then validates one parameter.
pub(crate) fn resolve_param(
    engine: &Engine,
    param: &ParamDef,
    raw: &Raw,
    depth: usize,
) -> Result<Value, ParamError> {
    let value = coerce_param(engine, param, raw, depth)?;
    validate_param(param, &value)?;
    Ok(value)
}

/// Converts a raw value to its typed form.
///
/// `null` is either `"required"` or passes through as [`Value::Null`]; it
/// never reaches a coercer.
pub(crate) fn coerce_param(
    engine: &Engine,
    param: &ParamDef,
    raw: &Raw,
    depth: usize,
) -> Result<Value, ParamError> {
    if raw.is_null() {
        return if param.is_required() {
            Err(ParamError::Coercion(REQUIRED.to_string()))
        } else {
            Ok(Value::Null)
        };
    }

    match param.resolved() {
        ResolvedType::Coerce { coercer, .. } => coercer(raw).map_err(ParamError::Coercion),
        ResolvedType::Nested(schema) => coerce_nested(engine, schema, raw, depth),
        ResolvedType::NestedList(schema) => coerce_nested_list(engine, schema, raw, depth),
    }
}

fn coerce_nested(
    engine: &Engine,
    schema: &Schema,
    raw: &Raw,
    depth: usize,
) -> Result<Value, ParamError> {
    let Raw::Object(map) = raw else {
        return Err(ParamError::Coercion(INVALID_INPUT.to_string()));
    };
    let depth = enter(engine, depth)?;

    engine
        .run(schema, &Input::nested(map.clone()), depth)
        .map(Value::Map)
        .map_err(ParamError::Nested)
}

fn coerce_nested_list(
    engine: &Engine,
    schema: &Schema,
    raw: &Raw,
    depth: usize,
) -> Result<Value, ParamError> {
    let Raw::Array(items) = raw else {
        return Err(ParamError::Coercion(INVALID_INPUT.to_string()));
    };
    let depth = enter(engine, depth)?;

    let mut values = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Raw::Object(map) = item else {
            return Err(ParamError::Nested(vec![ErrorEntry::for_param(
                format!("[{index}]"),
                INVALID_INPUT,
            )]));
        };

        match engine.run(schema, &Input::nested(map.clone()), depth) {
            Ok(params) => values.push(Value::Map(params)),
            Err(entries) => {
                let prefixed = entries
                    .into_iter()
                    .map(|entry| {
                        let path = match entry.param.as_deref() {
                            Some(child) => format!("[{index}].{child}"),
                            None => format!("[{index}]"),
                        };
                        entry.with_param(Some(path))
                    })
                    .collect();
                return Err(ParamError::Nested(prefixed));
            }
        }
    }
    Ok(Value::List(values))
}

/// Returns the depth of a nested invocation, or fails past the limit.
fn enter(engine: &Engine, depth: usize) -> Result<usize, ParamError> {
    let next = depth + 1;
    if next > engine.config().max_depth {
        return Err(ParamError::Coercion(NESTING_TOO_DEEP.to_string()));
    }
    Ok(next)
}

/// Runs the parameter's validator on a non-null value.
pub(crate) fn validate_param(param: &ParamDef, value: &Value) -> Result<(), ParamError> {
    match param.validator() {
        Some(validator) if !value.is_null() => {
            validator.check(value).map_err(ParamError::Validation)
        }
        _ => Ok(()),
    }
}
