//! Cross-parameter validation.

use veritas_core::{ParamError, Params};
use veritas_schema::Schema;

/// Runs the schema's global validators in order against the typed mapping.
///
/// Only call this when every parameter resolved cleanly. Each failure adds
/// its reason to a single [`ParamError::Global`]; a failing halting
/// validator stops the rest.
pub(crate) fn run_globals(schema: &Schema, params: &Params) -> Result<(), ParamError> {
    let mut reasons = Vec::new();
    for global in schema.globals() {
        if let Err(reason) = global.check(params) {
            reasons.push(reason);
            if global.halts() {
                break;
            }
        }
    }
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(ParamError::Global(reasons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_core::Value;

    #[test]
    fn test_all_globals_run_without_halt() {
        let schema = Schema::builder("s")
            .global(|_| Err("first".to_string()))
            .global(|_| Ok(()))
            .global(|_| Err("third".to_string()))
            .build()
            .unwrap();

        assert_eq!(
            run_globals(&schema, &Params::new()),
            Err(ParamError::Global(vec!["first".to_string(), "third".to_string()]))
        );
    }

    #[test]
    fn test_halting_global_stops() {
        let schema = Schema::builder("s")
            .global_halting(|_| Err("first".to_string()))
            .global(|_| Err("second".to_string()))
            .build()
            .unwrap();

        assert_eq!(
            run_globals(&schema, &Params::new()),
            Err(ParamError::Global(vec!["first".to_string()]))
        );
    }

    #[test]
    fn test_passing_halting_global_does_not_stop() {
        let schema = Schema::builder("s")
            .global_halting(|_| Ok(()))
            .global(|params| {
                if params.get("a") == Some(&Value::Integer(1)) {
                    Err("a is one".to_string())
                } else {
                    Ok(())
                }
            })
            .build()
            .unwrap();

        let mut params = Params::new();
        params.insert("a".to_string(), Value::Integer(1));
        assert_eq!(
            run_globals(&schema, &params),
            Err(ParamError::Global(vec!["a is one".to_string()]))
        );
        assert_eq!(run_globals(&schema, &Params::new()), Ok(()));
    }
}
