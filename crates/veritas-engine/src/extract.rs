//! Raw value extraction and defaulting.

use serde_json::Value as Raw;
use veritas_core::Input;
use veritas_schema::{ParamDef, Schema};

/// A parameter paired with its resolved raw value.
#[derive(Debug)]
pub(crate) struct Extracted<'s> {
    pub(crate) param: &'s ParamDef,
    pub(crate) raw: Raw,
}

/// Resolves every parameter's raw value, in declaration order.
///
/// An absent or `null` value falls back to the parameter's default. A default
/// may itself resolve to `null`.
pub(crate) fn extract<'s>(schema: &'s Schema, input: &Input) -> Vec<Extracted<'s>> {
    schema
        .params()
        .iter()
        .map(|param| {
            let raw = match input.fetch(param.source(), param.name()) {
                Some(raw) if !raw.is_null() => raw.clone(),
                _ => param.default_value().resolve(input).unwrap_or(Raw::Null),
            };
            Extracted { param, raw }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use veritas_core::{RawMap, Source};
    use veritas_schema::TypeRef;

    fn map(value: Raw) -> RawMap {
        value.as_object().cloned().unwrap()
    }

    fn raws(schema: &Schema, input: &Input) -> Vec<(String, Raw)> {
        extract(schema, input)
            .into_iter()
            .map(|e| (e.param.name().to_string(), e.raw))
            .collect()
    }

    #[test]
    fn test_reads_declared_bucket() {
        let schema = Schema::builder("s")
            .param(ParamDef::builder("id", TypeRef::integer()).from_path())
            .param(ParamDef::builder("q", TypeRef::string()).from_query())
            .param(ParamDef::builder("any", TypeRef::string()))
            .build()
            .unwrap();
        let input = Input::from_auto(map(json!({"any": "a", "id": "wrong"})))
            .with_path(map(json!({"id": "7"})))
            .with_query(map(json!({"q": "rust"})));

        assert_eq!(
            raws(&schema, &input),
            vec![
                ("id".to_string(), json!("7")),
                ("q".to_string(), json!("rust")),
                ("any".to_string(), json!("a")),
            ]
        );
    }

    #[test]
    fn test_defaults_apply_to_absent_and_null() {
        let schema = Schema::builder("s")
            .param(ParamDef::builder("page", TypeRef::integer()).default(json!(1)))
            .param(ParamDef::builder("size", TypeRef::integer()).default_with(|| json!(25)))
            .param(ParamDef::builder("sort", TypeRef::string()).default_from(|input| {
                input
                    .fetch(Source::Query, "order")
                    .cloned()
                    .unwrap_or(Raw::Null)
            }))
            .param(ParamDef::builder("filter", TypeRef::string()))
            .build()
            .unwrap();
        let input = Input::from_auto(map(json!({"page": null})))
            .with_query(map(json!({"order": "desc"})));

        assert_eq!(
            raws(&schema, &input),
            vec![
                ("page".to_string(), json!(1)),
                ("size".to_string(), json!(25)),
                ("sort".to_string(), json!("desc")),
                ("filter".to_string(), Raw::Null),
            ]
        );
    }

    #[test]
    fn test_present_value_wins_over_default() {
        let schema = Schema::builder("s")
            .param(ParamDef::builder("page", TypeRef::integer()).default(json!(1)))
            .build()
            .unwrap();
        let input = Input::from_auto(map(json!({"page": "3"})));

        assert_eq!(raws(&schema, &input), vec![("page".to_string(), json!("3"))]);
    }

    #[test]
    fn test_lookup_is_exact() {
        let schema = Schema::builder("s")
            .param(ParamDef::builder("userId", TypeRef::integer()))
            .build()
            .unwrap();
        let input = Input::from_auto(map(json!({"userid": 1, "user_id": 2})));

        assert_eq!(raws(&schema, &input), vec![("userId".to_string(), Raw::Null)]);
    }
}
