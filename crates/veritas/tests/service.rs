//! Integration tests for the configured service.

use serde_json::json;
use veritas::prelude::*;
use veritas::VeritasError;

fn configured(toml: &str) -> Veritas {
    let config = ConfigLoader::new()
        .with_string(toml, "toml")
        .unwrap()
        .load()
        .unwrap();
    Veritas::new(config)
}

fn map(value: serde_json::Value) -> veritas::core::RawMap {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_default_service() {
    let veritas = Veritas::default();
    assert_eq!(veritas.config(), &VeritasConfig::default());
    assert_eq!(veritas.engine().config().max_depth, 32);
    assert!(veritas.engine().config().collapse_single_error);
}

#[test]
fn test_atom_policy_rejects_non_identifier() {
    let veritas = configured("[engine]\nkey_policy = \"atom\"\n");

    let result = veritas
        .schema("user")
        .param(ParamDef::builder("user-id", TypeRef::integer()))
        .build();

    let err = VeritasError::from(result.unwrap_err());
    assert!(err.to_string().contains("user-id"));
}

#[test]
fn test_string_policy_accepts_any_name() {
    let veritas = Veritas::default();
    let schema = veritas
        .schema("user")
        .param(ParamDef::builder("user-id", TypeRef::integer()).required())
        .build()
        .unwrap();

    let outcome = veritas.validate_map(&schema, map(json!({"user-id": "7"})));
    assert_eq!(outcome.params().unwrap()["user-id"], Value::Integer(7));
}

#[test]
fn test_collapse_disabled_keeps_list() {
    let veritas = configured("[engine]\ncollapse_single_error = false\n");
    let schema = veritas
        .schema("search")
        .param(ParamDef::builder("q", TypeRef::string()).required())
        .build()
        .unwrap();

    let payload = veritas.bind(&schema, &Input::new(), |p| p).unwrap_err();
    assert!(matches!(payload, ErrorPayload::Many(ref entries) if entries.len() == 1));
}

#[test]
fn test_collapse_enabled_by_default() {
    let veritas = Veritas::default();
    let schema = veritas
        .schema("search")
        .param(ParamDef::builder("q", TypeRef::string()).required())
        .build()
        .unwrap();

    let payload = veritas.bind(&schema, &Input::new(), |p| p).unwrap_err();
    match payload {
        ErrorPayload::One(entry) => {
            assert_eq!(entry.param.as_deref(), Some("q"));
            assert_eq!(entry.error_code, ErrorCode::Missing);
        }
        ErrorPayload::Many(_) => panic!("expected a single record"),
    }
}

#[test]
fn test_max_depth_from_config() {
    let veritas = configured("[engine]\nmax_depth = 1\n");

    let leaf = veritas
        .schema("leaf")
        .param(ParamDef::builder("x", TypeRef::integer()))
        .build()
        .unwrap();
    let middle = veritas
        .schema("middle")
        .param(ParamDef::builder("leaf", TypeRef::nested(leaf)))
        .build()
        .unwrap();
    let root = veritas
        .schema("root")
        .param(ParamDef::builder("middle", TypeRef::nested(middle)))
        .build()
        .unwrap();

    let outcome = veritas.validate_map(&root, map(json!({"middle": {"leaf": {"x": 1}}})));
    let errors = outcome.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].param.as_deref(), Some("middle.leaf"));
    assert_eq!(errors[0].reason(), veritas::engine::NESTING_TOO_DEEP);

    let shallow = veritas.validate_map(&root, map(json!({"middle": {}})));
    assert!(shallow.is_valid());
}

#[test]
fn test_validate_with_sources() {
    let veritas = Veritas::default();
    let schema = veritas
        .schema("show")
        .param(ParamDef::builder("id", TypeRef::integer()).from_path())
        .param(ParamDef::builder("verbose", TypeRef::boolean()).from_query().default(false))
        .build()
        .unwrap();

    let input = Input::new()
        .with_path(map(json!({"id": "12"})))
        .with_query(map(json!({"id": "99"})));

    let params = veritas.validate(&schema, &input).into_result().unwrap();
    assert_eq!(params["id"], Value::Integer(12));
    assert_eq!(params["verbose"], Value::Bool(false));
}

#[test]
fn test_invalid_config_surfaces_as_config_error() {
    let result = ConfigLoader::new().with_string("[engine]\nmax_depth = 0\n", "toml").unwrap().load();
    let err = VeritasError::from(result.unwrap_err());
    assert!(matches!(err, VeritasError::Config(_)));
}

#[test]
fn test_init_with_logging_disabled() {
    let mut config = VeritasConfig::default();
    config.logging.enabled = false;

    let veritas = Veritas::init(config).unwrap();
    assert!(!veritas.config().logging.enabled);
}
