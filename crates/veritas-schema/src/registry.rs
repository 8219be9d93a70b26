//! The type registry.
//!
//! Maps a type name to its coercion rule. Registering a scalar type also
//! derives the coercer for lists of that type.

use indexmap::IndexMap;
use serde_json::Value as Raw;
use std::fmt;
use veritas_core::Value;

use crate::coerce::{self, Coercer};

/// Builtin type names.
pub mod names {
    /// UTF-8 string.
    pub const STRING: &str = "string";
    /// Signed 64-bit integer.
    pub const INTEGER: &str = "integer";
    /// 64-bit float.
    pub const FLOAT: &str = "float";
    /// Exact decimal.
    pub const DECIMAL: &str = "decimal";
    /// Boolean.
    pub const BOOLEAN: &str = "boolean";
    /// ISO-8601 date.
    pub const DATE: &str = "date";
    /// ISO-8601 timestamp with offset.
    pub const DATETIME: &str = "datetime";
}

/// A registered type: its name, scalar coercer and derived list coercer.
#[derive(Clone)]
pub struct TypeDef {
    name: String,
    coercer: Coercer,
    list_coercer: Coercer,
}

impl TypeDef {
    /// Creates a type definition, deriving its list coercer.
    pub fn new(name: impl Into<String>, coercer: Coercer) -> Self {
        let list_coercer = coerce::list_of(coercer.clone());
        Self {
            name: name.into(),
            coercer,
            list_coercer,
        }
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scalar coercer.
    #[must_use]
    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }

    /// Returns the derived list coercer.
    #[must_use]
    pub fn list_coercer(&self) -> &Coercer {
        &self.list_coercer
    }

    /// Coerces a single raw value.
    pub fn coerce(&self, raw: &Raw) -> Result<Value, String> {
        (self.coercer)(raw)
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef").field("name", &self.name).finish()
    }
}

/// Registry of named types.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use veritas_core::Value;
/// use veritas_schema::TypeRegistry;
///
/// let mut registry = TypeRegistry::with_builtins();
/// registry.register("upper", |raw| {
///     raw.as_str()
///         .map(|s| Value::String(s.to_uppercase()))
///         .ok_or_else(|| "not a string".to_string())
/// });
///
/// let upper = registry.lookup("upper").unwrap();
/// assert_eq!(upper.coerce(&json!("abc")), Ok(Value::from("ABC")));
/// assert_eq!(
///     (upper.list_coercer())(&json!(["a", 1])),
///     Err("element at index 1: not a string".to_string())
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDef>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the builtin types.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(names::STRING, coerce::string);
        registry.register(names::INTEGER, coerce::integer);
        registry.register(names::FLOAT, coerce::float);
        registry.register(names::DECIMAL, coerce::decimal);
        registry.register(names::BOOLEAN, coerce::boolean);
        registry.register(names::DATE, coerce::date);
        registry.register(names::DATETIME, coerce::datetime);
        registry
    }

    /// Registers (or replaces) a scalar type.
    pub fn register<F>(&mut self, name: impl Into<String>, coercer: F) -> &mut Self
    where
        F: Fn(&Raw) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.register_shared(name, coerce::shared(coercer))
    }

    /// Registers (or replaces) a scalar type from an existing [`Coercer`].
    pub fn register_shared(&mut self, name: impl Into<String>, coercer: Coercer) -> &mut Self {
        let def = TypeDef::new(name, coercer);
        self.types.insert(def.name.clone(), def);
        self
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Returns true if the type is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns the registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
