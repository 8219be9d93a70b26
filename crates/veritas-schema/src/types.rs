//! Type references and their build-time resolution.

use std::fmt;
use std::sync::Arc;

use veritas_core::{ConfigError, ConfigResult};

use crate::coerce::{self, Coercer};
use crate::registry::{names, TypeRegistry};
use crate::schema::Schema;

/// The declared type of a parameter.
///
/// Scalar names are resolved against the schema's [`TypeRegistry`] when the
/// schema is built. Nested schemas are referenced directly, so they are
/// always resolved; since a schema must be built before it can be referenced,
/// a schema can never (transitively) contain itself.
#[derive(Clone)]
pub enum TypeRef {
    /// A registered scalar type.
    Scalar(String),
    /// A list whose elements have the inner type.
    ArrayOf(Box<TypeRef>),
    /// A mapping validated by another schema.
    NestedSchema(Arc<Schema>),
    /// A list of mappings, each validated by another schema.
    ArrayOfNestedSchema(Arc<Schema>),
}

impl TypeRef {
    /// References a registered scalar type by name.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    /// A list of the given type.
    ///
    /// A list of a nested schema is the same as [`TypeRef::array_of_nested`].
    pub fn array(inner: TypeRef) -> Self {
        match inner {
            Self::NestedSchema(schema) => Self::ArrayOfNestedSchema(schema),
            other => Self::ArrayOf(Box::new(other)),
        }
    }

    /// A mapping validated by `schema`.
    pub fn nested(schema: impl Into<Arc<Schema>>) -> Self {
        Self::NestedSchema(schema.into())
    }

    /// A list of mappings, each validated by `schema`.
    pub fn array_of_nested(schema: impl Into<Arc<Schema>>) -> Self {
        Self::ArrayOfNestedSchema(schema.into())
    }

    /// Builtin string type.
    pub fn string() -> Self {
        Self::scalar(names::STRING)
    }

    /// Builtin integer type.
    pub fn integer() -> Self {
        Self::scalar(names::INTEGER)
    }

    /// Builtin float type.
    pub fn float() -> Self {
        Self::scalar(names::FLOAT)
    }

    /// Builtin decimal type.
    pub fn decimal() -> Self {
        Self::scalar(names::DECIMAL)
    }

    /// Builtin boolean type.
    pub fn boolean() -> Self {
        Self::scalar(names::BOOLEAN)
    }

    /// Builtin date type.
    pub fn date() -> Self {
        Self::scalar(names::DATE)
    }

    /// Builtin timestamp type.
    pub fn datetime() -> Self {
        Self::scalar(names::DATETIME)
    }

    /// Resolves this reference for `param` against `registry`.
    pub(crate) fn resolve(&self, param: &str, registry: &TypeRegistry) -> ConfigResult<ResolvedType> {
        match self {
            Self::Scalar(name) => registry
                .lookup(name)
                .map(|def| ResolvedType::Coerce {
                    name: def.name().to_string(),
                    coercer: def.coercer().clone(),
                })
                .ok_or_else(|| unresolved(param, self)),
            Self::ArrayOf(inner) => match inner.as_ref() {
                Self::Scalar(name) => registry
                    .lookup(name)
                    .map(|def| ResolvedType::Coerce {
                        name: self.to_string(),
                        coercer: def.list_coercer().clone(),
                    })
                    .ok_or_else(|| unresolved(param, self)),
                Self::ArrayOf(_) => match inner.resolve(param, registry)? {
                    ResolvedType::Coerce { coercer, .. } => Ok(ResolvedType::Coerce {
                        name: self.to_string(),
                        coercer: coerce::list_of(coercer),
                    }),
                    _ => Err(nested_list_of_lists(param, self)),
                },
                Self::NestedSchema(schema) => Ok(ResolvedType::NestedList(schema.clone())),
                Self::ArrayOfNestedSchema(_) => Err(nested_list_of_lists(param, self)),
            },
            Self::NestedSchema(schema) => Ok(ResolvedType::Nested(schema.clone())),
            Self::ArrayOfNestedSchema(schema) => Ok(ResolvedType::NestedList(schema.clone())),
        }
    }
}

fn unresolved(param: &str, type_ref: &TypeRef) -> ConfigError {
    ConfigError::UnresolvedType {
        param: param.to_string(),
        type_name: type_ref.to_string(),
    }
}

fn nested_list_of_lists(param: &str, type_ref: &TypeRef) -> ConfigError {
    ConfigError::UnsupportedType {
        param: param.to_string(),
        type_name: type_ref.to_string(),
        reason: "lists of lists of nested schemas are not supported".to_string(),
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => write!(f, "{name}"),
            Self::ArrayOf(inner) => write!(f, "[{inner}]"),
            Self::NestedSchema(schema) => write!(f, "schema {}", schema.name()),
            Self::ArrayOfNestedSchema(schema) => write!(f, "[schema {}]", schema.name()),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({self})")
    }
}

/// A type reference after resolution.
#[derive(Clone)]
pub enum ResolvedType {
    /// Coerced by a function (scalars and lists of scalars).
    Coerce {
        /// Display name of the type (e.g. `integer`, `[integer]`).
        name: String,
        /// The coercer to apply.
        coercer: Coercer,
    },
    /// Validated by a nested schema.
    Nested(Arc<Schema>),
    /// Each element validated by a nested schema.
    NestedList(Arc<Schema>),
}

impl ResolvedType {
    /// Returns the display name of the resolved type.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Coerce { name, .. } => name.clone(),
            Self::Nested(schema) => format!("schema {}", schema.name()),
            Self::NestedList(schema) => format!("[schema {}]", schema.name()),
        }
    }
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolvedType({})", self.name())
    }
}
