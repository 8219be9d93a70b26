//! Schema fixtures for tests and documentation.
//!
//! # Example
//!
//! ```
//! use veritas_schema::fixtures;
//!
//! let order = fixtures::order_schema();
//! assert_eq!(order.name(), "order");
//! assert!(order.param("shipping").is_some());
//! ```

use std::sync::Arc;

use serde_json::json;
use veritas_core::Value;

use crate::param::ParamDef;
use crate::schema::Schema;
use crate::types::TypeRef;
use crate::validator::Bounds;

/// A postal address: `street`, `zip` (five digits) and a required `country`.
#[must_use]
pub fn address_schema() -> Arc<Schema> {
    let schema = Schema::builder("address")
        .param(ParamDef::builder("street", TypeRef::string()).length(Bounds::new().lte(100)))
        .param(ParamDef::builder("zip", TypeRef::string()).format(r"^\d{5}$"))
        .param(ParamDef::builder("country", TypeRef::string()).required())
        .build();
    Arc::new(static_schema(schema))
}

/// An order line: required `x` (sku) and a positive `quantity` defaulting to 1.
#[must_use]
pub fn item_schema() -> Arc<Schema> {
    let schema = Schema::builder("item")
        .param(ParamDef::builder("x", TypeRef::string()).required())
        .param(
            ParamDef::builder("quantity", TypeRef::integer())
                .default(json!(1))
                .numericality(Bounds::new().gt(0)),
        )
        .build();
    Arc::new(static_schema(schema))
}

/// An order with a nested shipping address and a list of items.
///
/// The global check rejects orders whose `priority` is `"express"` while
/// shipping outside `DE`.
#[must_use]
pub fn order_schema() -> Arc<Schema> {
    let schema = Schema::builder("order")
        .param(ParamDef::builder("id", TypeRef::integer()).required().from_path())
        .param(ParamDef::builder("shipping", TypeRef::nested(address_schema())).from_body())
        .param(
            ParamDef::builder("items", TypeRef::array_of_nested(item_schema()))
                .required()
                .from_body(),
        )
        .param(
            ParamDef::builder("priority", TypeRef::string())
                .from_query()
                .default(json!("standard"))
                .one_of(["standard", "express"]),
        )
        .global(|params| {
            let express = params.get("priority").and_then(Value::as_str) == Some("express");
            let country = params
                .get("shipping")
                .and_then(|shipping| shipping.get("country"))
                .and_then(Value::as_str);
            if express && country.is_some_and(|c| c != "DE") {
                Err("express shipping is only available in DE".to_string())
            } else {
                Ok(())
            }
        })
        .build();
    Arc::new(static_schema(schema))
}

#[allow(clippy::panic)]
fn static_schema(schema: veritas_core::ConfigResult<Schema>) -> Schema {
    match schema {
        Ok(schema) => schema,
        Err(e) => panic!("fixture schema is invalid: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_build() {
        assert_eq!(address_schema().len(), 3);
        assert_eq!(item_schema().len(), 2);
        assert_eq!(order_schema().len(), 4);
        assert_eq!(order_schema().globals().len(), 1);
    }
}
