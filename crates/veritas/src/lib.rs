//! # Veritas
//!
//! Schema-driven coercion and validation of request parameters.
//!
//! Veritas turns an untyped key-value payload into a strongly-typed,
//! fully-checked mapping according to a declared schema, or into a list of
//! path-qualified errors.
//!
//! ## Crates
//!
//! - [`core`] - values, input buckets and error records
//! - [`schema`] - type registry, validators and the schema builder
//! - [`engine`] - extraction, coercion, validation and error formatting
//! - [`telemetry`] - logging setup and validation metrics
//! - [`config`] - layered configuration
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use veritas::prelude::*;
//!
//! let veritas = Veritas::default();
//!
//! let address = veritas
//!     .schema("address")
//!     .param(ParamDef::builder("country", TypeRef::string()).required())
//!     .build()
//!     .unwrap();
//!
//! let signup = veritas
//!     .schema("signup")
//!     .param(ParamDef::builder("age", TypeRef::integer()).numericality(Bounds::new().gte(18)))
//!     .param(ParamDef::builder("address", TypeRef::nested(address)).required())
//!     .build()
//!     .unwrap();
//!
//! let input = json!({"age": "17", "address": {}});
//! let outcome = veritas.validate_map(&signup, input.as_object().cloned().unwrap());
//!
//! let params: Vec<_> = outcome.errors().iter().map(|e| e.param.clone()).collect();
//! assert_eq!(
//!     params,
//!     vec![Some("age".to_string()), Some("address.country".to_string())]
//! );
//! ```

#![doc(html_root_url = "https://docs.rs/veritas/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod service;

pub use service::{Veritas, VeritasError, VeritasResult};

// Re-export crates
pub use veritas_config as config;
pub use veritas_core as core;
pub use veritas_engine as engine;
pub use veritas_schema as schema;
pub use veritas_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```
/// use veritas::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Veritas, VeritasError, VeritasResult};

    pub use veritas_core::{
        ErrorCode, ErrorEntry, ErrorPayload, Input, KeyPolicy, Params, Source, Value,
    };

    pub use veritas_schema::{
        validate_each, Bounds, ParamDef, Schema, SchemaBuilder, TypeRef, TypeRegistry,
    };

    pub use veritas_engine::{Engine, EngineConfig, Outcome, SchemaExt};

    pub use veritas_config::{ConfigLoader, VeritasConfig};
}
