//! # Veritas Schema
//!
//! Declarative, build-once schemas for request parameter validation.
//!
//! This crate provides:
//!
//! - [`TypeRegistry`] - Named coercers, with list coercers derived automatically
//! - [`TypeRef`] - The declared type of a parameter (scalar, list, nested schema)
//! - [`ParamDef`] / [`ParamBuilder`] - Parameter definitions
//! - [`Validator`] / [`Builtin`] / [`Bounds`] - Per-parameter validators
//! - [`Schema`] / [`SchemaBuilder`] - The immutable schema and its builder
//! - [`fixtures`] - Ready-made schemas for tests
//!
//! Schemas are inert descriptors; running them against input is the job of
//! `veritas-engine`.
//!
//! ## Example
//!
//! ```
//! use veritas_schema::{Bounds, ParamDef, Schema, TypeRef};
//!
//! let address = Schema::builder("address")
//!     .param(ParamDef::builder("country", TypeRef::string()).required())
//!     .build()
//!     .unwrap();
//!
//! let user = Schema::builder("user")
//!     .param(ParamDef::builder("age", TypeRef::integer()).numericality(Bounds::new().gte(0)))
//!     .param(ParamDef::builder("address", TypeRef::nested(address)))
//!     .global(|params| {
//!         if params.is_empty() {
//!             Err("nothing to do".to_string())
//!         } else {
//!             Ok(())
//!         }
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(user.params().len(), 2);
//! ```

#![doc(html_root_url = "https://docs.rs/veritas-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coerce;
pub mod fixtures;
mod param;
mod registry;
mod schema;
mod types;
mod validator;

pub use coerce::Coercer;
pub use param::{
    DefaultProvider, DefaultValue, NullaryProvider, ParamBuilder, ParamDef, UnaryProvider,
};
pub use registry::{names, TypeDef, TypeRegistry};
pub use schema::{GlobalFn, GlobalValidator, Schema, SchemaBuilder};
pub use types::{ResolvedType, TypeRef};
pub use validator::{validate_each, Bounds, Builtin, CustomFn, Validator};
