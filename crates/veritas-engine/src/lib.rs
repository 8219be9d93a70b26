//! # Veritas Engine
//!
//! Runs [`veritas_schema::Schema`]s against raw request input.
//!
//! For each invocation the engine:
//!
//! 1. **Extracts** every parameter from its bucket, applying defaults
//! 2. **Coerces** raw values to typed [`veritas_core::Value`]s, recursing into nested schemas
//! 3. **Validates** coerced, non-null values with the parameter's validator
//! 4. **Runs global validators** only if every parameter is clean
//! 5. **Formats** errors into path-qualified [`veritas_core::ErrorEntry`] records
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use veritas_core::Input;
//! use veritas_engine::SchemaExt;
//! use veritas_schema::fixtures;
//!
//! let order = fixtures::order_schema();
//! let input = Input::new()
//!     .with_path(json!({"id": "17"}).as_object().cloned().unwrap())
//!     .with_body(json!({"items": [{"x": "sku-1"}, {}]}).as_object().cloned().unwrap());
//!
//! let outcome = order.validate(&input);
//! assert_eq!(outcome.errors()[0].param.as_deref(), Some("items[1].x"));
//! ```

#![doc(html_root_url = "https://docs.rs/veritas-engine/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binding;
mod engine;
mod extract;
mod format;
mod globals;
mod outcome;
mod pipeline;

pub use binding::{bind, validate_value, SchemaExt};
pub use engine::{Engine, EngineConfig, DEFAULT_MAX_DEPTH};
pub use outcome::Outcome;
pub use pipeline::NESTING_TOO_DEEP;
