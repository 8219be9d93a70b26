//! # Veritas Core
//!
//! Core types shared by every Veritas crate.
//!
//! This crate provides the foundational types used throughout Veritas:
//!
//! - [`Value`] / [`Params`] - Typed values produced by coercion
//! - [`Input`] - The raw request buckets (`auto`, `path`, `body`, `query`)
//! - [`Source`] / [`KeyPolicy`] - Where a parameter is read from and how names are checked
//! - [`ErrorEntry`] / [`ErrorCode`] - The public, path-qualified error record
//! - [`ParamError`] - The tagged per-parameter error the formatter consumes
//! - [`ConfigError`] - Fatal schema construction errors

#![doc(html_root_url = "https://docs.rs/veritas-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod input;
mod value;

pub use error::{
    ConfigError, ConfigResult, ErrorCode, ErrorEntry, ErrorPayload, ParamError, INVALID_INPUT,
    MESSAGE_PREFIX, REQUIRED,
};
pub use input::{Input, KeyPolicy, RawMap, Source};
pub use value::{Params, Value};
