//! Error types for Veritas.
//!
//! Two families live here:
//!
//! - [`ConfigError`] - fatal, raised once while a schema is being built
//! - [`ParamError`] / [`ErrorEntry`] - recoverable, accumulated per request
//!
//! # Per-request errors
//!
//! | Stage | `ParamError` | Public `ErrorEntry` |
//! |---|---|---|
//! | Coercion | `Coercion(reason)` | `param = name` |
//! | Validation | `Validation(reason)` | `param = name` |
//! | Nested schema | `Nested(entries)` | `param = parent.child` |
//! | Global validators | `Global(reasons)` | no `param` |
//!
//! Whatever the stage, callers see the same `ErrorEntry` shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reason reported when a required parameter resolves to `null`.
pub const REQUIRED: &str = "required";

/// Reason reported when a value does not have the expected mapping/sequence shape.
pub const INVALID_INPUT: &str = "invalid";

/// Prefix of every public error message.
pub const MESSAGE_PREFIX: &str = "Validation error: ";

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal schema configuration errors.
///
/// These surface while a schema is built (typically at startup) and never
/// while validating a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A parameter references a type that is not registered.
    #[error("parameter '{param}' references unknown type '{type_name}'")]
    UnresolvedType {
        /// The parameter declaring the type.
        param: String,
        /// The unresolved type name.
        type_name: String,
    },

    /// A parameter's type exists but cannot be used in that position.
    #[error("parameter '{param}' uses unsupported type '{type_name}': {reason}")]
    UnsupportedType {
        /// The parameter declaring the type.
        param: String,
        /// The rejected type.
        type_name: String,
        /// Why it cannot be used.
        reason: String,
    },

    /// Two parameters share a name.
    #[error("duplicate parameter '{name}'")]
    DuplicateParam {
        /// The repeated name.
        name: String,
    },

    /// A parameter has more than one validator configured.
    #[error("parameter '{param}' configures more than one validator ({first} and {second})")]
    ConflictingValidators {
        /// The parameter.
        param: String,
        /// The validator configured first.
        first: String,
        /// The validator configured second.
        second: String,
    },

    /// A format pattern does not compile.
    #[error("parameter '{param}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The parameter.
        param: String,
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A builtin constraint has nothing to check.
    #[error("parameter '{param}' has an empty {constraint} constraint")]
    EmptyConstraint {
        /// The parameter.
        param: String,
        /// Which builtin (e.g. "numericality").
        constraint: String,
    },

    /// A parameter name is not acceptable.
    #[error("invalid parameter name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Public error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The value was present but wrong.
    Invalid,
    /// A required value was absent.
    Missing,
}

impl ErrorCode {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Missing => "MISSING",
        }
    }

    /// Classifies a reason: `MISSING` iff it is exactly [`REQUIRED`].
    #[must_use]
    pub fn for_reason(reason: &str) -> Self {
        if reason == REQUIRED {
            Self::Missing
        } else {
            Self::Invalid
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A public, path-qualified error record.
///
/// # Example
///
/// ```
/// use veritas_core::{ErrorCode, ErrorEntry};
///
/// let entry = ErrorEntry::for_param("age", "required");
/// assert_eq!(entry.param.as_deref(), Some("age"));
/// assert_eq!(entry.message, "Validation error: required");
/// assert_eq!(entry.error_code, ErrorCode::Missing);
///
/// let json = serde_json::to_value(&ErrorEntry::global("dates overlap")).unwrap();
/// assert_eq!(
///     json,
///     serde_json::json!({"message": "Validation error: dates overlap", "error_code": "INVALID"})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Path of the offending parameter; absent for cross-parameter errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Human-readable message, always prefixed with [`MESSAGE_PREFIX`].
    pub message: String,
    /// Classification.
    pub error_code: ErrorCode,
}

impl ErrorEntry {
    /// Creates an entry for a named parameter, classifying the reason.
    #[must_use]
    pub fn for_param(param: impl Into<String>, reason: &str) -> Self {
        Self {
            param: Some(param.into()),
            message: format!("{MESSAGE_PREFIX}{reason}"),
            error_code: ErrorCode::for_reason(reason),
        }
    }

    /// Creates a parameter-less entry for a cross-parameter error.
    #[must_use]
    pub fn global(reason: &str) -> Self {
        Self {
            param: None,
            message: format!("{MESSAGE_PREFIX}{reason}"),
            error_code: ErrorCode::Invalid,
        }
    }

    /// Creates the entry reported when the top-level input has the wrong shape.
    #[must_use]
    pub fn invalid_input() -> Self {
        Self::global(INVALID_INPUT)
    }

    /// Returns the message without [`MESSAGE_PREFIX`].
    #[must_use]
    pub fn reason(&self) -> &str {
        self.message
            .strip_prefix(MESSAGE_PREFIX)
            .unwrap_or(&self.message)
    }

    /// Returns a copy whose `param` is replaced.
    #[must_use]
    pub fn with_param(mut self, param: Option<String>) -> Self {
        self.param = param;
        self
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{param}: {} ({})", self.message, self.error_code),
            None => write!(f, "{} ({})", self.message, self.error_code),
        }
    }
}

/// The per-parameter (or parameter-less) error the formatter consumes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// Raw value could not be converted (including `"required"`).
    #[error("{0}")]
    Coercion(String),

    /// Coerced value was rejected by its validator.
    #[error("{0}")]
    Validation(String),

    /// Cross-parameter validator reasons, in the order they were raised.
    #[error("{}", .0.join("; "))]
    Global(Vec<String>),

    /// Errors of a nested schema, still structured.
    ///
    /// Paths are relative to the parameter; an entry under an array of
    /// nested schemas starts with its `[index]`.
    #[error("{} nested error(s)", .0.len())]
    Nested(Vec<ErrorEntry>),
}

impl ParamError {
    /// Returns the single reason for coercion and validation errors.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Coercion(reason) | Self::Validation(reason) => Some(reason),
            Self::Global(_) | Self::Nested(_) => None,
        }
    }

    /// Returns true if this reports a missing required value.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.reason() == Some(REQUIRED)
    }
}

/// The failure body handed to a renderer.
///
/// By convention a single error is sent as a bare record rather than a
/// one-element list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    /// Exactly one error.
    One(ErrorEntry),
    /// Any number of errors.
    Many(Vec<ErrorEntry>),
}

impl ErrorPayload {
    /// Builds a payload, collapsing a single entry when `collapse_single` is set.
    #[must_use]
    pub fn from_entries(mut entries: Vec<ErrorEntry>, collapse_single: bool) -> Self {
        if collapse_single && entries.len() == 1 {
            if let Some(entry) = entries.pop() {
                return Self::One(entry);
            }
        }
        Self::Many(entries)
    }

    /// Returns the entries regardless of shape.
    #[must_use]
    pub fn entries(&self) -> &[ErrorEntry] {
        match self {
            Self::One(entry) => std::slice::from_ref(entry),
            Self::Many(entries) => entries,
        }
    }
}
