//! # Veritas Config
//!
//! Typed configuration for Veritas, loaded in layers:
//!
//! 1. Defaults
//! 2. A TOML or JSON file
//! 3. Environment variables (`VERITAS__ENGINE__MAX_DEPTH=16`)
//!
//! Unknown fields are rejected.
//!
//! ```toml
//! [engine]
//! key_policy = "string"        # or "atom"
//! collapse_single_error = true
//! max_depth = 32
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"              # or "pretty"
//! include_location = false
//! ```

#![doc(html_root_url = "https://docs.rs/veritas-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{EngineSection, LoggingSection, VeritasConfig};
pub use error::ConfigFileError;
pub use loader::ConfigLoader;
