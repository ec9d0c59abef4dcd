//! Parsing and validation of `wavetrace.toml` settings files.
//!
//! This crate reads the optional settings file and produces a strongly-typed
//! [`TraceConfig`] covering decoder strictness, the replay window and signal
//! selection, and the default log level. Command-line flags are layered on
//! top with [`resolve_replay`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_replay, ReplayOverrides, ResolvedReplay};
pub use types::*;
