//! Configuration types deserialized from `wavetrace.toml`.
//!
//! Every section and field is optional; an empty file yields
//! [`TraceConfig::default()`].

use serde::{Deserialize, Serialize};
use wavetrace_vcd::DecodeOptions;

/// The top-level settings parsed from `wavetrace.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TraceConfig {
    /// Decoder settings.
    #[serde(default)]
    pub decode: DecodeConfig,
    /// Replay window and signal selection.
    #[serde(default)]
    pub replay: ReplayConfig,
    /// Logging defaults.
    #[serde(default)]
    pub log: LogConfig,
}

/// The `[decode]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DecodeConfig {
    /// Fail on the first malformed line instead of skipping it.
    #[serde(default)]
    pub strict: bool,
}

impl DecodeConfig {
    /// Decoder options equivalent to this section.
    pub fn to_options(&self) -> DecodeOptions {
        DecodeOptions {
            strict: self.strict,
        }
    }
}

/// The `[replay]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReplayConfig {
    /// Signals to report, by full path or short name. Empty means all.
    #[serde(default)]
    pub signals: Vec<String>,
    /// First timestamp to report, in nanoseconds.
    #[serde(default)]
    pub start_ns: f64,
    /// Last timestamp to report, in nanoseconds. Unbounded when absent.
    #[serde(default)]
    pub end_ns: Option<f64>,
}

/// The `[log]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default verbosity when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: LogLevel,
}

/// Log verbosity names accepted in `[log] level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-signal decode events.
    Trace,
    /// Phase transitions and summaries.
    Debug,
    /// Normal operation.
    Info,
    /// Skipped lines and other recoverable problems.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// The name as written in the file, usable as a filter directive.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
