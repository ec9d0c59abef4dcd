//! Replay resolution: layering command-line flags over `[replay]`.

use crate::error::ConfigError;
use crate::loader::validate_window;
use crate::types::ReplayConfig;

/// Flag values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayOverrides {
    /// Replaces the configured signal list when non-empty.
    pub signals: Vec<String>,
    /// Replaces `start_ns` when set.
    pub start_ns: Option<f64>,
    /// Replaces `end_ns` when set.
    pub end_ns: Option<f64>,
}

/// The effective replay window and selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReplay {
    /// Signals to report; empty means all.
    pub signals: Vec<String>,
    /// First reported timestamp in nanoseconds.
    pub start_ns: f64,
    /// Last reported timestamp in nanoseconds, if bounded.
    pub end_ns: Option<f64>,
}

impl ResolvedReplay {
    /// Whether `time_ns` falls inside the window.
    pub fn contains(&self, time_ns: f64) -> bool {
        time_ns >= self.start_ns && self.end_ns.map_or(true, |end| time_ns <= end)
    }
}

/// Merges flag overrides onto the configured replay section and revalidates
/// the resulting window.
pub fn resolve_replay(
    config: &ReplayConfig,
    overrides: &ReplayOverrides,
) -> Result<ResolvedReplay, ConfigError> {
    let signals = if overrides.signals.is_empty() {
        config.signals.clone()
    } else {
        overrides.signals.clone()
    };
    let start_ns = overrides.start_ns.unwrap_or(config.start_ns);
    let end_ns = overrides.end_ns.or(config.end_ns);
    validate_window(start_ns, end_ns)?;
    Ok(ResolvedReplay {
        signals,
        start_ns,
        end_ns,
    })
}
