//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::TraceConfig;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "wavetrace.toml";

/// Loads and validates `wavetrace.toml` from a directory.
pub fn load_config(dir: &Path) -> Result<TraceConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a settings file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<TraceConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates settings from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TraceConfig, ConfigError> {
    let config: TraceConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that the replay window is well formed.
fn validate_config(config: &TraceConfig) -> Result<(), ConfigError> {
    validate_window(config.replay.start_ns, config.replay.end_ns)
}

/// Shared by the loader and by flag overrides in [`crate::resolve`].
pub(crate) fn validate_window(start_ns: f64, end_ns: Option<f64>) -> Result<(), ConfigError> {
    if !start_ns.is_finite() || start_ns < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "replay.start_ns must be a finite value >= 0, got {start_ns}"
        )));
    }
    if let Some(end_ns) = end_ns {
        if end_ns.is_nan() || end_ns < start_ns {
            return Err(ConfigError::ValidationError(format!(
                "replay.end_ns ({end_ns}) must not be before replay.start_ns ({start_ns})"
            )));
        }
    }
    Ok(())
}
