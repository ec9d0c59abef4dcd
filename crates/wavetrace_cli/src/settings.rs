//! Settings discovery: `--config`, then `./wavetrace.toml`, then defaults.

use std::path::{Path, PathBuf};

use wavetrace_config::{load_config, load_config_file, TraceConfig, CONFIG_FILE_NAME};

use crate::GlobalArgs;

/// Loads the effective settings and applies global flag overrides.
///
/// An explicit `--config` must exist; the implicit `wavetrace.toml` in the
/// working directory is optional.
pub fn load_settings(global: &GlobalArgs) -> Result<TraceConfig, Box<dyn std::error::Error>> {
    let mut config = match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                load_config(&p)?
            } else {
                load_config_file(&p)?
            }
        }
        None => load_optional(&std::env::current_dir()?)?,
    };
    if global.strict {
        config.decode.strict = true;
    }
    Ok(config)
}

fn load_optional(dir: &Path) -> Result<TraceConfig, Box<dyn std::error::Error>> {
    if dir.join(CONFIG_FILE_NAME).is_file() {
        Ok(load_config(dir)?)
    } else {
        Ok(TraceConfig::default())
    }
}

/// Filter directive for the subscriber: flags beat `[log] level`.
pub fn log_directive(global: &GlobalArgs, config: &TraceConfig) -> &'static str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        config.log.level.as_str()
    }
}
