//! `wavetrace replay`: walk the timeline with a forward cursor.
//!
//! Prints a snapshot of the selected signals at the window start, then one
//! line per change for every later timestamp inside the window:
//!
//! ```text
//! 0 ns  top.count = 0
//! 10 ns  top.count = 1
//! ```

use std::io::{self, Write};
use std::path::Path;

use wavetrace_config::{resolve_replay, ReplayOverrides, ResolvedReplay, TraceConfig};
use wavetrace_replay::{grouped_timestamps, ReplayCursor, ReplayError};
use wavetrace_vcd::{load_vcd_file, Waveform};

use crate::{GlobalArgs, ReplayArgs};

/// Runs the `wavetrace replay` command.
pub fn run(
    args: &ReplayArgs,
    config: &TraceConfig,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let window = resolve_replay(
        &config.replay,
        &ReplayOverrides {
            signals: args.signals.clone(),
            start_ns: args.from,
            end_ns: args.to,
        },
    )?;
    let waveform = load_vcd_file(Path::new(&args.file), &config.decode.to_options())?;
    if !global.quiet && !waveform.diagnostics().is_empty() {
        eprintln!(
            "warning: skipped {} malformed line(s) in {}",
            waveform.diagnostics().len(),
            args.file
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    replay_to(&waveform, &window, &mut out)?;
    out.flush()?;
    Ok(0)
}

/// Writes the replay transcript for `window` to `out`.
fn replay_to(
    waveform: &Waveform,
    window: &ResolvedReplay,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut selected = vec![window.signals.is_empty(); waveform.signals().len()];
    for name in &window.signals {
        let idx = waveform
            .find_signal_index(name)
            .ok_or_else(|| ReplayError::SignalNotFound { name: name.clone() })?;
        selected[idx] = true;
    }

    let mut cursor = ReplayCursor::new(waveform);
    cursor.advance_to(window.start_ns)?;
    for ((signal, value), _) in cursor
        .current_values()
        .zip(&selected)
        .filter(|(_, keep)| **keep)
    {
        writeln!(out, "{} ns  {} = {}", window.start_ns, signal.full_path(), value)?;
    }

    let timestamps = grouped_timestamps(waveform)
        .skip_while(|&t| t <= window.start_ns)
        .take_while(|&t| window.contains(t));
    for t in timestamps {
        for change in cursor.advance_to(t)? {
            let Some(idx) = waveform.signal_index(&change.identifier) else {
                continue;
            };
            if selected[idx] {
                let path = waveform.signals()[idx].full_path();
                writeln!(out, "{t} ns  {path} = {}", change.value)?;
            }
        }
    }
    tracing::debug!(
        position = cursor.position(),
        exhausted = cursor.is_exhausted(),
        "replay finished"
    );
    Ok(())
}
