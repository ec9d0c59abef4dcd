//! `wavetrace info`: summary of a decoded dump.

use std::fmt::Write as _;
use std::path::Path;

use wavetrace_config::TraceConfig;
use wavetrace_replay::grouped_timestamps;
use wavetrace_vcd::{load_vcd_file, Waveform};

use crate::{InfoArgs, ReportFormat};

/// Runs the `wavetrace info` command.
///
/// Returns exit code 0; decode failures propagate as errors.
pub fn run(args: &InfoArgs, config: &TraceConfig) -> Result<i32, Box<dyn std::error::Error>> {
    let waveform = load_vcd_file(Path::new(&args.file), &config.decode.to_options())?;
    let report = match args.format {
        ReportFormat::Text => render_text(&waveform),
        ReportFormat::Json => serde_json::to_string_pretty(&render_json(&waveform))?,
    };
    println!("{report}");
    Ok(0)
}

/// Human-readable summary.
fn render_text(waveform: &Waveform) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "timescale: {}", waveform.timescale());
    if let Some(date) = waveform.date() {
        let _ = writeln!(out, "date:      {date}");
    }
    if let Some(version) = waveform.version() {
        let _ = writeln!(out, "version:   {version}");
    }

    let _ = writeln!(out, "signals:   {}", waveform.signals().len());
    let path_width = waveform
        .signals()
        .iter()
        .map(|s| s.full_path().len())
        .max()
        .unwrap_or(0);
    for signal in waveform.signals() {
        let _ = writeln!(
            out,
            "  {:<path_width$}  {:<9} {:>4}  {}",
            signal.full_path(),
            signal.kind.to_string(),
            signal.width,
            signal.identifier,
        );
    }

    let _ = writeln!(
        out,
        "changes:   {} at {} timestamps, last at {} ns",
        waveform.changes().len(),
        grouped_timestamps(waveform).count(),
        waveform.end_time_ns()
    );

    let _ = write!(out, "skipped:   {}", waveform.diagnostics().len());
    for diagnostic in waveform.diagnostics() {
        let _ = write!(out, "\n  {diagnostic}");
    }
    out
}

/// Machine-readable summary.
fn render_json(waveform: &Waveform) -> serde_json::Value {
    serde_json::json!({
        "timescale": waveform.timescale(),
        "date": waveform.date(),
        "version": waveform.version(),
        "signals": waveform.signals(),
        "changes": waveform.changes().len(),
        "timestamps": grouped_timestamps(waveform).count(),
        "end_time_ns": waveform.end_time_ns(),
        "diagnostics": waveform.diagnostics(),
    })
}
