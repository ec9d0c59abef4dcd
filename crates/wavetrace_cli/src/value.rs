//! `wavetrace value`: one stateless lookup.

use std::path::Path;

use wavetrace_config::TraceConfig;
use wavetrace_replay::value_at;
use wavetrace_vcd::load_vcd_file;

use crate::ValueArgs;

/// Runs the `wavetrace value` command, printing the value in decimal.
pub fn run(args: &ValueArgs, config: &TraceConfig) -> Result<i32, Box<dyn std::error::Error>> {
    let waveform = load_vcd_file(Path::new(&args.file), &config.decode.to_options())?;
    let value = value_at(&waveform, &args.signal, args.time_ns)?;
    tracing::debug!(signal = %args.signal, time_ns = args.time_ns, %value, "query");
    println!("{value}");
    Ok(0)
}
