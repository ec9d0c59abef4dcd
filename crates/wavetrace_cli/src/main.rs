//! wavetrace CLI: inspect, query and replay Value Change Dump files.
//!
//! Provides `wavetrace info` for a summary of a dump, `wavetrace value` for a
//! single point-in-time lookup, and `wavetrace replay` for walking the
//! timeline step by step.

#![warn(missing_docs)]

mod info;
mod replay;
mod settings;
mod value;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// wavetrace: replay recorded signal waveforms.
#[derive(Parser, Debug)]
#[command(name = "wavetrace", version, about = "VCD waveform replay toolkit")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `wavetrace.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Fail on the first malformed line instead of skipping it.
    #[arg(long, global = true)]
    pub strict: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize a VCD file.
    Info(InfoArgs),
    /// Print the value of one signal at a point in time.
    Value(ValueArgs),
    /// Replay a VCD file, printing changes per timestamp.
    Replay(ReplayArgs),
}

/// Arguments for the `wavetrace info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// VCD file to read.
    pub file: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `wavetrace value` subcommand.
#[derive(Parser, Debug)]
pub struct ValueArgs {
    /// VCD file to read.
    pub file: String,

    /// Signal full path or short name.
    pub signal: String,

    /// Query time in nanoseconds.
    pub time_ns: f64,
}

/// Arguments for the `wavetrace replay` subcommand.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// VCD file to read.
    pub file: String,

    /// Signals to report (repeatable). Defaults to `[replay] signals`, or all.
    #[arg(short, long = "signal")]
    pub signals: Vec<String>,

    /// First timestamp to report, in nanoseconds.
    #[arg(long)]
    pub from: Option<f64>,

    /// Last timestamp to report, in nanoseconds.
    #[arg(long)]
    pub to: Option<f64>,
}

/// Summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a settings file or its directory.
    pub config: Option<String>,
    /// Force strict decoding regardless of the settings file.
    pub strict: bool,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
        strict: cli.strict,
    };

    let config = match settings::load_settings(&global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    init_logging(settings::log_directive(&global, &config));

    let result = match cli.command {
        Command::Info(ref args) => info::run(args, &config),
        Command::Value(ref args) => value::run(args, &config),
        Command::Replay(ref args) => replay::run(args, &config, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
