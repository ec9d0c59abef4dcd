//! Value Change Dump decoder for the wavetrace replay toolkit.
//!
//! This crate reads IEEE 1800-2017 VCD text and produces an immutable
//! [`Waveform`]: the signal declarations with their scope hierarchy, the
//! timescale, the `$dumpvars` initial values and the time-ordered log of
//! value changes normalized to nanoseconds.
//!
//! Decoding is tolerant by default. Real generators disagree on the fine
//! points of the grammar, so a malformed line is skipped and recorded as a
//! [`Diagnostic`] rather than failing the whole file. Pass
//! [`DecodeOptions::strict()`] to turn the first such line into an error.
//!
//! # Usage
//!
//! ```
//! use wavetrace_vcd::{decode_str, DecodeOptions};
//!
//! let vcd = "$timescale 1 us $end\n$var wire 1 ! clk $end\n$enddefinitions $end\n#10\n1!\n";
//! let waveform = decode_str(vcd, &DecodeOptions::default()).unwrap();
//! assert_eq!(waveform.changes()[0].time_ns, 10_000.0);
//! ```
//!
//! # Modules
//!
//! - `decoder`: two-phase header/data parser and file loading
//! - `value`: arbitrary-width values and record dispatch (`b`, `r`, scalar)
//! - `timescale`: `$timescale` parsing and nanosecond conversion
//! - `signal`: signal declarations and change records
//! - `waveform`: the decoded aggregate and its indexes
//! - `error`: fatal errors and tolerant-mode diagnostics

#![warn(missing_docs)]

pub mod decoder;
pub mod error;
pub mod signal;
pub mod timescale;
pub mod value;
pub mod waveform;

pub use decoder::{decode_reader, decode_str, load_vcd_file, DecodeOptions};
pub use error::{DecodeError, Diagnostic, DiagnosticKind};
pub use signal::{Signal, ValueChange, VarKind};
pub use timescale::{TimeUnit, Timescale};
pub use value::{decode_value_change, SignalValue};
pub use waveform::Waveform;
