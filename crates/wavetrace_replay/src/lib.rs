//! Replay engine for decoded VCD waveforms.
//!
//! Two ways to read a [`Waveform`](wavetrace_vcd::Waveform) back:
//!
//! - **Stateless queries**: [`value_at`], [`changes_at`],
//!   [`grouped_timestamps`] and [`steps`] answer from the waveform alone and
//!   give the same result whatever was asked before.
//! - **Forward cursors**: a [`ReplayCursor`] applies each change exactly
//!   once as it moves forward, keeping a live value per signal that can be
//!   handed out read-only as a [`SignalView`].
//!
//! A host that drives clocked observers walks [`grouped_timestamps`] (or
//! [`steps`]), advances its cursor to each instant, and runs its own
//! processes against the view. The engine never calls back into the host.
//!
//! # Usage
//!
//! ```
//! use wavetrace_replay::{grouped_timestamps, ReplayCursor};
//! use wavetrace_vcd::{decode_str, DecodeOptions};
//!
//! let vcd = "$var reg 8 ! count $end\n$enddefinitions $end\n#10\nb1 !\n#20\nb10 !\n";
//! let waveform = decode_str(vcd, &DecodeOptions::default()).unwrap();
//! let mut cursor = ReplayCursor::new(&waveform);
//! for t in grouped_timestamps(&waveform) {
//!     cursor.advance_to(t).unwrap();
//! }
//! let count = cursor.view().get("count").unwrap();
//! assert_eq!(count.to_u64(), Some(2));
//! ```

#![warn(missing_docs)]

pub mod cursor;
pub mod error;
pub mod query;

pub use cursor::{ReplayCursor, SignalView};
pub use error::ReplayError;
pub use query::{changes_at, grouped_timestamps, steps, value_at, Step, Steps, Timestamps};
