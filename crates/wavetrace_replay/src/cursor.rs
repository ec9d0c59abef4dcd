//! Forward-only replay cursor and its read-only value view.
//!
//! A [`ReplayCursor`] borrows a [`Waveform`] and keeps only an index into the
//! change log plus one value per signal. Advancing applies each change once,
//! so walking a whole timeline costs O(total changes) instead of one
//! [`value_at`](crate::value_at) scan per timestamp.

use wavetrace_vcd::{Signal, SignalValue, ValueChange, Waveform};

use crate::error::ReplayError;
use crate::query::{split_step, Step};

/// Value of a signal with neither a `$dumpvars` entry nor a change yet.
static ZERO: SignalValue = SignalValue::zero();

/// A forward-only position in a waveform's change log.
///
/// Cursors never mutate the waveform; any number of them may replay the same
/// waveform independently, including from different threads.
#[derive(Clone, Debug)]
pub struct ReplayCursor<'w> {
    waveform: &'w Waveform,
    /// Index of the first change not yet applied.
    position: usize,
    /// Current value of each signal, parallel to `waveform.signals()`,
    /// borrowed from the waveform's initial-value table or change log.
    values: Vec<&'w SignalValue>,
    /// Time of the last successful advance.
    time_ns: Option<f64>,
}

impl<'w> ReplayCursor<'w> {
    /// Creates a cursor positioned before the first change, with every signal
    /// at its `$dumpvars` value or 0.
    pub fn new(waveform: &'w Waveform) -> Self {
        let values = waveform
            .signals()
            .iter()
            .map(|s| waveform.initial_value(&s.identifier).unwrap_or(&ZERO))
            .collect();
        Self {
            waveform,
            position: 0,
            values,
            time_ns: None,
        }
    }

    /// The waveform this cursor replays.
    pub fn waveform(&self) -> &'w Waveform {
        self.waveform
    }

    /// Applies every pending change with `time_ns <= time_ns`.
    ///
    /// Returns the changes applied by this call, which is empty when repeating
    /// the previous time.
    ///
    /// # Errors
    ///
    /// [`ReplayError::OutOfOrderAdvance`] if `time_ns` is earlier than a
    /// previous advance; [`ReplayError::InvalidTime`] for NaN. The cursor is
    /// left unchanged on error.
    pub fn advance_to(&mut self, time_ns: f64) -> Result<&'w [ValueChange], ReplayError> {
        if time_ns.is_nan() {
            return Err(ReplayError::InvalidTime(time_ns));
        }
        if let Some(current_ns) = self.time_ns {
            if time_ns < current_ns {
                return Err(ReplayError::OutOfOrderAdvance {
                    requested_ns: time_ns,
                    current_ns,
                });
            }
        }
        let waveform = self.waveform;
        let pending = &waveform.changes()[self.position..];
        let count = pending.partition_point(|c| c.time_ns <= time_ns);
        let applied = &pending[..count];
        self.apply(applied);
        self.time_ns = Some(time_ns);
        Ok(applied)
    }

    /// Advances to the next distinct timestamp and returns its batch, or
    /// `None` once the log is exhausted.
    pub fn next_step(&mut self) -> Option<Step<'w>> {
        let waveform = self.waveform;
        let (step, _) = split_step(&waveform.changes()[self.position..])?;
        self.apply(step.changes);
        self.time_ns = Some(step.time_ns);
        Some(step)
    }

    fn apply(&mut self, changes: &'w [ValueChange]) {
        for change in changes {
            // Changes to undeclared identifiers are logged but drive nothing.
            if let Some(idx) = self.waveform.signal_index(&change.identifier) {
                self.values[idx] = &change.value;
            }
        }
        self.position += changes.len();
        tracing::trace!(
            applied = changes.len(),
            position = self.position,
            "cursor advanced"
        );
    }

    /// Index of the first change not yet applied.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Time of the last advance, or `None` before the first one.
    pub fn time_ns(&self) -> Option<f64> {
        self.time_ns
    }

    /// Whether every change in the log has been applied.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.waveform.changes().len()
    }

    /// Current value of a signal by full path or short name.
    pub fn get(&self, name: &str) -> Option<&'w SignalValue> {
        self.waveform
            .find_signal_index(name)
            .map(|idx| self.values[idx])
    }

    /// Bit width of a signal, 1 when the name is unknown.
    pub fn width(&self, name: &str) -> u32 {
        self.waveform.find_signal(name).map_or(1, |s| s.width)
    }

    /// Every declared signal with its current value, in declaration order.
    pub fn current_values(&self) -> impl Iterator<Item = (&'w Signal, &'w SignalValue)> + '_ {
        self.waveform
            .signals()
            .iter()
            .zip(self.values.iter().copied())
    }

    /// A read-only view of the current values.
    pub fn view(&self) -> SignalView<'_, 'w> {
        SignalView { cursor: self }
    }
}

/// Read-only access to a cursor's current signal values.
///
/// Hand this to code that should observe replayed signals without being able
/// to drive them: it has no mutating methods.
#[derive(Clone, Copy, Debug)]
pub struct SignalView<'c, 'w> {
    cursor: &'c ReplayCursor<'w>,
}

impl<'c, 'w> SignalView<'c, 'w> {
    /// Current value of a signal by full path or short name.
    pub fn get(&self, name: &str) -> Option<&'w SignalValue> {
        self.cursor.get(name)
    }

    /// Whether `name` resolves to a declared signal.
    pub fn contains(&self, name: &str) -> bool {
        self.cursor.waveform.find_signal_index(name).is_some()
    }

    /// Short names of all declared signals, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'w str> + 'c {
        let waveform: &'w Waveform = self.cursor.waveform;
        waveform.signals().iter().map(|s| s.name.as_str())
    }

    /// Number of declared signals.
    pub fn len(&self) -> usize {
        self.cursor.values.len()
    }

    /// Whether the waveform declares no signals.
    pub fn is_empty(&self) -> bool {
        self.cursor.values.is_empty()
    }

    /// Time of the underlying cursor.
    pub fn time_ns(&self) -> Option<f64> {
        self.cursor.time_ns
    }
}
