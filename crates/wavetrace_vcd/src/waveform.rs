//! The decoded waveform model.
//!
//! A [`Waveform`] owns every [`Signal`], the initial-value table and the
//! chronologically ordered change log. It is built once by the decoder and
//! is read-only afterwards, so any number of replay cursors may borrow it
//! concurrently.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Diagnostic;
use crate::signal::{Signal, ValueChange};
use crate::timescale::Timescale;
use crate::value::SignalValue;

/// A fully decoded VCD file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Waveform {
    pub(crate) timescale: Timescale,
    pub(crate) date: Option<String>,
    pub(crate) version: Option<String>,
    /// Signals in declaration order, one per identifier.
    pub(crate) signals: Vec<Signal>,
    #[serde(skip)]
    pub(crate) by_identifier: HashMap<String, usize>,
    #[serde(skip)]
    pub(crate) by_path: HashMap<String, usize>,
    pub(crate) initial_values: HashMap<String, SignalValue>,
    pub(crate) changes: Vec<ValueChange>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Waveform {
    /// The declared timescale (1 ns when absent or unparseable).
    pub fn timescale(&self) -> Timescale {
        self.timescale
    }

    /// Nanoseconds per file time unit.
    pub fn timescale_ns(&self) -> f64 {
        self.timescale.ns_per_unit()
    }

    /// Body of the `$date` section, if any.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Body of the `$version` section, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// All signals in declaration order.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Looks up a signal by its identifier code.
    pub fn signal(&self, identifier: &str) -> Option<&Signal> {
        self.by_identifier.get(identifier).map(|&i| &self.signals[i])
    }

    /// Looks up a signal by its full dotted path (`top.child.clk`).
    pub fn signal_by_path(&self, path: &str) -> Option<&Signal> {
        self.by_path.get(path).map(|&i| &self.signals[i])
    }

    /// Resolves a user-supplied name.
    ///
    /// A full path wins; otherwise the first declared signal with that short
    /// name is returned.
    pub fn find_signal(&self, name: &str) -> Option<&Signal> {
        self.find_signal_index(name).map(|i| &self.signals[i])
    }

    /// Position in [`signals`](Self::signals) of the signal owning `identifier`.
    pub fn signal_index(&self, identifier: &str) -> Option<usize> {
        self.by_identifier.get(identifier).copied()
    }

    /// Position of the signal [`find_signal`](Self::find_signal) would return.
    pub fn find_signal_index(&self, name: &str) -> Option<usize> {
        self.by_path
            .get(name)
            .copied()
            .or_else(|| self.signals.iter().position(|s| s.name == name))
    }

    /// Value established by `$dumpvars`, if the signal appeared there.
    pub fn initial_value(&self, identifier: &str) -> Option<&SignalValue> {
        self.initial_values.get(identifier)
    }

    /// The whole initial-value table, keyed by identifier.
    pub fn initial_values(&self) -> &HashMap<String, SignalValue> {
        &self.initial_values
    }

    /// The change log in non-decreasing time order.
    pub fn changes(&self) -> &[ValueChange] {
        &self.changes
    }

    /// Lines skipped by the tolerant decoder.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Time of the last recorded change, or 0 for an empty log.
    pub fn end_time_ns(&self) -> f64 {
        self.changes.last().map_or(0.0, |c| c.time_ns)
    }

    /// Registers a declaration.
    ///
    /// The first declaration of an identifier owns the signal; later ones are
    /// aliases reachable only through the path index.
    pub(crate) fn declare(&mut self, signal: Signal) {
        let path = signal.full_path();
        let idx = match self.by_identifier.get(&signal.identifier) {
            Some(&idx) => {
                tracing::debug!(
                    identifier = %signal.identifier,
                    alias = %path,
                    "identifier re-declared; registering alias"
                );
                idx
            }
            None => {
                let idx = self.signals.len();
                self.by_identifier.insert(signal.identifier.clone(), idx);
                self.signals.push(signal);
                idx
            }
        };
        self.by_path.insert(path, idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::VarKind;

    fn sig(id: &str, name: &str, scope: &str) -> Signal {
        Signal {
            identifier: id.into(),
            name: name.into(),
            width: 1,
            scope_path: scope.into(),
            kind: VarKind::Wire,
        }
    }

    #[test]
    fn declare_indexes_identifier_and_path() {
        let mut wf = Waveform::default();
        wf.declare(sig("!", "clk", "top"));
        assert_eq!(wf.signal("!").unwrap().name, "clk");
        assert_eq!(wf.signal_by_path("top.clk").unwrap().identifier, "!");
        assert!(wf.signal_by_path("clk").is_none());
    }

    #[test]
    fn alias_keeps_first_declaration() {
        let mut wf = Waveform::default();
        wf.declare(sig("!", "clk", "top"));
        wf.declare(sig("!", "clk_in", "top.child"));
        assert_eq!(wf.signals().len(), 1);
        assert_eq!(wf.signal("!").unwrap().name, "clk");
        assert_eq!(wf.signal_by_path("top.child.clk_in").unwrap().name, "clk");
    }

    #[test]
    fn find_signal_prefers_full_path() {
        let mut wf = Waveform::default();
        wf.declare(sig("!", "clk", "top.a"));
        wf.declare(sig("\"", "clk", "top.b"));
        assert_eq!(wf.find_signal("top.b.clk").unwrap().identifier, "\"");
        // Ambiguous short name resolves to the first declaration.
        assert_eq!(wf.find_signal("clk").unwrap().identifier, "!");
        assert!(wf.find_signal("missing").is_none());
    }

    #[test]
    fn end_time_of_empty_log() {
        assert_eq!(Waveform::default().end_time_ns(), 0.0);
    }
}
