//! Decoder error and diagnostic types.
//!
//! Only an unreadable input is fatal by default. Every other malformed line
//! becomes a [`Diagnostic`] and is skipped; with
//! [`DecodeOptions::strict`](crate::DecodeOptions) the first one is raised as
//! [`DecodeError::Strict`] instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;

/// Errors that abort decoding.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The VCD file could not be opened.
    #[error("cannot read '{}': {source}", path.display())]
    FileUnreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Reading from the input stream failed part-way through.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A malformed construct was found while decoding in strict mode.
    #[error("line {line}: {kind}")]
    Strict {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        kind: DiagnosticKind,
    },
}

/// The kind of malformed input a tolerant decode skipped over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A `$var` declaration with missing fields.
    MalformedVar(String),
    /// A `$var` width that is not a positive integer.
    InvalidWidth(String),
    /// A `$timescale` body that could not be parsed; the default was kept.
    InvalidTimescale(String),
    /// A `#` marker whose time is not an unsigned integer.
    InvalidTimestamp(String),
    /// A `#` marker earlier than the current time. The marker is ignored,
    /// so the changes after it are retimed to the current time.
    BackwardsTimestamp {
        /// The rejected marker, e.g. `#5`.
        marker: String,
        /// Current time in file units, which the following changes keep.
        current_units: u64,
    },
    /// A data line that did not decode to a value change.
    UnrecognizedValueChange(String),
    /// Scopes still open at `$enddefinitions` or end of input.
    UnterminatedScope(usize),
    /// Declarations were present but `$enddefinitions` never appeared.
    MissingEndDefinitions,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedVar(body) => write!(f, "malformed $var: {body}"),
            DiagnosticKind::InvalidWidth(w) => write!(f, "invalid width in $var: {w}"),
            DiagnosticKind::InvalidTimescale(body) => write!(f, "invalid timescale: {body}"),
            DiagnosticKind::InvalidTimestamp(t) => write!(f, "invalid timestamp: {t}"),
            DiagnosticKind::BackwardsTimestamp {
                marker,
                current_units,
            } => write!(
                f,
                "timestamp {marker} moves backwards; following changes retimed to #{current_units}"
            ),
            DiagnosticKind::UnrecognizedValueChange(line) => {
                write!(f, "unrecognized value change: {line}")
            }
            DiagnosticKind::UnterminatedScope(depth) => {
                write!(f, "{depth} scope(s) not closed by $upscope")
            }
            DiagnosticKind::MissingEndDefinitions => write!(f, "missing $enddefinitions"),
        }
    }
}

/// A skipped line recorded during a tolerant decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based line number the problem was found on.
    pub line: usize,
    /// What was wrong.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}
