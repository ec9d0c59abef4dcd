//! Signal declarations and value-change records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::SignalValue;

/// Declared category of a `$var`.
///
/// Informational only; replay treats every kind as an unsigned bit-vector.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    /// `wire`
    Wire,
    /// `reg`
    Reg,
    /// `integer`
    Integer,
    /// `real`
    Real,
    /// `parameter`
    Parameter,
    /// `event`
    Event,
    /// `logic` (SystemVerilog writers)
    Logic,
    /// Any other type token, kept verbatim.
    Other(String),
}

impl VarKind {
    /// Classifies a `$var` type token, ignoring ASCII case.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "wire" => VarKind::Wire,
            "reg" => VarKind::Reg,
            "integer" => VarKind::Integer,
            "real" => VarKind::Real,
            "parameter" => VarKind::Parameter,
            "event" => VarKind::Event,
            "logic" => VarKind::Logic,
            _ => VarKind::Other(token.to_string()),
        }
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VarKind::Wire => "wire",
            VarKind::Reg => "reg",
            VarKind::Integer => "integer",
            VarKind::Real => "real",
            VarKind::Parameter => "parameter",
            VarKind::Event => "event",
            VarKind::Logic => "logic",
            VarKind::Other(s) => s,
        };
        f.write_str(s)
    }
}

/// One traced wire or register, as declared by a `$var`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Short identifier code assigned by the writer (e.g. `!`, `#a`).
    pub identifier: String,
    /// Short name as declared. A range glued to it (`data[7:0]`) is kept.
    pub name: String,
    /// Bit width, at least 1.
    pub width: u32,
    /// Dot-joined enclosing scopes; empty at the file root.
    pub scope_path: String,
    /// Declared variable category.
    pub kind: VarKind,
}

impl Signal {
    /// Returns `scope_path.name`, or just `name` for a root-level signal.
    pub fn full_path(&self) -> String {
        join_path(&self.scope_path, &self.name)
    }
}

/// Joins a scope path and a leaf name with `.`.
pub(crate) fn join_path(scope_path: &str, name: &str) -> String {
    if scope_path.is_empty() {
        name.to_string()
    } else {
        format!("{scope_path}.{name}")
    }
}

/// A single timestamped mutation of one signal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueChange {
    /// Absolute simulation time in nanoseconds.
    pub time_ns: f64,
    /// Identifier of the targeted signal.
    pub identifier: String,
    /// Decoded value as an unsigned magnitude of any width.
    pub value: SignalValue,
}
