//! Timescale representation and normalization to nanoseconds.
//!
//! A VCD file records timestamps as integer multiples of its `$timescale`.
//! [`Timescale`] keeps the declared magnitude and unit so it can be shown back
//! to the user, and converts file time units into absolute nanoseconds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Nanoseconds per second.
pub const NS_PER_S: f64 = 1e9;
/// Nanoseconds per millisecond.
pub const NS_PER_MS: f64 = 1e6;
/// Nanoseconds per microsecond.
pub const NS_PER_US: f64 = 1e3;
/// Nanoseconds per picosecond.
pub const NS_PER_PS: f64 = 1e-3;
/// Nanoseconds per femtosecond.
pub const NS_PER_FS: f64 = 1e-6;

/// A time unit accepted by the `$timescale` directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Seconds.
    S,
    /// Milliseconds.
    Ms,
    /// Microseconds.
    Us,
    /// Nanoseconds.
    Ns,
    /// Picoseconds.
    Ps,
    /// Femtoseconds.
    Fs,
}

impl TimeUnit {
    /// Returns how many nanoseconds one unit represents.
    pub fn ns(self) -> f64 {
        match self {
            TimeUnit::S => NS_PER_S,
            TimeUnit::Ms => NS_PER_MS,
            TimeUnit::Us => NS_PER_US,
            TimeUnit::Ns => 1.0,
            TimeUnit::Ps => NS_PER_PS,
            TimeUnit::Fs => NS_PER_FS,
        }
    }

    /// Returns the unit's lowercase VCD spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::S => "s",
            TimeUnit::Ms => "ms",
            TimeUnit::Us => "us",
            TimeUnit::Ns => "ns",
            TimeUnit::Ps => "ps",
            TimeUnit::Fs => "fs",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = TimescaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" => Ok(TimeUnit::S),
            "ms" => Ok(TimeUnit::Ms),
            "us" => Ok(TimeUnit::Us),
            "ns" => Ok(TimeUnit::Ns),
            "ps" => Ok(TimeUnit::Ps),
            "fs" => Ok(TimeUnit::Fs),
            _ => Err(TimescaleParseError(format!("unknown time unit '{s}'"))),
        }
    }
}

/// The declared timescale of a VCD file, e.g. `10 ps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timescale {
    /// Integer magnitude (1, 10 or 100 in conforming files).
    pub magnitude: u64,
    /// Unit the magnitude is expressed in.
    pub unit: TimeUnit,
}

impl Timescale {
    /// Creates a timescale from a magnitude and unit.
    pub fn new(magnitude: u64, unit: TimeUnit) -> Self {
        Self { magnitude, unit }
    }

    /// Nanoseconds per file time unit.
    pub fn ns_per_unit(&self) -> f64 {
        self.magnitude as f64 * self.unit.ns()
    }

    /// Converts a raw `#` timestamp into absolute nanoseconds.
    pub fn to_ns(&self, units: u64) -> f64 {
        units as f64 * self.ns_per_unit()
    }
}

impl Default for Timescale {
    fn default() -> Self {
        Self::new(1, TimeUnit::Ns)
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.as_str())
    }
}

/// Error returned when a `$timescale` body cannot be understood.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid timescale: {0}")]
pub struct TimescaleParseError(pub String);

impl FromStr for Timescale {
    type Err = TimescaleParseError;

    /// Parses `"1ns"`, `"1 ns"` or `"100 PS"`.
    ///
    /// Tokens after the unit are ignored, matching the lenient handling of
    /// declaration bodies elsewhere in the decoder.
    fn from_str(body: &str) -> Result<Self, Self::Err> {
        let s = body.trim();
        let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (num_str, rest) = s.split_at(digit_end);
        if num_str.is_empty() {
            return Err(TimescaleParseError(format!("missing magnitude in '{s}'")));
        }
        let magnitude: u64 = num_str
            .parse()
            .map_err(|_| TimescaleParseError(format!("magnitude out of range: {num_str}")))?;
        let unit_str = rest.split_whitespace().next().unwrap_or("");
        let unit_end = unit_str
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(unit_str.len());
        let unit = unit_str[..unit_end].parse()?;
        Ok(Timescale::new(magnitude, unit))
    }
}
