//! Signal values and value-change record decoding.
//!
//! Each data-section line that is not a keyword or timestamp is dispatched on
//! its leading character:
//!
//! | form | example | value |
//! |---|---|---|
//! | `b<bits> <id>` | `b1010 #` | bits read MSB-first, `x`/`z` read as 0 |
//! | `r<real> <id>` | `r2.75 %` | truncated toward zero, 0 if unparseable |
//! | `<c><id>` | `1!` | `0`/`1`, `x`/`z` read as 0 |
//!
//! Unknown and high-impedance states are collapsed to 0; this decoder keeps
//! two-state values only. Vectors keep every bit regardless of width.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bits per storage word.
const WORD_BITS: usize = 64;

/// Largest power of ten that fits a word, used for decimal formatting.
const DECIMAL_CHUNK: u128 = 10_000_000_000_000_000_000;

/// An unsigned integer of any width, as carried by a value change.
///
/// Stored as little-endian 64-bit words with high zero words trimmed, so two
/// values are equal exactly when their integers are, whatever width they
/// were declared with.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalValue {
    words: Vec<u64>,
}

impl SignalValue {
    /// The value 0.
    pub const fn zero() -> Self {
        Self { words: Vec::new() }
    }

    /// Builds a value from little-endian words.
    pub fn from_words(mut words: Vec<u64>) -> Self {
        while words.last() == Some(&0) {
            words.pop();
        }
        Self { words }
    }

    /// Little-endian words with no high zero words; empty for 0.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Whether the value is 0.
    pub fn is_zero(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of significant bits; 0 for the value 0.
    pub fn bit_len(&self) -> u32 {
        match self.words.last() {
            Some(top) => {
                (self.words.len() as u32 - 1) * WORD_BITS as u32 + (64 - top.leading_zeros())
            }
            None => 0,
        }
    }

    /// The value as a `u64`, or `None` if it needs more than 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        match self.words.as_slice() {
            [] => Some(0),
            [w] => Some(*w),
            _ => None,
        }
    }

    /// Reads a binary digit string MSB-first; any character but `1` is a 0.
    pub fn from_binary_str(bits: &str) -> Self {
        let mut words = vec![0u64; bits.len().div_ceil(WORD_BITS)];
        for (i, b) in bits.bytes().rev().enumerate() {
            if b == b'1' {
                words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
            }
        }
        Self::from_words(words)
    }

    /// Truncates a float toward zero.
    ///
    /// Values below 1, negatives, NaN and infinities give 0.
    pub fn from_f64_trunc(v: f64) -> Self {
        if !v.is_finite() || v < 1.0 {
            return Self::zero();
        }
        let bits = v.to_bits();
        let exponent = ((bits >> 52) & 0x7ff) as i32 - 1075;
        let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
        if exponent <= 0 {
            Self::from(mantissa >> exponent.unsigned_abs())
        } else {
            Self::from(mantissa).shifted_left(exponent.unsigned_abs())
        }
    }

    fn shifted_left(&self, n: u32) -> Self {
        let word_shift = n as usize / WORD_BITS;
        let bit_shift = n as usize % WORD_BITS;
        let mut out = vec![0u64; word_shift + self.words.len() + 1];
        for (i, &w) in self.words.iter().enumerate() {
            out[i + word_shift] |= w << bit_shift;
            if bit_shift != 0 {
                out[i + word_shift + 1] |= w >> (WORD_BITS - bit_shift);
            }
        }
        Self::from_words(out)
    }
}

impl From<u64> for SignalValue {
    fn from(v: u64) -> Self {
        Self::from_words(vec![v])
    }
}

impl PartialEq<u64> for SignalValue {
    fn eq(&self, other: &u64) -> bool {
        self.to_u64() == Some(*other)
    }
}

impl fmt::Display for SignalValue {
    /// Decimal, any width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(v) = self.to_u64() {
            return write!(f, "{v}");
        }
        let mut words = self.words.clone();
        let mut chunks = Vec::new();
        while !words.is_empty() {
            let mut rem: u128 = 0;
            for w in words.iter_mut().rev() {
                let cur = (rem << 64) | u128::from(*w);
                *w = (cur / DECIMAL_CHUNK) as u64;
                rem = cur % DECIMAL_CHUNK;
            }
            chunks.push(rem as u64);
            while words.last() == Some(&0) {
                words.pop();
            }
        }
        let mut chunks = chunks.iter().rev();
        if let Some(top) = chunks.next() {
            write!(f, "{top}")?;
        }
        for chunk in chunks {
            write!(f, "{chunk:019}")?;
        }
        Ok(())
    }
}

impl fmt::Binary for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = self.words.iter().rev();
        match words.next() {
            Some(top) => write!(f, "{top:b}")?,
            None => return f.write_str("0"),
        }
        for w in words {
            write!(f, "{w:064b}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignalValue({self})")
    }
}

/// Decodes one value-change record into `(value, identifier)`.
///
/// Returns `None` when no identifier can be decoded; callers drop such lines.
pub fn decode_value_change(line: &str) -> Option<(SignalValue, &str)> {
    let line = line.trim();
    let first = line.chars().next()?;
    match first {
        'b' | 'B' => {
            let mut parts = line[1..].split_whitespace();
            let bits = parts.next()?;
            let id = parts.next()?;
            Some((decode_binary(bits), id))
        }
        'r' | 'R' => {
            let mut parts = line[1..].split_whitespace();
            let real = parts.next()?;
            let id = parts.next()?;
            Some((decode_real(real), id))
        }
        '0' | '1' | 'x' | 'X' | 'z' | 'Z' => {
            let id = line[1..].trim();
            if id.is_empty() {
                return None;
            }
            Some((decode_scalar(first), id))
        }
        _ => None,
    }
}

/// Decodes a binary vector of any length.
pub fn decode_binary(bits: &str) -> SignalValue {
    SignalValue::from_binary_str(bits)
}

/// Parses a real literal and truncates it toward zero.
///
/// Negative, NaN or unparseable literals decode to 0 since values are
/// unsigned magnitudes.
pub fn decode_real(text: &str) -> SignalValue {
    text.parse::<f64>()
        .map(SignalValue::from_f64_trunc)
        .unwrap_or_default()
}

/// Decodes a scalar state character.
pub fn decode_scalar(c: char) -> SignalValue {
    SignalValue::from(u64::from(c == '1'))
}
