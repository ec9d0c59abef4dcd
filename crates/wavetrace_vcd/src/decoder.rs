//! Two-phase VCD decoder.
//!
//! The header phase consumes `$keyword ... $end` declarations token by token,
//! so a declaration may span several lines or share a line with others. Once
//! `$enddefinitions` is seen the data phase takes over: `#` markers set the
//! current time and every other token is decoded as a value change, with
//! records never spanning a line break.
//!
//! Malformed constructs are skipped and recorded as [`Diagnostic`]s unless
//! [`DecodeOptions::strict`] is set, in which case the first one is returned
//! as [`DecodeError::Strict`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{DecodeError, Diagnostic, DiagnosticKind};
use crate::signal::{join_path, Signal, ValueChange, VarKind};
use crate::timescale::Timescale;
use crate::value::{decode_binary, decode_real, decode_value_change, SignalValue};
use crate::waveform::Waveform;

/// Decoder settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail on the first malformed construct instead of skipping it.
    pub strict: bool,
}

impl DecodeOptions {
    /// Options for a strict decode.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Decodes VCD text held in memory.
///
/// # Errors
///
/// Only [`DecodeError::Strict`], and only when `options.strict` is set.
pub fn decode_str(text: &str, options: &DecodeOptions) -> Result<Waveform, DecodeError> {
    let mut decoder = Decoder::new(*options);
    for line in text.lines() {
        decoder.feed_line(line)?;
    }
    decoder.finish()
}

/// Decodes VCD text from a buffered reader.
///
/// # Errors
///
/// Returns [`DecodeError::Io`] if reading fails, or [`DecodeError::Strict`]
/// in strict mode.
pub fn decode_reader<R: BufRead>(reader: R, options: &DecodeOptions) -> Result<Waveform, DecodeError> {
    let mut decoder = Decoder::new(*options);
    for line_result in reader.lines() {
        let line = line_result?;
        decoder.feed_line(&line)?;
    }
    decoder.finish()
}

/// Opens and decodes a VCD file.
///
/// The file is closed when this returns, on success or failure.
///
/// # Errors
///
/// Returns [`DecodeError::FileUnreadable`] if the file cannot be opened or
/// read, or [`DecodeError::Strict`] in strict mode.
pub fn load_vcd_file(path: &Path, options: &DecodeOptions) -> Result<Waveform, DecodeError> {
    let unreadable = |source| DecodeError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(unreadable)?;
    tracing::debug!(path = %path.display(), "decoding VCD file");
    decode_reader(BufReader::new(file), options).map_err(|e| match e {
        DecodeError::Io(source) => unreadable(source),
        other => other,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Header,
    Data,
}

/// Data-phase block the decoder is inside of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Block {
    /// Ordinary value changes go to the change log.
    Changes,
    /// Inside `$dumpvars`: values seed the initial-value table.
    InitialValues,
    /// Inside `$comment`, `$dumpoff`, `$dumpon` or `$dumpall`: tokens are
    /// discarded until `$end`.
    Skipped,
}

/// A header keyword whose `$end` has not been seen yet.
struct Pending {
    keyword: String,
    body: Vec<String>,
}

struct Decoder {
    options: DecodeOptions,
    waveform: Waveform,
    phase: Phase,
    block: Block,
    pending: Option<Pending>,
    scope_stack: Vec<String>,
    current_units: u64,
    current_time_ns: f64,
    line_num: usize,
}

impl Decoder {
    fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            waveform: Waveform::default(),
            phase: Phase::Header,
            block: Block::Changes,
            pending: None,
            scope_stack: Vec::new(),
            current_units: 0,
            current_time_ns: 0.0,
            line_num: 0,
        }
    }

    /// Feeds one physical line; lone `\r` separators are split further.
    fn feed_line(&mut self, line: &str) -> Result<(), DecodeError> {
        for piece in line.split('\r') {
            self.line_num += 1;
            let mut tokens = piece.split_whitespace();
            while let Some(tok) = tokens.next() {
                match self.phase {
                    Phase::Header => self.header_token(tok)?,
                    Phase::Data => self.data_token(tok, &mut tokens)?,
                }
            }
        }
        Ok(())
    }

    /// Records a skipped construct, or fails in strict mode.
    fn report(&mut self, kind: DiagnosticKind) -> Result<(), DecodeError> {
        if self.options.strict {
            return Err(DecodeError::Strict {
                line: self.line_num,
                kind,
            });
        }
        tracing::warn!(line = self.line_num, "skipping: {kind}");
        self.waveform.diagnostics.push(Diagnostic {
            line: self.line_num,
            kind,
        });
        Ok(())
    }

    /// Collects declaration bodies. `$end` may stand alone or be glued to the
    /// last field (`clk$end`) or to the keyword itself (`$upscope$end`).
    fn header_token(&mut self, tok: &str) -> Result<(), DecodeError> {
        if let Some(mut pending) = self.pending.take() {
            match tok.strip_suffix("$end") {
                Some(field) => {
                    if !field.is_empty() {
                        pending.body.push(field.to_string());
                    }
                    self.header_keyword(pending)?;
                }
                None => {
                    pending.body.push(tok.to_string());
                    self.pending = Some(pending);
                }
            }
            return Ok(());
        }

        // Stray text between declarations.
        let Some(kw) = tok.strip_prefix('$') else {
            return Ok(());
        };
        let (kw, closed) = match kw.strip_suffix("$end") {
            Some(kw) => (kw, true),
            None => (kw, false),
        };
        if kw.is_empty() || kw.eq_ignore_ascii_case("end") {
            return Ok(());
        }
        if kw.eq_ignore_ascii_case("enddefinitions") {
            return self.end_definitions();
        }
        let pending = Pending {
            keyword: kw.to_ascii_lowercase(),
            body: Vec::new(),
        };
        if closed {
            self.header_keyword(pending)
        } else {
            self.pending = Some(pending);
            Ok(())
        }
    }

    /// Applies a completed `$keyword ... $end` declaration.
    fn header_keyword(&mut self, pending: Pending) -> Result<(), DecodeError> {
        let body = pending.body;
        match pending.keyword.as_str() {
            "timescale" => {
                let text = body.join(" ");
                match text.parse::<Timescale>() {
                    Ok(ts) => self.waveform.timescale = ts,
                    Err(_) => self.report(DiagnosticKind::InvalidTimescale(text))?,
                }
            }
            "scope" => {
                // "<type> <name>", or a bare name from terse writers.
                let name = match body.as_slice() {
                    [_, name, ..] => Some(name),
                    [name] => Some(name),
                    [] => None,
                };
                if let Some(name) = name {
                    self.scope_stack.push(name.clone());
                }
            }
            "upscope" => {
                self.scope_stack.pop();
            }
            "var" => self.declare_var(&body)?,
            "date" => self.waveform.date = Some(body.join(" ")),
            "version" => self.waveform.version = Some(body.join(" ")),
            _ => {
                // $comment and vendor extensions carry nothing we model.
            }
        }
        Ok(())
    }

    /// Handles `<type> <width> <id> <name> [range]`.
    ///
    /// A trailing bit-range token is accepted and discarded without checking
    /// it against the width; a range glued to the name stays part of it.
    fn declare_var(&mut self, body: &[String]) -> Result<(), DecodeError> {
        let [kind, width, identifier, name, ..] = body else {
            return self.report(DiagnosticKind::MalformedVar(body.join(" ")));
        };
        let width = match width.parse::<u32>() {
            Ok(w) if w >= 1 => w,
            _ => return self.report(DiagnosticKind::InvalidWidth(width.clone())),
        };
        let scope_path = self.scope_stack.join(".");
        tracing::trace!(
            identifier = %identifier,
            path = %join_path(&scope_path, name),
            width,
            "declared signal"
        );
        self.waveform.declare(Signal {
            identifier: identifier.clone(),
            name: name.clone(),
            width,
            scope_path,
            kind: VarKind::from_token(kind),
        });
        Ok(())
    }

    fn end_definitions(&mut self) -> Result<(), DecodeError> {
        if !self.scope_stack.is_empty() {
            self.report(DiagnosticKind::UnterminatedScope(self.scope_stack.len()))?;
        }
        tracing::debug!(
            signals = self.waveform.signals.len(),
            timescale = %self.waveform.timescale,
            "header complete"
        );
        self.phase = Phase::Data;
        Ok(())
    }

    fn data_token<'a, I>(&mut self, tok: &'a str, rest: &mut I) -> Result<(), DecodeError>
    where
        I: Iterator<Item = &'a str>,
    {
        if self.block == Block::Skipped {
            if tok == "$end" {
                self.block = Block::Changes;
            }
            return Ok(());
        }

        if let Some(kw) = tok.strip_prefix('$') {
            self.data_keyword(kw);
            return Ok(());
        }

        if let Some(time) = tok.strip_prefix('#') {
            return self.timestamp(time);
        }

        let record = match tok.as_bytes()[0] {
            b'b' | b'B' => rest.next().map(|id| (decode_binary(&tok[1..]), id)),
            b'r' | b'R' => rest.next().map(|id| (decode_real(&tok[1..]), id)),
            _ => decode_value_change(tok),
        };
        match record {
            Some((value, identifier)) => {
                self.record(value, identifier);
                Ok(())
            }
            None => self.report(DiagnosticKind::UnrecognizedValueChange(tok.to_string())),
        }
    }

    fn data_keyword(&mut self, keyword: &str) {
        match keyword.to_ascii_lowercase().as_str() {
            "dumpvars" => self.block = Block::InitialValues,
            "dumpoff" | "dumpon" | "dumpall" | "comment" => self.block = Block::Skipped,
            "end" => self.block = Block::Changes,
            other => tracing::debug!(line = self.line_num, "ignoring ${other} in data section"),
        }
    }

    fn timestamp(&mut self, text: &str) -> Result<(), DecodeError> {
        let Ok(units) = text.parse::<u64>() else {
            return self.report(DiagnosticKind::InvalidTimestamp(format!("#{text}")));
        };
        if units < self.current_units {
            return self.report(DiagnosticKind::BackwardsTimestamp {
                marker: format!("#{text}"),
                current_units: self.current_units,
            });
        }
        self.current_units = units;
        self.current_time_ns = self.waveform.timescale.to_ns(units);
        Ok(())
    }

    fn record(&mut self, value: SignalValue, identifier: &str) {
        if self.waveform.signal(identifier).is_none() {
            tracing::debug!(line = self.line_num, identifier, "change to undeclared identifier");
        }
        match self.block {
            Block::InitialValues => {
                self.waveform
                    .initial_values
                    .insert(identifier.to_string(), value);
            }
            _ => self.waveform.changes.push(ValueChange {
                time_ns: self.current_time_ns,
                identifier: identifier.to_string(),
                value,
            }),
        }
    }

    fn finish(mut self) -> Result<Waveform, DecodeError> {
        if self.phase == Phase::Header {
            if !self.scope_stack.is_empty() {
                self.report(DiagnosticKind::UnterminatedScope(self.scope_stack.len()))?;
            }
            if !self.waveform.signals.is_empty() {
                self.report(DiagnosticKind::MissingEndDefinitions)?;
            }
        }
        tracing::debug!(
            signals = self.waveform.signals.len(),
            changes = self.waveform.changes.len(),
            initial_values = self.waveform.initial_values.len(),
            diagnostics = self.waveform.diagnostics.len(),
            "decode complete"
        );
        Ok(self.waveform)
    }
}
