//! # GS1 Parser and Linter
//!
//! Accepts bracketed Application Identifier input, e.g.
//! `"[01]12345678901231[20]12"` (or `"(01)…"` with the parentheses flag),
//! validates it against the AI registry and produces:
//!
//! - the **reduced** string delivered to the carrier symbology: AIs
//!   stripped of brackets, data fields joined by GS (0x1D), which GS1-128
//!   re-expresses as FNC1;
//! - the **human-readable text** in parenthesised form;
//! - lint findings as `Warning 261` diagnostics.
//!
//! Structural problems are hard errors; the NOCHECK flag suppresses field
//! lengths and lint rules but never the bracket grammar or the
//! character-repertoire gates.

pub mod lint;
pub mod table;

use crate::error::{Diagnostic, EncodeError, Warning, WarnKind};
use lint::Lint;
use table::{AiEntry, Cset};

/// GS separator byte used between fields of the reduced string.
pub const GS: u8 = 0x1D;

/// Parser behaviour flags, lifted from the symbol's input mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gs1Options {
    /// AIs are enclosed in parentheses instead of square brackets
    pub parens: bool,
    /// Suppress lint rules and length checks
    pub nocheck: bool,
}

/// Verified GS1 data ready for a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gs1Data {
    /// AI digits and data with GS-joined fields
    pub reduced: Vec<u8>,
    /// Parenthesised human-readable form
    pub hrt: String,
    pub diagnostic: Diagnostic,
}

struct Field<'a> {
    ai_str: &'a str,
    ai_num: u16,
    data: &'a str,
}

/// Character-repertoire gates shared by every GS1 carrier.
fn check_repertoire(input: &[u8]) -> Result<(), EncodeError> {
    for &b in input {
        if b >= 0x80 {
            return Err(EncodeError::invalid_data(250, "Extended ASCII characters are not supported by GS1"));
        }
        if b == 0x7F {
            return Err(EncodeError::invalid_data(263, "DEL characters are not supported by GS1"));
        }
        if b < 0x20 {
            return Err(EncodeError::invalid_data(251, "Control characters are not supported by GS1"));
        }
    }
    Ok(())
}

fn parse_fields<'a>(input: &'a str, opts: &Gs1Options) -> Result<Vec<Field<'a>>, EncodeError> {
    let (open, close) = if opts.parens { ('(', ')') } else { ('[', ']') };
    let bytes = input.as_bytes();
    if bytes.first() != Some(&(open as u8)) {
        return Err(EncodeError::invalid_data(252, "Data does not start with an AI"));
    }
    let mut fields = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        // at an opening bracket
        debug_assert_eq!(bytes[i], open as u8);
        let ai_start = i + 1;
        let mut j = ai_start;
        loop {
            match bytes.get(j) {
                None => {
                    return Err(EncodeError::invalid_data(253, "Malformed AI in input data (brackets don't match)"));
                }
                Some(&b) if b == close as u8 => break,
                Some(&b) if b == open as u8 => {
                    return Err(EncodeError::invalid_data(254, "Found nested brackets in input data"));
                }
                Some(_) => j += 1,
            }
        }
        let ai_str = &input[ai_start..j];
        if ai_str.len() < 2 {
            return Err(EncodeError::invalid_data(256, "Invalid AI in input data (AI too short)"));
        }
        if ai_str.len() > 4 {
            return Err(EncodeError::invalid_data(255, "Invalid AI in input data (AI too long)"));
        }
        if !ai_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodeError::invalid_data(257, "Invalid AI in input data (non-numeric characters in AI)"));
        }
        // data runs until the next opening bracket or end of input
        let data_start = j + 1;
        let mut k = data_start;
        while k < bytes.len() && bytes[k] != open as u8 {
            if bytes[k] == close as u8 {
                return Err(EncodeError::invalid_data(253, "Malformed AI in input data (brackets don't match)"));
            }
            k += 1;
        }
        let data = &input[data_start..k];
        let ai_num: u16 = ai_str.parse().expect("digits verified above");
        fields.push(Field { ai_str, ai_num, data });
        i = k;
    }
    Ok(fields)
}

/// Split `data` across the entry's parts: fixed parts take their exact
/// width, the first variable part soaks up the surplus.
fn part_spans(entry: &AiEntry, data_len: usize) -> Vec<(usize, usize)> {
    let min_total = entry.min_len();
    let mut surplus = data_len.saturating_sub(min_total);
    let mut spans = Vec::with_capacity(entry.parts.len());
    let mut at = 0;
    for p in entry.parts {
        let extra = surplus.min((p.max - p.min) as usize);
        surplus -= extra;
        let len = (p.min as usize + extra).min(data_len - at);
        spans.push((at, at + len));
        at += len;
    }
    spans
}

fn lint_field(field: &Field, entry: &AiEntry, diagnostic: &mut Diagnostic) {
    let warn = |pos: usize, detail: &str| {
        Warning::new(
            WarnKind::NonCompliant,
            261,
            format!("AI ({}) position {}: {}", field.ai_str, pos, detail),
        )
    };
    for (p, &(start, end)) in entry.parts.iter().zip(part_spans(entry, field.data.len()).iter()) {
        let slice = &field.data[start..end];
        // charset class first
        for (off, b) in slice.bytes().enumerate() {
            if !p.cset.contains(b) {
                let detail = match p.cset {
                    Cset::Numeric => format!("Non-numeric character '{}'", b as char),
                    other => format!("Invalid {} character '{}'", other.name(), b as char),
                };
                diagnostic.merge(warn(start + off + 1, &detail));
                return;
            }
        }
        for &rule in p.lints {
            if let Err((pos, detail)) = lint::apply(rule, slice) {
                diagnostic.merge(warn(start + pos, &detail));
                return;
            }
        }
    }
}

/// Top-level GS1 validation: structural checks, AI registry lookup, lint.
pub fn verify(input: &[u8], opts: &Gs1Options) -> Result<Gs1Data, EncodeError> {
    check_repertoire(input)?;
    let text = std::str::from_utf8(input).expect("ASCII verified above");
    let fields = parse_fields(text, opts)?;

    let mut diagnostic = Diagnostic::Clean;
    let mut reduced = Vec::with_capacity(input.len());
    let mut hrt = String::with_capacity(input.len() + fields.len() * 2);

    for (idx, field) in fields.iter().enumerate() {
        // NOCHECK drops the registry checks; the bracket grammar, AI
        // syntax and character gates have already run either way
        if !opts.nocheck {
            if field.data.is_empty() {
                return Err(EncodeError::invalid_data(258, "Empty data field in input data"));
            }
            // leading zeros are only legal in the two-digit AIs 00..09
            let zero_padded = field.ai_str.len() > 2 && field.ai_str.starts_with('0');
            let entry = if zero_padded { None } else { table::lookup(field.ai_num) };
            let Some(entry) = entry else {
                return Err(EncodeError::invalid_data(260, format!("Invalid AI ({})", field.ai_str)));
            };
            let len = field.data.len();
            if len < entry.min_len() || len > entry.max_len() {
                return Err(EncodeError::invalid_data(
                    259,
                    format!("Invalid data length for AI ({})", field.ai_str),
                ));
            }
            lint_field(field, entry, &mut diagnostic);
        }
        if idx > 0 {
            reduced.push(GS);
        }
        reduced.extend_from_slice(field.ai_str.as_bytes());
        reduced.extend_from_slice(field.data.as_bytes());
        hrt.push('(');
        hrt.push_str(field.ai_str);
        hrt.push(')');
        hrt.push_str(field.data);
    }
    Ok(Gs1Data { reduced, hrt, diagnostic })
}
