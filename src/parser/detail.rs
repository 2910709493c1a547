//! Detail lines printed after each hex dump:
//!
//! ```text
//! sysid:42 compid:11 seq:126 RPM { rpm1: 17.000000  rpm2: 45.000000  }
//! sysid:42 compid:11 seq:3 ts:1234567 HEARTBEAT { type: 1  base_mode: 0  ... }
//! ```
//!
//! Tokens are separated by single spaces. Two spaces in a row (an empty token)
//! end a field, except inside a `[ ... ]` array or a quoted string.

use crate::error::GenError;
use crate::primitives::{FieldAssignment, FieldValue};

/// Prefix that identifies a detail line.
pub const DETAIL_PREFIX: &str = "sysid:";

/// Everything a detail line says about one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    /// Lower-cased message name.
    pub message: String,
    pub sysid: u8,
    pub compid: u8,
    pub seq: u8,
    pub signing_timestamp: Option<u64>,
    pub fields: Vec<FieldAssignment>,
}

pub fn parse_detail(line: &str, line_no: usize) -> Result<Detail, GenError> {
    let malformed = |reason: String| GenError::MalformedDetail { line: line_no, reason };

    let tokens: Vec<&str> = line.trim_end_matches(&['\r', '\n'][..]).split(' ').collect();
    if tokens.len() < 5 {
        return Err(malformed(format!("expected at least 5 tokens, found {}", tokens.len())));
    }

    let sysid = header_number(tokens[0], "sysid", line_no)?;
    let compid = header_number(tokens[1], "compid", line_no)?;
    let seq = header_number(tokens[2], "seq", line_no)?;

    // Lines for signed packets carry one extra `ts:<n>` token before the name.
    let (signing_timestamp, name, tail) = if tokens[4] == "{" {
        (None, tokens[3], &tokens[4..])
    } else {
        let (_, ts) = tokens[3]
            .split_once(':')
            .ok_or_else(|| malformed(format!("expected `key:value` timestamp, found `{}`", tokens[3])))?;
        let ts = ts
            .parse::<u64>()
            .map_err(|e| malformed(format!("signing timestamp `{}`: {}", ts, e)))?;
        (Some(ts), tokens[4], &tokens[5..])
    };

    if name.is_empty() {
        return Err(malformed("missing message name".to_string()));
    }
    if tail.first() != Some(&"{") {
        return Err(malformed(format!("expected `{{` after {}", name)));
    }

    let message = name.to_lowercase();
    let fields = segment_fields(&tail[1..])
        .iter()
        .map(|segment| parse_field(segment, &message))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Detail { message, sysid, compid, seq, signing_timestamp, fields })
}

fn header_number(token: &str, key: &str, line_no: usize) -> Result<u8, GenError> {
    let value = token
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| GenError::MalformedDetail {
            line: line_no,
            reason: format!("expected `{}:<n>`, found `{}`", key, token),
        })?;
    value.parse::<u8>().map_err(|e| GenError::MalformedDetail {
        line: line_no,
        reason: format!("{} `{}`: {}", key, value, e),
    })
}

/// Splits the tokens after `{` into one `name:value` string per field.
///
/// Tokens are concatenated without the separating spaces, except inside
/// quoted strings where the spaces belong to the value.
pub fn segment_fields(tokens: &[&str]) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quote = false;

    for &tok in tokens {
        if in_quote {
            current.push(' ');
            current.push_str(tok);
            if tok.ends_with('\'') {
                in_quote = false;
                flush(&mut current, &mut segments);
            }
            continue;
        }
        match tok {
            "" | "{" | "}" if depth == 0 => flush(&mut current, &mut segments),
            "" => {}
            "[" => {
                depth += 1;
                current.push('[');
            }
            "]" => {
                depth = depth.saturating_sub(1);
                current.push(']');
                if depth == 0 {
                    flush(&mut current, &mut segments);
                }
            }
            _ => {
                current.push_str(tok);
                if opens_quote(tok) {
                    in_quote = true;
                } else if is_quoted(tok) && depth == 0 {
                    flush(&mut current, &mut segments);
                }
            }
        }
    }
    flush(&mut current, &mut segments);
    segments
}

fn opens_quote(tok: &str) -> bool {
    tok.starts_with('\'') && !is_quoted(tok)
}

fn is_quoted(tok: &str) -> bool {
    tok.len() >= 2 && tok.starts_with('\'') && tok.ends_with('\'')
}

fn flush(current: &mut String, segments: &mut Vec<String>) {
    if !current.trim().is_empty() {
        segments.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Turns one `name:value` segment into a typed assignment.
pub fn parse_field(segment: &str, message: &str) -> Result<FieldAssignment, GenError> {
    let malformed = || GenError::MalformedField {
        message: message.to_string(),
        field_text: segment.to_string(),
    };

    let (name, raw) = segment.split_once(':').ok_or_else(malformed)?;
    let name = name.trim();
    let raw = raw.trim();
    if name.is_empty() || raw.is_empty() {
        return Err(malformed());
    }

    let value = if let Some(inner) = raw.strip_prefix('[') {
        let inner = inner.trim_end_matches(',').strip_suffix(']').ok_or_else(malformed)?;
        FieldValue::Array(
            inner
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        )
    } else if is_quoted(raw) {
        FieldValue::Str(raw[1..raw.len() - 1].to_string())
    } else {
        let scalar = raw.trim_end_matches(',');
        if scalar.is_empty() {
            return Err(malformed());
        }
        FieldValue::Scalar(scalar.to_string())
    };

    Ok(FieldAssignment { name: name.to_string(), value })
}
