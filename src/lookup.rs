//!
//! Long-field lookup.
//!
//! The JavaScript bindings cannot represent every field type with a bare
//! literal: 64-bit integers go through `Long`/`wrap_long`, and some arrays
//! must be typed arrays. The generated helper file (`mavlink.tests.js`)
//! already knows which fields need this, so we read the wrapping used there
//! and put the reference binary's value inside the same wrapper.
//!
//! A typical helper line:
//!
//! ```text
//!       test_actuator_output_status.time_usec =  Long.fromNumber(93372036854775807, true); // fieldtype: uint64_t  isarray: False
//! ```

use std::collections::HashMap;

use crate::primitives::{FieldAssignment, FieldValue};

/// How a helper expression surrounds its literal payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// `"text"`: payload between the first pair of double quotes.
    Quoted,
    /// `[1, 2]` or `new Uint8Array([1, 2])`: payload between the first `[` and the last `]`.
    Bracketed,
    /// `Long.fromNumber(123, true)`, `wrap_long(...)`, `123n`: payload is the first numeric literal.
    WideInteger,
    /// No recognisable payload; the whole expression is replaced by the plain literal.
    Replace,
}

/// The syntax found around a field's value in the helper file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueWrapper {
    pub kind: WrapperKind,
    prefix: String,
    suffix: String,
}

impl ValueWrapper {
    /// Splits a right-hand-side expression into the text before and after its
    /// literal payload.
    pub fn from_expression(expr: &str) -> ValueWrapper {
        let expr = expr.trim();
        let split = |kind, start: usize, end: usize| ValueWrapper {
            kind,
            prefix: expr[..start].to_string(),
            suffix: expr[end..].to_string(),
        };

        if expr.starts_with('[') || expr.contains("Array") {
            if let (Some(open), Some(close)) = (expr.find('['), expr.rfind(']')) {
                if open < close {
                    return split(WrapperKind::Bracketed, open + 1, close);
                }
            }
        } else if let Some(open) = expr.find('"') {
            if let Some(len) = expr[open + 1..].find('"') {
                return split(WrapperKind::Quoted, open + 1, open + 1 + len);
            }
        } else if let Some((start, end)) = first_numeric_literal(expr) {
            return split(WrapperKind::WideInteger, start, end);
        }

        ValueWrapper { kind: WrapperKind::Replace, prefix: String::new(), suffix: String::new() }
    }

    /// Renders `value` inside this wrapper.
    pub fn apply(&self, value: &FieldValue) -> String {
        match self.kind {
            WrapperKind::Replace => value.to_string(),
            _ => format!("{}{}{}", self.prefix, value.payload(), self.suffix),
        }
    }
}

/// Byte range of the first number in `expr` that is not part of an identifier
/// such as `Uint8`.
fn first_numeric_literal(expr: &str) -> Option<(usize, usize)> {
    let bytes = expr.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let prev_is_ident = i > 0 && (bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'_');
        if bytes[i].is_ascii_digit() && !prev_is_ident {
            let start = if i > 0 && bytes[i - 1] == b'-' { i - 1 } else { i };
            let mut end = i;
            while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
                end += 1;
            }
            return Some((start, end));
        }
        i += 1;
    }
    None
}

/// True for helper lines that show wide-integer or typed-array wrapping.
pub fn is_wrapping_line(line: &str) -> bool {
    line.contains("wrap_long") || line.find("new").is_some_and(|at| line[at..].contains("Array"))
}

/// (message, field) pairs whose values need the helper file's wrapping.
#[derive(Debug, Clone, Default)]
pub struct LongFieldTable {
    entries: HashMap<(String, String), ValueWrapper>,
}

impl LongFieldTable {
    /// Builds the table from the full text of a helper file. Only lines that
    /// pass [`is_wrapping_line`] are considered; when a field appears twice
    /// the first occurrence wins.
    pub fn from_helper_text(text: &str) -> LongFieldTable {
        let mut entries = HashMap::new();
        for line in text.lines().filter(|l| is_wrapping_line(l)) {
            if let Some((key, wrapper)) = parse_helper_assignment(line) {
                entries.entry(key).or_insert(wrapper);
            }
        }
        tracing::debug!("long-field table holds {} entries", entries.len());
        LongFieldTable { entries }
    }

    pub fn get(&self, message: &str, field: &str) -> Option<&ValueWrapper> {
        self.entries.get(&(message.to_string(), field.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Right-hand side to emit for `assignment` of `message`.
    pub fn render_value(&self, message: &str, assignment: &FieldAssignment) -> String {
        match self.get(message, &assignment.name) {
            Some(wrapper) => wrapper.apply(&assignment.value),
            None => assignment.value.to_string(),
        }
    }
}

/// `test_<message>.<field> = <expr>; // comment` -> ((message, field), wrapper).
fn parse_helper_assignment(line: &str) -> Option<((String, String), ValueWrapper)> {
    let (lhs, rhs) = line.split_once('=')?;
    let target = lhs.split_whitespace().last()?;
    let (object, field) = target.rsplit_once('.')?;
    let message = object.strip_prefix("test_").unwrap_or(object);
    if message.is_empty() || field.is_empty() {
        return None;
    }
    let expr = rhs.split(';').next().unwrap_or(rhs);
    Some(((message.to_string(), field.to_string()), ValueWrapper::from_expression(expr)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELPER: &str = "\
      test_actuator_output_status.time_usec =  Long.fromNumber(93372036854775807, true); // fieldtype: uint64_t  isarray: False
      test_actuator_output_status.active = 963497880; // fieldtype: uint32_t  isarray: False
      test_actuator_output_status.actuator = new Float32Array([17.0, 18.0, 19.0]); // fieldtype: float  isarray: True
      test_system_time.time_unix_usec = wrap_long(Long.fromNumber(93372036854775807, true)); // fieldtype: uint64_t
      test_system_time.time_unix_usec = wrap_long(Long.fromNumber(1, true)); // duplicate
";

    fn scalar(name: &str, value: &str) -> FieldAssignment {
        FieldAssignment { name: name.into(), value: FieldValue::Scalar(value.into()) }
    }

    #[test]
    fn keeps_only_wrapping_lines() {
        let table = LongFieldTable::from_helper_text(HELPER);
        assert_eq!(table.len(), 2);
        assert!(table.get("actuator_output_status", "active").is_none());
        assert!(table.get("actuator_output_status", "time_usec").is_none());
        assert!(table.get("actuator_output_status", "actuator").is_some());
    }

    #[test]
    fn wide_integer_constructor_survives() {
        let table = LongFieldTable::from_helper_text(HELPER);
        let rendered = table.render_value("system_time", &scalar("time_unix_usec", "1234"));
        assert_eq!(rendered, "wrap_long(Long.fromNumber(1234, true))");
    }

    #[test]
    fn typed_array_constructor_survives() {
        let table = LongFieldTable::from_helper_text(HELPER);
        let value = FieldAssignment {
            name: "actuator".into(),
            value: FieldValue::Array(vec!["1.0".into(), "2.0".into()]),
        };
        assert_eq!(
            table.render_value("actuator_output_status", &value),
            "new Float32Array([1.0, 2.0])"
        );
    }

    #[test]
    fn unknown_fields_render_plain() {
        let table = LongFieldTable::from_helper_text(HELPER);
        assert_eq!(table.render_value("rpm", &scalar("rpm1", "17.000000")), "17.000000");
    }

    #[test]
    fn expression_kinds() {
        assert_eq!(ValueWrapper::from_expression(" \"abc\"").kind, WrapperKind::Quoted);
        assert_eq!(ValueWrapper::from_expression("[1, 2]").kind, WrapperKind::Bracketed);
        assert_eq!(ValueWrapper::from_expression("new Uint8Array([1])").kind, WrapperKind::Bracketed);
        assert_eq!(ValueWrapper::from_expression("5n").kind, WrapperKind::WideInteger);
        assert_eq!(ValueWrapper::from_expression("someValue").kind, WrapperKind::Replace);

        let quoted = ValueWrapper::from_expression("\"old\"");
        assert_eq!(quoted.apply(&FieldValue::Str("new".into())), "\"new\"");
        let bigint = ValueWrapper::from_expression("-17n");
        assert_eq!(bigint.apply(&FieldValue::Scalar("42".into())), "42n");
    }

    #[test]
    fn digits_inside_identifiers_are_not_payload() {
        let w = ValueWrapper::from_expression("Int64.from(12)");
        assert_eq!(w.apply(&FieldValue::Scalar("7".into())), "Int64.from(7)");
    }
}
