use std::fmt;

use crate::types::{ProtocolVersion, INCOMPAT_FLAG_SIGNED};

// --- Captured packets -------------------------------------------------------

/// One packet as printed by a reference binary: the version announced by its
/// start marker and the raw bytes of the encoded frame.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HexDump {
    pub version: ProtocolVersion,
    pub bytes: Vec<u8>,
}

impl HexDump {
    /// Index of the incompatibility-flags byte in a v2 frame.
    pub const INCOMPAT_FLAGS_INDEX: usize = 2;

    /// True when the frame's incompatibility flags have the signing bit set.
    /// Version 1.0 frames are never signed.
    pub fn is_signed(&self) -> bool {
        self.version.has_incompat_flags()
            && self
                .bytes
                .get(Self::INCOMPAT_FLAGS_INDEX)
                .is_some_and(|flags| flags & INCOMPAT_FLAG_SIGNED != 0)
    }

    /// Renders the bytes as the body of a JavaScript array literal: `0xfd, 0x09, ...`.
    pub fn to_js_list(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("0x{:02x}", b))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// --- Field values -----------------------------------------------------------

/// A literal value as printed in a detail line's field list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum FieldValue {
    /// A number (or any other bare token), kept verbatim: `17.000000`, `-3`.
    Scalar(String),
    /// The contents of a single-quoted string, quotes removed.
    Str(String),
    /// The elements of a bracketed array, each kept verbatim.
    Array(Vec<String>),
}

impl FieldValue {
    /// The literal without any surrounding syntax: the scalar itself, the raw
    /// string contents, or the array elements joined by `, `.
    pub fn payload(&self) -> String {
        match self {
            FieldValue::Scalar(s) | FieldValue::Str(s) => s.clone(),
            FieldValue::Array(items) => items.join(", "),
        }
    }
}

impl fmt::Display for FieldValue {
    /// Plain JavaScript literal, used when no wrapper is known for the field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(s) => f.write_str(s),
            FieldValue::Str(s) => write!(f, "'{}'", s),
            FieldValue::Array(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// `name = value` for one field of a parsed message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldAssignment {
    pub name: String,
    pub value: FieldValue,
}

// --- Test records -----------------------------------------------------------

/// One message instance recovered from a reference binary: the decoded header
/// and fields from a detail line, paired with the hex dump that preceded it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TestRecord {
    /// Lower-cased message name, e.g. `rpm`.
    pub message: String,
    pub seq: u8,
    pub sysid: u8,
    pub compid: u8,
    /// Signing timestamp when the detail line carried one.
    pub signing_timestamp: Option<u64>,
    pub fields: Vec<FieldAssignment>,
    pub packet: HexDump,
    /// 1-based line number of the detail line in the reference output.
    pub line: usize,
}

impl TestRecord {
    pub fn is_signed(&self) -> bool {
        self.packet.is_signed()
    }

    /// Timestamp to place in the signing block and before `pack()`; `0` when absent.
    pub fn timestamp_or_zero(&self) -> u64 {
        self.signing_timestamp.unwrap_or(0)
    }
}
