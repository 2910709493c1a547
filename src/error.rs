//!
//! Defines error types for the fixture generator.

use crate::types::ProtocolVersion;

/// Errors raised while configuring the generator, collecting reference output,
/// or turning that output into test text.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Reading a config or helper file failed for a reason other than absence.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON configuration could not be parsed or holds an invalid value.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// A protocol version string that has no start-byte marker associated with it.
    #[error("Unsupported protocol version: {0}")]
    UnsupportedVersion(String),
    /// A reference binary printed something that is not UTF-8.
    #[error("Reference binary {binary} produced non UTF-8 output")]
    NonUtf8Output { binary: String },
    /// A line starting with a protocol marker did not hold a usable byte dump.
    #[error("Malformed hex dump on line {line}: {reason}")]
    MalformedHexDump { line: usize, reason: String },
    /// A `sysid:` line did not have the expected header tokens.
    #[error("Malformed detail line {line}: {reason}")]
    MalformedDetail { line: usize, reason: String },
    /// A segment of a detail line's field list is not a `name: value` pair.
    #[error("Malformed field `{field_text}` in message {message}")]
    MalformedField { message: String, field_text: String },
    /// A parse error, tagged with the (message-set, version) pair whose output caused it.
    #[error("While generating {message_set}/{version}: {source}")]
    Suite {
        message_set: String,
        version: ProtocolVersion,
        #[source]
        source: Box<GenError>,
    },
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> Self {
        GenError::Config(err.to_string())
    }
}
