//! Hex-dump lines: `fd 08 7e 2a 0b e2 00 00 88 41 00 00 34 42 30 93 `.

use crate::error::GenError;
use crate::primitives::HexDump;
use crate::types::ProtocolVersion;

/// Parses a hex-dump line that has already been identified as starting with
/// `version`'s marker.
///
/// # Arguments
/// * `line` - The raw line, trailing whitespace allowed.
/// * `version` - The version announced by the line's marker token.
/// * `line_no` - 1-based line number, used in errors.
///
/// # Returns
/// The captured frame, or `GenError::MalformedHexDump` if a token is not a
/// byte or a v2 frame is too short to hold its incompatibility flags.
pub fn parse_hex_dump(line: &str, version: ProtocolVersion, line_no: usize) -> Result<HexDump, GenError> {
    let bytes = line
        .split_whitespace()
        .map(|tok| parse_byte(tok, line_no))
        .collect::<Result<Vec<u8>, GenError>>()?;

    if bytes.first() != Some(&version.start_byte()) {
        return Err(GenError::MalformedHexDump {
            line: line_no,
            reason: format!("expected start byte 0x{:02x}", version.start_byte()),
        });
    }
    if version.has_incompat_flags() && bytes.len() <= HexDump::INCOMPAT_FLAGS_INDEX {
        return Err(GenError::MalformedHexDump {
            line: line_no,
            reason: format!("{} bytes is too short for a {} header", bytes.len(), version),
        });
    }

    Ok(HexDump { version, bytes })
}

fn parse_byte(token: &str, line_no: usize) -> Result<u8, GenError> {
    if token.len() > 2 {
        return Err(GenError::MalformedHexDump {
            line: line_no,
            reason: format!("`{}` is not a single byte", token),
        });
    }
    u8::from_str_radix(token, 16).map_err(|e| GenError::MalformedHexDump {
        line: line_no,
        reason: format!("`{}`: {}", token, e),
    })
}
