//! Line-oriented parsing of reference binary output.
//!
//! The reference binaries print, for every message they encode, a hex dump of
//! the frame followed by a human-readable decode of the same frame. The scan
//! below pairs each decode with the dump before it and keeps the pairs whose
//! dump announced the requested protocol version.

pub mod detail;
pub mod hexdump;

use crate::error::GenError;
use crate::primitives::{HexDump, TestRecord};
use crate::types::ProtocolVersion;

pub use detail::{parse_detail, Detail, DETAIL_PREFIX};
pub use hexdump::parse_hex_dump;

/// Shape of a single line of reference output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A hex dump whose first token is the start marker of this version.
    HexDump(ProtocolVersion),
    /// A `sysid:` decode line.
    Detail,
    /// Blank lines.
    Blank,
    /// Anything else the binary prints; ignored.
    Other,
}

pub fn classify(line: &str) -> LineKind {
    for version in ProtocolVersion::ALL {
        if line.strip_prefix(version.marker()).is_some_and(|rest| rest.starts_with(' ')) {
            return LineKind::HexDump(version);
        }
    }
    if line.starts_with(DETAIL_PREFIX) {
        LineKind::Detail
    } else if line.trim().is_empty() {
        LineKind::Blank
    } else {
        LineKind::Other
    }
}

/// Result of scanning one reference output for one protocol version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub records: Vec<TestRecord>,
    /// Detail lines attributed to the other protocol version, or seen before any hex dump.
    pub skipped_details: usize,
    /// Non-blank lines of an unknown shape.
    pub ignored_lines: usize,
}

/// Scans `output` and returns one record per detail line whose preceding hex
/// dump belongs to `requested`.
///
/// Lines of unknown shape are counted and ignored. A hex-dump or detail line
/// that cannot be parsed is an error: the reference output is fully under our
/// control, so a mismatch means the format changed.
pub fn scan_records(output: &str, requested: ProtocolVersion) -> Result<ScanOutcome, GenError> {
    let mut outcome = ScanOutcome::default();
    let mut last_dump: Option<HexDump> = None;

    for (idx, line) in output.lines().enumerate() {
        let line_no = idx + 1;
        match classify(line) {
            LineKind::HexDump(version) => {
                last_dump = Some(parse_hex_dump(line, version, line_no)?);
            }
            LineKind::Detail => {
                let packet = match &last_dump {
                    Some(dump) if dump.version == requested => dump.clone(),
                    _ => {
                        outcome.skipped_details += 1;
                        continue;
                    }
                };
                let detail = parse_detail(line, line_no)?;
                outcome.records.push(TestRecord {
                    message: detail.message,
                    seq: detail.seq,
                    sysid: detail.sysid,
                    compid: detail.compid,
                    signing_timestamp: detail.signing_timestamp,
                    fields: detail.fields,
                    packet,
                    line: line_no,
                });
            }
            LineKind::Blank => {}
            LineKind::Other => outcome.ignored_lines += 1,
        }
    }

    tracing::debug!(
        "scanned {} records for {} ({} skipped, {} ignored)",
        outcome.records.len(),
        requested,
        outcome.skipped_details,
        outcome.ignored_lines
    );
    Ok(outcome)
}
