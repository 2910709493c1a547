//! Rendering of one (message set, version) suite.

use crate::error::GenError;
use crate::lookup::LongFieldTable;
use crate::parser::scan_records;
use crate::template::{SuiteFooter, SuiteHeader, TestCase};
use crate::types::ProtocolVersion;

/// Issues test identifiers: 1, 2, 3, ... across the whole run.
///
/// Identifiers end up in test titles as `id<N>` so single tests can be
/// selected with `--grep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIds {
    next: u64,
}

impl Default for TestIds {
    fn default() -> Self {
        TestIds { next: 1 }
    }
}

impl TestIds {
    pub fn starting_at(first: u64) -> Self {
        TestIds { next: first }
    }

    /// Returns the next identifier and advances.
    pub fn issue(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The identifier the next call to `issue` will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// Counters for one rendered suite.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SuiteSummary {
    pub message_set: String,
    pub version: ProtocolVersion,
    pub cases: usize,
    pub signed_cases: usize,
    pub skipped_details: usize,
    pub ignored_lines: usize,
    /// Range of identifiers issued to this suite; `None` when it has no cases.
    pub ids: Option<(u64, u64)>,
}

/// Renders the `describe` block for one pair from the reference binary's output.
///
/// This is a pure function of its inputs: the same output, table and starting
/// identifier always give the same text. `ids` is advanced by the number of
/// cases emitted.
pub fn render_suite(
    message_set: &str,
    version: ProtocolVersion,
    reference_output: &str,
    table: &LongFieldTable,
    ids: &mut TestIds,
) -> Result<(String, SuiteSummary), GenError> {
    let outcome = scan_records(reference_output, version).map_err(|e| GenError::Suite {
        message_set: message_set.to_string(),
        version,
        source: Box::new(e),
    })?;

    let mut text = String::new();
    text.push_str(&SuiteHeader { message_set, version }.to_string());
    text.push('\n');

    let first_id = ids.peek();
    let mut signed_cases = 0;
    for record in &outcome.records {
        let case = TestCase::from_record(ids.issue(), message_set, version, record, table);
        if case.is_signed() {
            signed_cases += 1;
        }
        tracing::debug!(
            "id{} {} seq={} line={}{}",
            case.id,
            case.name,
            case.seq,
            record.line,
            if case.is_signed() { " (signed)" } else { "" }
        );
        text.push_str(&case.to_string());
        text.push('\n');
    }

    text.push_str(&SuiteFooter.to_string());
    text.push('\n');

    let cases = outcome.records.len();
    let summary = SuiteSummary {
        message_set: message_set.to_string(),
        version,
        cases,
        signed_cases,
        skipped_details: outcome.skipped_details,
        ignored_lines: outcome.ignored_lines,
        ids: (cases > 0).then_some((first_id, ids.peek() - 1)),
    };
    Ok((text, summary))
}
