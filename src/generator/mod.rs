//! The fixture generator: drives the (message set × version) matrix and
//! stitches the per-suite output into one file.

pub mod source;
pub mod suite;

#[cfg(test)]
mod tests;

pub use source::{binary_name, helper_path, ProcessSource, ReferenceSource};
pub use suite::{render_suite, SuiteSummary, TestIds};

use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::lookup::LongFieldTable;
use crate::template::{DONE_MARKER, PREAMBLE};

/// Per-suite counters for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct GenerationReport {
    pub suites: Vec<SuiteSummary>,
}

impl GenerationReport {
    pub fn total_cases(&self) -> usize {
        self.suites.iter().map(|s| s.cases).sum()
    }

    pub fn total_signed(&self) -> usize {
        self.suites.iter().map(|s| s.signed_cases).sum()
    }
}

/// Text of the generated test file plus the run report.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    pub text: String,
    pub report: GenerationReport,
}

/// Generates the end-to-end test file from a [`ReferenceSource`].
#[derive(Debug, Clone)]
pub struct Generator<S: ReferenceSource> {
    config: GeneratorConfig,
    source: S,
}

impl<S: ReferenceSource> Generator<S> {
    pub fn new(config: GeneratorConfig, source: S) -> Self {
        Generator { config, source }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs every (message set, version) pair in configuration order, message
    /// sets outermost, and returns the complete file.
    ///
    /// Pairs are processed one after another; each pair's reference binary
    /// finishes before the next is started.
    pub fn generate(&self) -> Result<GeneratedOutput, GenError> {
        let mut text = String::new();
        text.push_str(PREAMBLE);
        text.push('\n');

        let mut ids = TestIds::default();
        let mut report = GenerationReport::default();

        for message_set in &self.config.message_sets {
            for &version in &self.config.versions {
                let output = self.source.reference_output(message_set, version)?;
                let helper = self.source.helper_text(message_set, version)?;
                let table = LongFieldTable::from_helper_text(&helper);

                let (suite, summary) = render_suite(message_set, version, &output, &table, &mut ids)?;
                tracing::info!(
                    "{}/{}: {} test cases ({} signed), {} wrapped fields known",
                    message_set,
                    version,
                    summary.cases,
                    summary.signed_cases,
                    table.len()
                );
                text.push_str(&suite);
                report.suites.push(summary);
            }
        }

        text.push_str(DONE_MARKER);
        text.push('\n');

        tracing::info!(
            "generated {} test cases across {} suites",
            report.total_cases(),
            report.suites.len()
        );
        Ok(GeneratedOutput { text, report })
    }
}
