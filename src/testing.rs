//! In-memory [`ReferenceSource`] for tests and benches.

use std::collections::HashMap;

use crate::error::GenError;
use crate::generator::ReferenceSource;
use crate::types::ProtocolVersion;

/// Serves canned reference output and helper text. Pairs without an entry
/// behave like a missing binary or helper file: empty text.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    outputs: HashMap<(String, ProtocolVersion), String>,
    helpers: HashMap<(String, ProtocolVersion), String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, message_set: &str, version: ProtocolVersion, output: &str) -> Self {
        self.outputs.insert((message_set.to_string(), version), output.to_string());
        self
    }

    pub fn with_helper(mut self, message_set: &str, version: ProtocolVersion, helper: &str) -> Self {
        self.helpers.insert((message_set.to_string(), version), helper.to_string());
        self
    }
}

impl ReferenceSource for StaticSource {
    fn reference_output(&self, message_set: &str, version: ProtocolVersion) -> Result<String, GenError> {
        Ok(self.outputs.get(&(message_set.to_string(), version)).cloned().unwrap_or_default())
    }

    fn helper_text(&self, message_set: &str, version: ProtocolVersion) -> Result<String, GenError> {
        Ok(self.helpers.get(&(message_set.to_string(), version)).cloned().unwrap_or_default())
    }
}
