//! Generator configuration.
//!
//! With no config file the generator runs the same matrix it always has:
//! `ardupilotmega` and `common`, each for 1.0 and 2.0, with binaries and
//! helper files at their usual places relative to the test directory.

use std::path::{Path, PathBuf};

use crate::error::GenError;
use crate::types::{MessageSetName, ProtocolVersion};

pub const DEFAULT_MESSAGE_SETS: [&str; 2] = ["ardupilotmega", "common"];
pub const DEFAULT_REFERENCE_DIR: &str = "../../../generator/C/test/posix/";
pub const DEFAULT_IMPLEMENTATIONS_DIR: &str = "../implementations";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Message sets, in output order.
    pub message_sets: Vec<MessageSetName>,
    /// Protocol versions to generate for each message set, in output order.
    pub versions: Vec<ProtocolVersion>,
    /// Directory holding the `testmav<version>_<set>` binaries.
    pub reference_dir: PathBuf,
    /// Directory holding `mavlink_<set>_v<version>/mavlink.tests.js`.
    pub implementations_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            message_sets: DEFAULT_MESSAGE_SETS.iter().map(|s| s.to_string()).collect(),
            versions: ProtocolVersion::ALL.to_vec(),
            reference_dir: PathBuf::from(DEFAULT_REFERENCE_DIR),
            implementations_dir: PathBuf::from(DEFAULT_IMPLEMENTATIONS_DIR),
        }
    }
}

impl GeneratorConfig {
    /// Parses a JSON config; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, GenError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let json = std::fs::read_to_string(path)?;
        tracing::debug!("loading config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Message set names become part of file names, so they must be plain
    /// identifiers.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.message_sets.is_empty() {
            return Err(GenError::Config("message_sets must not be empty".to_string()));
        }
        if self.versions.is_empty() {
            return Err(GenError::Config("versions must not be empty".to_string()));
        }
        for set in &self.message_sets {
            if set.is_empty() || !set.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
                return Err(GenError::Config(format!("invalid message set name `{}`", set)));
            }
        }
        Ok(())
    }
}
