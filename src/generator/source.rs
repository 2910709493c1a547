//! Where reference output and helper text come from.
//!
//! The generator only sees text. `ProcessSource` gets that text by running
//! the reference binaries and reading the helper files from disk; tests use
//! an in-memory source instead.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::types::ProtocolVersion;

/// Supplier of the two inputs for one (message set, version) pair.
pub trait ReferenceSource {
    /// Complete standard output of the reference binary for the pair.
    fn reference_output(&self, message_set: &str, version: ProtocolVersion) -> Result<String, GenError>;

    /// Text of the generated helper file for the pair. Only its wrapping
    /// syntax is used, it is never executed.
    fn helper_text(&self, message_set: &str, version: ProtocolVersion) -> Result<String, GenError>;
}

/// `testmav<version>_<messageset>`, e.g. `testmav2.0_common`.
pub fn binary_name(message_set: &str, version: ProtocolVersion) -> String {
    format!("testmav{}_{}", version, message_set)
}

/// `<dir>/mavlink_<set>_v<version>/mavlink.tests.js`.
pub fn helper_path(implementations_dir: &Path, message_set: &str, version: ProtocolVersion) -> PathBuf {
    implementations_dir
        .join(format!("mavlink_{}_v{}", message_set, version))
        .join("mavlink.tests.js")
}

/// Runs reference binaries as child processes, one at a time, and reads
/// helper files directly.
#[derive(Debug, Clone)]
pub struct ProcessSource {
    reference_dir: PathBuf,
    implementations_dir: PathBuf,
}

impl ProcessSource {
    pub fn new(reference_dir: impl Into<PathBuf>, implementations_dir: impl Into<PathBuf>) -> Self {
        ProcessSource {
            reference_dir: reference_dir.into(),
            implementations_dir: implementations_dir.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        ProcessSource::new(&config.reference_dir, &config.implementations_dir)
    }

    pub fn binary_path(&self, message_set: &str, version: ProtocolVersion) -> PathBuf {
        self.reference_dir.join(binary_name(message_set, version))
    }
}

impl ReferenceSource for ProcessSource {
    /// A binary that cannot be started yields empty output. A binary that
    /// exits non-zero still has whatever it printed parsed.
    fn reference_output(&self, message_set: &str, version: ProtocolVersion) -> Result<String, GenError> {
        let path = self.binary_path(message_set, version);
        let output = match Command::new(&path).output() {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!("could not run reference binary {}: {}", path.display(), err);
                return Ok(String::new());
            }
        };
        if !output.status.success() {
            tracing::warn!(
                "reference binary {} exited with {} after {} bytes of output",
                path.display(),
                output.status,
                output.stdout.len()
            );
        }
        String::from_utf8(output.stdout).map_err(|_| GenError::NonUtf8Output {
            binary: path.display().to_string(),
        })
    }

    fn helper_text(&self, message_set: &str, version: ProtocolVersion) -> Result<String, GenError> {
        let path = helper_path(&self.implementations_dir, message_set, version);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!("helper file {} not found, no fields will be wrapped", path.display());
                Ok(String::new())
            }
            Err(err) => Err(err.into()),
        }
    }
}
