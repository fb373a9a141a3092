use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where the payload is written when no path is given
pub const DEFAULT_OUTPUT_PATH: &str = "output.xml";

/// A file produced from a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub bytes_written: usize,
}

impl OutputArtifact {
    pub fn new(path: impl AsRef<Path>, bytes_written: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            bytes_written,
        }
    }
}
