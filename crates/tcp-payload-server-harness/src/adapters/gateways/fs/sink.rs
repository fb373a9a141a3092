use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::entities::{OutputArtifact, ReceivedPayload, DEFAULT_OUTPUT_PATH};
use crate::error::HarnessError;
use crate::use_cases::ports::Sink;

/// Writes the payload to a file, replacing previous content
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, source: std::io::Error) -> HarnessError {
        HarnessError::PersistError {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_PATH)
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn persist(&self, payload: &ReceivedPayload) -> Result<OutputArtifact, HarnessError> {
        debug!(path = %self.path.display(), bytes = payload.len(), "Writing artifact");

        // The handle is dropped on every return path, including write errors
        let mut file = tokio::fs::File::create(&self.path)
            .await
            .map_err(|e| self.error(e))?;
        file.write_all(payload.data())
            .await
            .map_err(|e| self.error(e))?;
        file.flush().await.map_err(|e| self.error(e))?;

        Ok(OutputArtifact::new(&self.path, payload.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Completion;

    #[tokio::test]
    async fn test_persist_writes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("output.xml"));
        let payload = ReceivedPayload::new(vec![0x00, 0xFF, b'\n', b'<'], Completion::Completed);

        let artifact = sink.persist(&payload).await.unwrap();

        assert_eq!(artifact.bytes_written, 4);
        assert_eq!(std::fs::read(sink.path()).unwrap(), vec![0x00, 0xFF, b'\n', b'<']);
    }

    #[tokio::test]
    async fn test_persist_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.xml");
        std::fs::write(&path, b"a much longer previous report").unwrap();

        let sink = FileSink::new(&path);
        sink.persist(&ReceivedPayload::new(b"short".to_vec(), Completion::Completed))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"short");
    }

    #[tokio::test]
    async fn test_persist_empty_payload_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.xml");

        FileSink::new(&path)
            .persist(&ReceivedPayload::new(Vec::new(), Completion::Completed))
            .await
            .unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_persist_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("missing").join("output.xml"));

        let result = sink
            .persist(&ReceivedPayload::new(b"x".to_vec(), Completion::Completed))
            .await;

        assert!(matches!(result, Err(HarnessError::PersistError { .. })));
    }
}
