use async_trait::async_trait;
use crate::entities::{OutputArtifact, ReceivedPayload};
use crate::error::HarnessError;

/// Trait for persisting a received payload
///
/// Implementations write the bytes verbatim and replace any previous artifact.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn persist(&self, payload: &ReceivedPayload) -> Result<OutputArtifact, HarnessError>;
}
