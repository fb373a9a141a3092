use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;

use super::{Completion, OutputArtifact, ReceivedPayload};
use crate::error::HarnessError;

/// What a finished collection run produced
#[derive(Debug, Clone)]
pub struct CollectionResult {
    /// Address the listener was bound to, if the server reported it
    pub local_addr: Option<SocketAddr>,
    pub payload: ReceivedPayload,
    pub artifact: OutputArtifact,
}

impl CollectionResult {
    pub fn report(&self) -> CollectionReport {
        CollectionReport {
            local_addr: self.local_addr,
            peer_addr: self.payload.peer_addr(),
            bytes: self.payload.len(),
            chunks: self.payload.chunks(),
            completion: self.payload.completion().clone(),
            artifact: self.artifact.path.clone(),
        }
    }
}

/// Serializable summary of a collection run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub local_addr: Option<SocketAddr>,
    pub peer_addr: Option<SocketAddr>,
    pub bytes: usize,
    pub chunks: usize,
    pub completion: Completion,
    pub artifact: PathBuf,
}

impl CollectionReport {
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
