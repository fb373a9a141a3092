use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// How draining a connection ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completion {
    /// The peer closed the connection (zero-length read)
    Completed,
    /// A transport error or idle timeout stopped the read loop early
    Aborted { reason: String },
}

impl Completion {
    pub fn aborted(reason: impl Into<String>) -> Self {
        Completion::Aborted {
            reason: reason.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Completion::Completed)
    }
}

/// Accumulates chunks read from a connection, in arrival order
#[derive(Debug, Default)]
pub struct PayloadBuffer {
    peer_addr: Option<SocketAddr>,
    data: Vec<u8>,
    chunks: usize,
}

impl PayloadBuffer {
    pub fn new(peer_addr: Option<SocketAddr>) -> Self {
        Self {
            peer_addr,
            data: Vec::new(),
            chunks: 0,
        }
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
        self.chunks += 1;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Seal the buffer. The returned payload cannot be extended.
    pub fn finish(self, completion: Completion) -> ReceivedPayload {
        ReceivedPayload {
            peer_addr: self.peer_addr,
            data: self.data,
            chunks: self.chunks,
            completion,
        }
    }
}

/// Everything one peer sent before the connection ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPayload {
    peer_addr: Option<SocketAddr>,
    data: Vec<u8>,
    chunks: usize,
    completion: Completion,
}

impl ReceivedPayload {
    pub fn new(data: impl Into<Vec<u8>>, completion: Completion) -> Self {
        let data = data.into();
        let chunks = usize::from(!data.is_empty());
        Self {
            peer_addr: None,
            data,
            chunks,
            completion,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of non-empty reads that made up the payload
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_concatenates_in_order() {
        let mut buffer = PayloadBuffer::new(None);
        buffer.extend(b"<result>OK");
        buffer.extend(b"</result>");
        let payload = buffer.finish(Completion::Completed);

        assert_eq!(payload.data(), b"<result>OK</result>");
        assert_eq!(payload.chunks(), 2);
        assert!(payload.is_completed());
    }

    #[test]
    fn test_empty_buffer_finishes_empty() {
        let payload = PayloadBuffer::new(None).finish(Completion::Completed);
        assert!(payload.is_empty());
        assert_eq!(payload.chunks(), 0);
    }

    #[test]
    fn test_aborted_payload_keeps_partial_data() {
        let mut buffer = PayloadBuffer::new(None);
        buffer.extend(b"<result>");
        let payload = buffer.finish(Completion::aborted("connection reset"));

        assert_eq!(payload.as_str(), Some("<result>"));
        assert!(!payload.is_completed());
        assert_eq!(
            payload.completion(),
            &Completion::Aborted {
                reason: "connection reset".to_string()
            }
        );
    }

    #[test]
    fn test_payload_as_str_invalid_utf8() {
        let payload = ReceivedPayload::new(vec![0xFF, 0xFE], Completion::Completed);
        assert_eq!(payload.as_str(), None);
    }

    #[test]
    fn test_completion_serializes_with_status_tag() {
        let json = serde_json::to_value(Completion::aborted("timed out")).unwrap();
        assert_eq!(json["status"], "aborted");
        assert_eq!(json["reason"], "timed out");
    }
}
