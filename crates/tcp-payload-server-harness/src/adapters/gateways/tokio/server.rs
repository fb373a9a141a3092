use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, trace, warn};

use crate::entities::{CollectorState, Completion, Endpoint, PayloadBuffer, ReceivedPayload, Timeouts};
use crate::error::HarnessError;
use crate::use_cases::ports::Server;

/// Size of each read from the connection
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Largest read buffer a collector will allocate (1 MiB)
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

fn advance(state: &mut CollectorState, next: CollectorState) {
    debug_assert!(state.can_transition_to(next), "{} -> {}", state, next);
    debug!(from = %state, to = %next, "Collector state change");
    *state = next;
    if state.is_terminal() {
        debug!(state = %state, "Collector finished");
    }
}

/// Tokio-based single-shot TCP collector
///
/// The listening socket is not held for the life of the process: it is
/// closed as soon as the single connection is accepted. A later connection
/// attempt is therefore refused outright instead of being left queued and
/// unanswered. Either way it is never serviced.
#[derive(Clone)]
pub struct TcpCollector {
    endpoint: Endpoint,
    chunk_size: usize,
    timeouts: Timeouts,
}

impl TcpCollector {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeouts: Timeouts::none(),
        }
    }

    pub fn bind(endpoint: impl Into<Endpoint>) -> Self {
        Self::new(endpoint.into())
    }

    /// Set the read size, clamped to `1..=MAX_CHUNK_SIZE`.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_accept_timeout(mut self, limit: Duration) -> Self {
        self.timeouts.accept = Some(limit);
        self
    }

    pub fn with_read_timeout(mut self, limit: Duration) -> Self {
        self.timeouts.read = Some(limit);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Resolve the endpoint and bind the listening socket
    pub async fn start(&self) -> Result<ListeningCollector, HarnessError> {
        let mut state = CollectorState::Idle;
        info!(endpoint = %self.endpoint, "Binding collector");

        let addr = tokio::net::lookup_host((self.endpoint.host.as_str(), self.endpoint.port))
            .await
            .map_err(|e| HarnessError::ResolveError(format!("{}: {}", self.endpoint, e)))?
            .next()
            .ok_or_else(|| HarnessError::ResolveError(self.endpoint.to_string()))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| HarnessError::BindError {
                addr: addr.to_string(),
                source,
            })?;

        let local_addr = listener.local_addr()?;
        advance(&mut state, CollectorState::Listening);
        info!(%local_addr, "Collector listening");

        Ok(ListeningCollector {
            listener,
            local_addr,
            chunk_size: self.chunk_size,
            timeouts: self.timeouts,
            state,
        })
    }
}

impl Default for TcpCollector {
    fn default() -> Self {
        Self::new(Endpoint::loopback(0))
    }
}

/// A bound collector waiting for its one connection
pub struct ListeningCollector {
    listener: TcpListener,
    local_addr: SocketAddr,
    chunk_size: usize,
    timeouts: Timeouts,
    state: CollectorState,
}

impl ListeningCollector {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    /// Wait for exactly one peer.
    ///
    /// The listening socket is closed once the peer is accepted, so any
    /// later connection attempt is refused.
    pub async fn accept_one(self) -> Result<Connection, HarnessError> {
        let ListeningCollector {
            listener,
            local_addr,
            chunk_size,
            timeouts,
            mut state,
        } = self;

        let accepted = match timeouts.accept {
            Some(limit) => tokio::time::timeout(limit, listener.accept())
                .await
                .map_err(|_| HarnessError::AcceptTimeout(limit))?,
            None => listener.accept().await,
        };
        let (stream, peer_addr) = accepted.map_err(HarnessError::AcceptError)?;

        drop(listener);
        advance(&mut state, CollectorState::Connected);
        info!(%peer_addr, %local_addr, "Connection accepted; listener closed");

        Ok(Connection {
            stream,
            peer_addr,
            chunk_size,
            read_timeout: timeouts.read,
            state,
        })
    }
}

/// The single accepted connection
pub struct Connection {
    stream: TcpStream,
    peer_addr: SocketAddr,
    chunk_size: usize,
    read_timeout: Option<Duration>,
    state: CollectorState,
}

impl Connection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    /// Read until the peer closes or the transport fails.
    ///
    /// Never fails: a read error ends the drain and the bytes gathered so
    /// far are returned with [`Completion::Aborted`].
    pub async fn drain(self) -> ReceivedPayload {
        let Connection {
            mut stream,
            peer_addr,
            chunk_size,
            read_timeout,
            mut state,
        } = self;

        advance(&mut state, CollectorState::Draining);
        let mut buffer = PayloadBuffer::new(Some(peer_addr));
        let mut chunk = vec![0u8; chunk_size];

        let completion = loop {
            let read = match read_timeout {
                Some(limit) => tokio::time::timeout(limit, stream.read(&mut chunk))
                    .await
                    .unwrap_or_else(|_| {
                        Err(std::io::Error::new(
                            ErrorKind::TimedOut,
                            format!("no data received within {:?}", limit),
                        ))
                    }),
                None => stream.read(&mut chunk).await,
            };

            match read {
                Ok(0) => {
                    advance(&mut state, CollectorState::Completed);
                    info!(%peer_addr, bytes = buffer.len(), "Connection closed by peer");
                    break Completion::Completed;
                }
                Ok(n) => {
                    buffer.extend(&chunk[..n]);
                    trace!(read = n, total = buffer.len(), "Chunk received");
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    advance(&mut state, CollectorState::Aborted);
                    warn!(%peer_addr, bytes = buffer.len(), error = %e, "Connection error");
                    break Completion::aborted(e.to_string());
                }
            }
        };

        buffer.finish(completion)
    }
}

#[async_trait]
impl Server for TcpCollector {
    async fn run<F>(&self, on_ready: Option<F>) -> Result<ReceivedPayload, HarnessError>
    where
        F: FnOnce(SocketAddr) + Send + 'static,
    {
        let listening = self.start().await?;

        // Call the on_ready callback if provided
        if let Some(callback) = on_ready {
            callback(listening.local_addr());
        }

        let connection = listening.accept_one().await?;
        Ok(connection.drain().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_tcp_collector_default() {
        let collector = TcpCollector::default();
        assert_eq!(collector.endpoint(), &Endpoint::loopback(0));
        assert_eq!(collector.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(collector.timeouts, Timeouts::none());
    }

    #[test]
    fn test_zero_chunk_size_is_raised() {
        let collector = TcpCollector::default().with_chunk_size(0);
        assert_eq!(collector.chunk_size, 1);
    }

    #[tokio::test]
    async fn test_oversized_chunk_size_is_capped() {
        let collector = TcpCollector::default().with_chunk_size(usize::MAX / 2);
        assert_eq!(collector.chunk_size, MAX_CHUNK_SIZE);

        let listening = collector.start().await.unwrap();
        let addr = listening.local_addr();
        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"<result>OK</result>").await.unwrap();
        });

        let payload = listening.accept_one().await.unwrap().drain().await;
        client.await.unwrap();

        assert_eq!(payload.data(), b"<result>OK</result>");
        assert!(payload.is_completed());
    }

    #[tokio::test]
    async fn test_start_reports_bound_port() {
        let listening = TcpCollector::default().start().await.unwrap();
        assert_ne!(listening.local_addr().port(), 0);
        assert_eq!(listening.state(), CollectorState::Listening);
    }

    #[tokio::test]
    async fn test_small_chunks_keep_order() {
        let listening = TcpCollector::default()
            .with_chunk_size(3)
            .start()
            .await
            .unwrap();
        let addr = listening.local_addr();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"0123456789").await.unwrap();
        });

        let connection = listening.accept_one().await.unwrap();
        assert_eq!(connection.state(), CollectorState::Connected);
        let payload = connection.drain().await;
        client.await.unwrap();

        assert_eq!(payload.data(), b"0123456789");
        assert!(payload.chunks() >= 4);
        assert!(payload.is_completed());
    }
}
