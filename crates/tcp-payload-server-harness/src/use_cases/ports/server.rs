use async_trait::async_trait;
use crate::entities::ReceivedPayload;
use crate::error::HarnessError;
use std::net::SocketAddr;

/// Trait for single-shot payload servers
#[async_trait]
pub trait Server: Send + Sync + Clone {
    /// Listen, accept exactly one connection and read it until the peer closes.
    ///
    /// If `on_ready` is provided, it will be called with the actual bound address
    /// once the server is ready to accept the connection.
    async fn run<F>(&self, on_ready: Option<F>) -> Result<ReceivedPayload, HarnessError>
    where
        F: FnOnce(SocketAddr) + Send + 'static;
}
