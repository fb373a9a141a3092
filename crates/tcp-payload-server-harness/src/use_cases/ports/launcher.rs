use async_trait::async_trait;
use crate::error::HarnessError;
use std::net::SocketAddr;

/// Trait for starting the external process that sends the payload
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Start the process and point it at `addr`. Must not wait for it to exit.
    async fn launch(&self, addr: SocketAddr) -> Result<(), HarnessError>;
}
