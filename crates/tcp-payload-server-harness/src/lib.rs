//! TCP Payload Server Harness
//!
//! A single-shot TCP collector for test-result payloads. It listens on one
//! endpoint, accepts exactly one connection, reads it until the peer closes,
//! and writes the received bytes verbatim to a file.
//!
//! The wire format is a raw byte stream: no framing, no handshake, no reply.
//! With no timeouts configured the collector waits indefinitely for the peer.
//!
//! # Example
//!
//! ```rust,no_run
//! use tcp_payload_server_harness::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), HarnessError> {
//!     // Listen on every interface, port 50007, and start the test app once bound
//!     let result = CollectionBuilder::new()
//!         .server(TcpCollector::bind(Endpoint::default()))
//!         .sink(FileSink::new("output.xml"))
//!         .launcher(CommandLauncher::new(TargetPlatform::Desktop, "./UnitTests"))
//!         .build()
//!         .execute()
//!         .await?;
//!
//!     // The listener is closed and output.xml holds exactly what was sent
//!     if !result.payload.is_completed() {
//!         eprintln!("connection ended early: {:?}", result.payload.completion());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod adapters;
pub mod entities;
pub mod error;
pub mod use_cases;

pub use error::HarnessError;

#[cfg(feature = "tokio")]
pub use adapters::gateways::{
    CommandLauncher, Connection, FileSink, ListeningCollector, TcpCollector, DEFAULT_CHUNK_SIZE,
    MAX_CHUNK_SIZE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::{
        CollectionReport, CollectionResult, Completion, Endpoint, OutputArtifact,
        ReceivedPayload, TargetPlatform, Timeouts,
    };
    pub use crate::error::HarnessError;
    pub use crate::use_cases::ports::{Launcher, Server, Sink};
    pub use crate::use_cases::CollectionBuilder;

    #[cfg(feature = "tokio")]
    pub use crate::{CommandLauncher, FileSink, TcpCollector};
}
