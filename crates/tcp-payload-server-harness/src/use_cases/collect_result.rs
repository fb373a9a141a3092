use futures::channel::oneshot;
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::entities::{Collection, CollectionResult, Completion};
use crate::error::HarnessError;
use crate::use_cases::ports::{Launcher, Server, Sink};

/// Builder for creating collection runs with a fluent API
///
/// # Example
///
/// ```rust,no_run
/// use tcp_payload_server_harness::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), HarnessError> {
///     let result = CollectionBuilder::new()
///         .server(TcpCollector::bind(Endpoint::default()))
///         .sink(FileSink::new("output.xml"))
///         .build()
///         .execute()
///         .await?;
///
///     println!("received {} bytes", result.payload.len());
///     Ok(())
/// }
/// ```
pub struct CollectionBuilder<S, K> {
    server: Option<S>,
    sink: Option<K>,
    launcher: Option<Box<dyn Launcher>>,
}

impl CollectionBuilder<(), ()> {
    /// Create a new collection builder
    pub fn new() -> Self {
        Self {
            server: None,
            sink: None,
            launcher: None,
        }
    }
}

impl Default for CollectionBuilder<(), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, K> CollectionBuilder<S, K> {
    /// Set the server implementation to use
    pub fn server<NewS: Server>(self, server: NewS) -> CollectionBuilder<NewS, K> {
        CollectionBuilder {
            server: Some(server),
            sink: self.sink,
            launcher: self.launcher,
        }
    }

    /// Set where the payload is persisted
    pub fn sink<NewK: Sink>(self, sink: NewK) -> CollectionBuilder<S, NewK> {
        CollectionBuilder {
            server: self.server,
            sink: Some(sink),
            launcher: self.launcher,
        }
    }

    /// Start an external process once the server is listening
    pub fn launcher(mut self, launcher: impl Launcher + 'static) -> Self {
        self.launcher = Some(Box::new(launcher));
        self
    }
}

impl<S: Server + 'static, K: Sink + 'static> CollectionBuilder<S, K> {
    /// Build the collection
    pub fn build(self) -> Collection<S, K> {
        Collection {
            server: self.server.expect("Server must be set before building"),
            sink: self.sink.expect("Sink must be set before building"),
            launcher: self.launcher,
        }
    }

    /// Build the collection, reporting a missing server or sink as an error
    pub fn try_build(self) -> Result<Collection<S, K>, HarnessError> {
        let server = self
            .server
            .ok_or_else(|| HarnessError::ConfigurationError("server is not set".to_string()))?;
        let sink = self
            .sink
            .ok_or_else(|| HarnessError::ConfigurationError("sink is not set".to_string()))?;
        Ok(Collection {
            server,
            sink,
            launcher: self.launcher,
        })
    }

    /// Execute the collection directly from the builder
    pub async fn execute(self) -> Result<CollectionResult, HarnessError> {
        self.try_build()?.execute().await
    }
}

impl<S: Server + 'static, K: Sink + 'static> Collection<S, K> {
    /// Execute the collection.
    ///
    /// Waits for exactly one peer, reads until it closes, then persists the
    /// payload. Payloads cut short by a transport error are persisted too;
    /// only the logged outcome and `payload.completion()` differ.
    pub async fn execute(self) -> Result<CollectionResult, HarnessError> {
        let Collection {
            server,
            sink,
            launcher,
        } = self;

        let (ready_tx, ready_rx) = oneshot::channel::<SocketAddr>();

        let receive = server.run(Some(move |addr: SocketAddr| {
            let _ = ready_tx.send(addr);
        }));

        let launch = async move {
            // A dropped sender means the server stopped before listening; its error wins
            let Ok(addr) = ready_rx.await else {
                return Ok(None);
            };
            if let Some(launcher) = &launcher {
                launcher.launch(addr).await?;
            }
            Ok::<_, HarnessError>(Some(addr))
        };

        let (payload, local_addr) = futures::future::try_join(receive, launch).await?;

        match payload.completion() {
            Completion::Completed => {
                info!(bytes = payload.len(), chunks = payload.chunks(), "Payload complete");
            }
            Completion::Aborted { reason } => {
                warn!(
                    bytes = payload.len(),
                    %reason,
                    "Payload may be truncated; persisting what was received"
                );
            }
        }

        let artifact = sink.persist(&payload).await?;
        info!(
            path = %artifact.path.display(),
            bytes = artifact.bytes_written,
            "Artifact written"
        );

        Ok(CollectionResult {
            local_addr,
            payload,
            artifact,
        })
    }
}
