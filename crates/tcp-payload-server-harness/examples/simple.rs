//! Simple example demonstrating basic usage of tcp-payload-server-harness
//!
//! This example shows how to:
//! - Bind a single-shot collector with the Builder pattern
//! - Upload a result from another task, the way a test device would
//! - Read back the written artifact
//!
//! The listener closes as soon as the one connection is accepted.

use std::net::SocketAddr;
use std::time::Duration;
use tcp_payload_server_harness::prelude::*;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), HarnessError> {
    let addr: SocketAddr = "127.0.0.1:50007".parse().unwrap();
    let output = std::env::temp_dir().join("output.xml");

    // Spawn a task that plays the device uploading its report
    let device = tokio::spawn(async move {
        let mut stream = loop {
            match TcpStream::connect(addr).await {
                Ok(stream) => break stream,
                Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        };
        println!("Connected to {}", addr);

        stream.write_all(b"<result>OK").await.expect("write failed");
        stream.write_all(b"</result>").await.expect("write failed");
        // Closing the connection ends the upload
    });

    let result = CollectionBuilder::new()
        .server(TcpCollector::bind(addr).with_accept_timeout(Duration::from_secs(10)))
        .sink(FileSink::new(&output))
        .build()
        .execute()
        .await?;

    device.await.expect("Device task panicked");

    println!("=== Collection Report ===");
    println!("{}", result.report().to_json()?);
    println!("Artifact: {}", std::fs::read_to_string(&output)?);

    Ok(())
}
