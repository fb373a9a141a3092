// result-collector
//
// Listens for a single test-result upload, writes it to disk, and exits.
// Exits non-zero when the endpoint cannot be bound, no peer connects in time,
// the test app cannot be launched, or the artifact cannot be written.

mod cli;
mod logging;

use clap::Parser;
use std::process::ExitCode;
use tcp_payload_server_harness::prelude::*;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(cli.debug);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        endpoint = %cli.endpoint(),
        output = %cli.output.display(),
        "result-collector starting"
    );

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Collection failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<(), HarnessError> {
    let server = TcpCollector::bind(cli.endpoint())
        .with_chunk_size(cli.chunk_size)
        .with_timeouts(cli.timeouts());

    let mut builder = CollectionBuilder::new()
        .server(server)
        .sink(FileSink::new(&cli.output));
    if let Some(launcher) = cli.launcher() {
        builder = builder.launcher(launcher);
    }

    let result = builder.execute().await?;

    if cli.report_json {
        println!("{}", result.report().to_json()?);
    }

    Ok(())
}
