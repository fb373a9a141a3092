use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use tcp_payload_server_harness::entities::{
    Endpoint, TargetPlatform, Timeouts, DEFAULT_HOST, DEFAULT_OUTPUT_PATH, DEFAULT_PORT,
};
use tcp_payload_server_harness::{CommandLauncher, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

fn parse_chunk_size(value: &str) -> Result<usize, String> {
    let size: usize = value.parse().map_err(|e| format!("{}", e))?;
    if (1..=MAX_CHUNK_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("must be between 1 and {} bytes", MAX_CHUNK_SIZE))
    }
}

/// Wait for one test-result upload and write it to disk.
#[derive(Parser, Debug)]
#[command(name = "result-collector", version, about)]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "RESULT_COLLECTOR_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on.
    #[arg(short = 'p', long, env = "RESULT_COLLECTOR_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// File the payload is written to (overwritten).
    #[arg(short = 'o', long, env = "RESULT_COLLECTOR_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Bytes requested per read (at most 1 MiB).
    #[arg(
        long,
        env = "RESULT_COLLECTOR_CHUNK_SIZE",
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = parse_chunk_size
    )]
    pub chunk_size: usize,

    /// Give up if nobody connects within this many seconds (default: wait forever).
    #[arg(long, env = "RESULT_COLLECTOR_ACCEPT_TIMEOUT", value_name = "SECS")]
    pub accept_timeout: Option<u64>,

    /// Stop reading after this many idle seconds (default: wait forever).
    #[arg(long, env = "RESULT_COLLECTOR_READ_TIMEOUT", value_name = "SECS")]
    pub read_timeout: Option<u64>,

    /// Platform of the test app to launch once listening.
    #[arg(long, env = "RESULT_COLLECTOR_PLATFORM", requires = "app")]
    pub platform: Option<TargetPlatform>,

    /// Executable, activity or bundle of the test app.
    #[arg(long, env = "RESULT_COLLECTOR_APP", requires = "platform")]
    pub app: Option<String>,

    /// Host handed to the test app instead of the bound address.
    #[arg(long, env = "RESULT_COLLECTOR_ADVERTISE_HOST")]
    pub advertise_host: Option<String>,

    /// Print a JSON summary of the run to stdout.
    #[arg(long)]
    pub report_json: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

impl Cli {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            accept: self.accept_timeout.map(Duration::from_secs),
            read: self.read_timeout.map(Duration::from_secs),
        }
    }

    pub fn launcher(&self) -> Option<CommandLauncher> {
        let (platform, app) = (self.platform?, self.app.as_ref()?);
        let launcher = CommandLauncher::new(platform, app.clone());
        Some(match &self.advertise_host {
            Some(host) => launcher.with_advertised_host(host.clone()),
            None => launcher,
        })
    }
}
