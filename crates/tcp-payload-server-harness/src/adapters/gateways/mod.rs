#[cfg(feature = "tokio")]
mod fs;
#[cfg(feature = "tokio")]
mod process;
#[cfg(feature = "tokio")]
mod tokio;

#[cfg(feature = "tokio")]
pub use self::fs::FileSink;
#[cfg(feature = "tokio")]
pub use self::process::CommandLauncher;
#[cfg(feature = "tokio")]
pub use self::tokio::{Connection, ListeningCollector, TcpCollector, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
