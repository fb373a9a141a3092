mod server;

pub use server::{Connection, ListeningCollector, TcpCollector, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
