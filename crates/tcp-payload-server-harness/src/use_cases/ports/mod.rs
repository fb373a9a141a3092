mod launcher;
mod server;
mod sink;

pub use launcher::Launcher;
pub use server::Server;
pub use sink::Sink;
