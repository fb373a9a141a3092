mod sink;

pub use sink::FileSink;
