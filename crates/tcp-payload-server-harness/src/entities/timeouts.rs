use std::time::Duration;

/// Optional bounds on the blocking phases.
///
/// Both default to `None`: the collector waits forever for a peer to
/// connect and for each read to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    /// Limit on waiting for the single connection
    pub accept: Option<Duration>,
    /// Limit on each individual read; an idle peer aborts the drain
    pub read: Option<Duration>,
}

impl Timeouts {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_accept(mut self, limit: Duration) -> Self {
        self.accept = Some(limit);
        self
    }

    pub fn with_read(mut self, limit: Duration) -> Self {
        self.read = Some(limit);
        self
    }
}
