use std::fmt;

/// Phases of a single collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorState {
    Idle,
    Listening,
    Connected,
    Draining,
    Completed,
    Aborted,
}

impl CollectorState {
    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: CollectorState) -> bool {
        use CollectorState::*;
        matches!(
            (self, next),
            (Idle, Listening)
                | (Listening, Connected)
                | (Connected, Draining)
                | (Draining, Completed)
                | (Draining, Aborted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CollectorState::Completed | CollectorState::Aborted)
    }
}

impl fmt::Display for CollectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollectorState::Idle => "idle",
            CollectorState::Listening => "listening",
            CollectorState::Connected => "connected",
            CollectorState::Draining => "draining",
            CollectorState::Completed => "completed",
            CollectorState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
