use crate::use_cases::ports::Launcher;

/// A collection run: where to listen, where to write, and what to launch
pub struct Collection<S, K> {
    pub(crate) server: S,
    pub(crate) sink: K,
    pub(crate) launcher: Option<Box<dyn Launcher>>,
}
