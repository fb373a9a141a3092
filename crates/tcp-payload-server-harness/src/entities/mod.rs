mod artifact;
mod collection;
mod endpoint;
mod payload;
mod platform;
mod report;
mod state;
mod timeouts;

pub use artifact::{OutputArtifact, DEFAULT_OUTPUT_PATH};
pub use collection::Collection;
pub use endpoint::{Endpoint, DEFAULT_HOST, DEFAULT_PORT};
pub use payload::{Completion, PayloadBuffer, ReceivedPayload};
pub use platform::{LaunchCommand, TargetPlatform};
pub use report::{CollectionReport, CollectionResult};
pub use state::CollectorState;
pub use timeouts::Timeouts;
