//! Recording domain types

mod duration;
mod naming;
mod outcome;

pub use duration::{Duration, DEFAULT_DURATION_SECS, DEFAULT_PROBE_TIMEOUT_SECS};
pub use naming::{ArtifactNaming, DEFAULT_PREFIX, TIMESTAMP_FORMAT};
pub use outcome::RecordingOutcome;
