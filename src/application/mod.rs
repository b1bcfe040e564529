//! Application layer - Use cases and port interfaces
//!
//! Contains the core operations (probe, record, session) and trait
//! definitions for external system interactions.

pub mod ports;
pub mod probe;
pub mod record;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export use cases
pub use probe::{ProbeCallback, ProbeSettings, StreamProber};
pub use record::{StreamRecorder, FLUSH_GRACE_SECS};
pub use session::{
    RecordSessionUseCase, SessionCallbacks, SessionInput, SessionOutcome, SessionSettings,
    StreamSelection,
};
