//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod report;
pub mod stream;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use recording::{ArtifactNaming, Duration, RecordingOutcome};
pub use report::DiagnosticReport;
pub use stream::{AudioEncoding, CandidateList, ClientHeader, ProbeAttempt, ProbeReport, StreamEndpoint};
