//! stream-capture - record a live audio stream to disk
//!
//! Probes a prioritized list of stream endpoints, records the first one
//! that answers for a bounded duration with ffmpeg, and always leaves an
//! artifact behind: the audio file, or a diagnostic text file on failure.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects (endpoints, durations, outcomes), config and errors
//! - **Application**: Port traits and the probe, record and session use cases
//! - **Infrastructure**: ffmpeg, filesystem and XDG config adapters
//! - **CLI**: Argument parsing, presentation and command runners

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
