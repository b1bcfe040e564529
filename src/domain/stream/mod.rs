//! Stream endpoints, encoding and probe records

mod encoding;
mod endpoint;
mod probe;

pub use encoding::AudioEncoding;
pub use endpoint::{
    CandidateList, ClientHeader, StreamEndpoint, DEFAULT_CANDIDATES, DEFAULT_FALLBACK_COUNT,
    DEFAULT_STREAM_URL, DEFAULT_USER_AGENT,
};
pub use probe::{ProbeAttempt, ProbeReport};
