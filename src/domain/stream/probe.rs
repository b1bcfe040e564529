//! Probe attempt records

use serde::Serialize;

use super::endpoint::StreamEndpoint;

/// One probe of one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeAttempt {
    pub endpoint: StreamEndpoint,
    pub header_sent: bool,
    pub reachable: bool,
    /// Why the probe failed, if it did
    pub failure: Option<String>,
}

/// Everything the prober did in one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub selected: Option<StreamEndpoint>,
    pub attempts: Vec<ProbeAttempt>,
}

impl ProbeReport {
    pub fn found(&self) -> bool {
        self.selected.is_some()
    }

    /// Attempts made without the client header
    pub fn degraded_attempts(&self) -> impl Iterator<Item = &ProbeAttempt> {
        self.attempts.iter().filter(|a| !a.header_sent)
    }
}
