//! Stream selection: probe candidates in priority order

use std::sync::Arc;
use std::time::Duration as StdDuration;

use tracing::{debug, info, warn};

use crate::domain::recording::Duration;
use crate::domain::stream::{
    CandidateList, ClientHeader, ProbeAttempt, ProbeReport, StreamEndpoint,
    DEFAULT_FALLBACK_COUNT,
};

use super::ports::{MediaTool, ProbeRequest};

/// Called after every probe attempt
pub type ProbeCallback = Arc<dyn Fn(&ProbeAttempt) + Send + Sync>;

/// Probe loop tuning
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Bound on a single probe
    pub timeout: StdDuration,
    /// Pause between consecutive probes
    pub pause: StdDuration,
    /// How many leading candidates the header-less pass retries
    pub fallback_count: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::default_probe_timeout().as_std(),
            pause: StdDuration::from_secs(1),
            fallback_count: DEFAULT_FALLBACK_COUNT,
        }
    }
}

/// Walks a candidate list and picks the first endpoint that decodes.
pub struct StreamProber<'a, M: MediaTool> {
    tool: &'a M,
    header: &'a ClientHeader,
    settings: &'a ProbeSettings,
    on_attempt: Option<ProbeCallback>,
}

impl<'a, M: MediaTool> StreamProber<'a, M> {
    pub fn new(tool: &'a M, header: &'a ClientHeader, settings: &'a ProbeSettings) -> Self {
        Self {
            tool,
            header,
            settings,
            on_attempt: None,
        }
    }

    pub fn with_callback(mut self, on_attempt: Option<ProbeCallback>) -> Self {
        self.on_attempt = on_attempt;
        self
    }

    /// True iff the endpoint decodes within `timeout` with the client header.
    pub async fn probe(&self, endpoint: &StreamEndpoint, timeout: StdDuration) -> bool {
        self.attempt(endpoint, Some(self.header), timeout)
            .await
            .reachable
    }

    /// Full pass with the header, then one header-less pass over the
    /// leading candidates. Never fails: "nothing found" is a report with no
    /// selection.
    pub async fn find_endpoint(&self, candidates: &CandidateList) -> ProbeReport {
        let mut report = ProbeReport::default();

        for endpoint in candidates.iter() {
            if !report.attempts.is_empty() {
                self.pause().await;
            }
            let attempt = self
                .attempt(endpoint, Some(self.header), self.settings.timeout)
                .await;
            let reachable = attempt.reachable;
            report.attempts.push(attempt);
            if reachable {
                info!(url = %endpoint, "selected stream endpoint");
                report.selected = Some(endpoint.clone());
                return report;
            }
        }

        let subset = candidates.fallback_subset(self.settings.fallback_count);
        warn!(
            retries = subset.len(),
            "no candidate answered, retrying without client header"
        );

        for endpoint in subset {
            self.pause().await;
            let attempt = self
                .attempt(endpoint, None, self.settings.timeout)
                .await;
            let reachable = attempt.reachable;
            report.attempts.push(attempt);
            if reachable {
                info!(url = %endpoint, "selected stream endpoint (no header)");
                report.selected = Some(endpoint.clone());
                return report;
            }
        }

        warn!(attempts = report.attempts.len(), "no working stream endpoint");
        report
    }

    async fn attempt(
        &self,
        endpoint: &StreamEndpoint,
        header: Option<&ClientHeader>,
        timeout: StdDuration,
    ) -> ProbeAttempt {
        let request = ProbeRequest {
            endpoint: endpoint.clone(),
            header: header.cloned(),
            timeout,
        };

        debug!(url = %endpoint, header = header.is_some(), "probing");
        let result = self.tool.probe(&request).await;

        let attempt = match result {
            Ok(()) => ProbeAttempt {
                endpoint: endpoint.clone(),
                header_sent: header.is_some(),
                reachable: true,
                failure: None,
            },
            Err(e) => {
                if e.is_timeout() {
                    warn!(url = %endpoint, "probe timed out after {}s", timeout.as_secs());
                } else {
                    debug!(url = %endpoint, error = %e, "probe failed");
                }
                ProbeAttempt {
                    endpoint: endpoint.clone(),
                    header_sent: header.is_some(),
                    reachable: false,
                    failure: Some(last_line(&e.to_string())),
                }
            }
        };

        if let Some(ref cb) = self.on_attempt {
            cb(&attempt);
        }
        attempt
    }

    async fn pause(&self) {
        if !self.settings.pause.is_zero() {
            tokio::time::sleep(self.settings.pause).await;
        }
    }
}

/// ffmpeg stderr can be long; the last line carries the reason
fn last_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or("unknown error")
        .to_string()
}
