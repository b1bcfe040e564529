//! Stream endpoints and the prioritized candidate list

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::EndpointParseError;

/// Endpoint used when nothing else is configured (direct mode)
pub const DEFAULT_STREAM_URL: &str = "https://audiovisual.ec.europa.eu/en/ebs/live/2";

/// Built-in candidates, highest priority first: official sources, then
/// regional fallbacks, then an international broadcaster as last resort.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "https://audiovisual.ec.europa.eu/en/ebs/live/2",
    "https://audiovisual.ec.europa.eu/en/ebs/live/1",
    "https://audiovisual.ec.europa.eu/en/ebs/live/3",
    "https://http-live.sr.se/p1-mp3-192",
    "https://icecast.omroep.nl/radio1-bb-mp3",
    "https://stream.live.vc.bbcmedia.co.uk/bbc_world_service",
];

/// Number of leading candidates retried without the client header
pub const DEFAULT_FALLBACK_COUNT: usize = 3;

/// A validated stream URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StreamEndpoint(String);

impl StreamEndpoint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StreamEndpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let valid = trimmed
            .split_once("://")
            .map(|(scheme, rest)| {
                !scheme.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                    && !rest.is_empty()
                    && !rest.chars().any(char::is_whitespace)
            })
            .unwrap_or(false);

        if !valid {
            return Err(EndpointParseError {
                input: s.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for StreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty list of endpoints. Order is priority.
///
/// A preferred endpoint is probed first but never counts toward the
/// header-less fallback subset, which is always taken from the base list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    preferred: Option<StreamEndpoint>,
    endpoints: Vec<StreamEndpoint>,
}

impl CandidateList {
    /// Returns `None` for an empty list
    pub fn new(endpoints: Vec<StreamEndpoint>) -> Option<Self> {
        if endpoints.is_empty() {
            None
        } else {
            Some(Self {
                preferred: None,
                endpoints,
            })
        }
    }

    /// Parse every URL, failing on the first invalid one
    pub fn parse<S: AsRef<str>>(urls: &[S]) -> Result<Option<Self>, EndpointParseError> {
        let endpoints = urls
            .iter()
            .map(|u| u.as_ref().parse())
            .collect::<Result<Vec<StreamEndpoint>, _>>()?;
        Ok(Self::new(endpoints))
    }

    /// The built-in list
    pub fn builtin() -> Self {
        Self {
            preferred: None,
            endpoints: DEFAULT_CANDIDATES
                .iter()
                .map(|u| StreamEndpoint((*u).to_string()))
                .collect(),
        }
    }

    /// Probe `endpoint` first; a later duplicate is skipped in the full pass
    pub fn with_preferred(mut self, endpoint: StreamEndpoint) -> Self {
        self.preferred = Some(endpoint);
        self
    }

    /// The first `count` entries of the base list (fewer if it is shorter)
    pub fn fallback_subset(&self, count: usize) -> &[StreamEndpoint] {
        &self.endpoints[..count.min(self.endpoints.len())]
    }

    /// Full-pass order: the preferred endpoint, then the base list
    pub fn iter(&self) -> impl Iterator<Item = &StreamEndpoint> {
        let preferred = self.preferred.as_ref();
        preferred
            .into_iter()
            .chain(self.endpoints.iter().filter(move |e| Some(*e) != preferred))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Static client header sent to stream servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHeader {
    pub name: String,
    pub value: String,
}

/// Default User-Agent presented to stream servers
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

impl ClientHeader {
    pub fn user_agent(value: impl Into<String>) -> Self {
        Self {
            name: "User-Agent".to_string(),
            value: value.into(),
        }
    }

    /// Header line in the CRLF-terminated form ffmpeg's `-headers` expects
    pub fn to_header_line(&self) -> String {
        format!("{}: {}\r\n", self.name, self.value)
    }
}

impl Default for ClientHeader {
    fn default() -> Self {
        Self::user_agent(DEFAULT_USER_AGENT)
    }
}
