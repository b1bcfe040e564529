//! Scripted port doubles shared by the use case tests

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::ports::{
    ArtifactStore, CaptureRequest, MediaTool, ProbeRequest, StoreError, ToolError,
};

/// In-memory file table: path -> size
pub type Files = Arc<Mutex<HashMap<PathBuf, u64>>>;

/// What a scripted capture does
#[derive(Debug, Clone)]
pub enum CaptureScript {
    /// Exit 0 and leave a file of this many bytes
    Write(u64),
    /// Exit 0 without producing a file
    ExitZeroNoFile,
    Fail(ToolError),
    /// Leave a partial file of this many bytes, then fail
    WriteThenFail(u64, ToolError),
}

/// Media tool whose probe answers are looked up by URL and header mode.
pub struct ScriptedTool {
    /// Endpoints that answer when probed with the header
    pub live_with_header: Vec<String>,
    /// Endpoints that answer only when probed without it
    pub live_without_header: Vec<String>,
    /// Failure returned for every other probe
    pub probe_failure: ToolError,
    /// Per-URL override of `probe_failure`
    pub probe_failures: HashMap<String, ToolError>,
    pub capture: CaptureScript,
    pub files: Files,
    pub probes: Mutex<Vec<ProbeRequest>>,
    pub captures: Mutex<Vec<CaptureRequest>>,
}

impl ScriptedTool {
    pub fn new(files: Files) -> Self {
        Self {
            live_with_header: Vec::new(),
            live_without_header: Vec::new(),
            probe_failure: ToolError::NonZeroExit {
                code: Some(1),
                stderr: "Connection refused".to_string(),
            },
            probe_failures: HashMap::new(),
            capture: CaptureScript::Write(4096),
            files,
            probes: Mutex::new(Vec::new()),
            captures: Mutex::new(Vec::new()),
        }
    }

    pub fn live(mut self, url: &str) -> Self {
        self.live_with_header.push(url.to_string());
        self
    }

    pub fn live_without_header(mut self, url: &str) -> Self {
        self.live_without_header.push(url.to_string());
        self
    }

    pub fn failing_with(mut self, url: &str, err: ToolError) -> Self {
        self.probe_failures.insert(url.to_string(), err);
        self
    }

    pub fn capture(mut self, script: CaptureScript) -> Self {
        self.capture = script;
        self
    }

    pub fn probed_urls(&self) -> Vec<(String, bool)> {
        self.probes
            .lock()
            .unwrap()
            .iter()
            .map(|p| (p.endpoint.to_string(), p.header.is_some()))
            .collect()
    }

    pub fn captured_urls(&self) -> Vec<String> {
        self.captures
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.endpoint.to_string())
            .collect()
    }
}

#[async_trait]
impl MediaTool for ScriptedTool {
    async fn probe(&self, request: &ProbeRequest) -> Result<(), ToolError> {
        self.probes.lock().unwrap().push(request.clone());
        let url = request.endpoint.to_string();
        let live = if request.header.is_some() {
            &self.live_with_header
        } else {
            &self.live_without_header
        };
        if live.contains(&url) {
            return Ok(());
        }
        Err(self
            .probe_failures
            .get(&url)
            .cloned()
            .unwrap_or_else(|| self.probe_failure.clone()))
    }

    async fn capture(&self, request: &CaptureRequest) -> Result<(), ToolError> {
        self.captures.lock().unwrap().push(request.clone());
        match &self.capture {
            CaptureScript::Write(size) => {
                self.files
                    .lock()
                    .unwrap()
                    .insert(request.output.clone(), *size);
                Ok(())
            }
            CaptureScript::ExitZeroNoFile => Ok(()),
            CaptureScript::Fail(err) => Err(err.clone()),
            CaptureScript::WriteThenFail(size, err) => {
                self.files
                    .lock()
                    .unwrap()
                    .insert(request.output.clone(), *size);
                Err(err.clone())
            }
        }
    }
}

/// Artifact store over the shared in-memory file table
#[derive(Default)]
pub struct MemoryStore {
    pub files: Files,
    pub dirs: Mutex<Vec<PathBuf>>,
    pub texts: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryStore {
    pub fn new(files: Files) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn ensure_dir(&self, dir: &Path) -> Result<(), StoreError> {
        self.dirs.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<(), StoreError> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn file_size(&self, path: &Path) -> Option<u64> {
        self.files.lock().unwrap().get(path).copied()
    }

    async fn write_text(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.len() as u64);
        self.texts
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
