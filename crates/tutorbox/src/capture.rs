//! Output capture scope for snippet execution
//!
//! A [`CaptureScope`] is the per-run workspace: a private scratch directory
//! the snippet runs in, plus two append-only in-memory sinks that receive
//! everything the run writes to its standard output and standard error.
//!
//! Only one scope may be active at a time. The executor enforces this by
//! construction: opening a scope consumes the permit of a single-slot gate,
//! and the permit is released when the scope is dropped. The host process's
//! own stdio is never redirected; capture applies to the child only. Teardown
//! (scratch removal, gate release) happens on every exit path, including
//! faults and timeouts, because both resources are owned by the scope.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::TempDir;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinHandle;
use tracing::debug;

/// Errors that occur managing a capture scope
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only in-memory sink for one captured stream
#[derive(Debug, Clone, Default)]
pub struct Sink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Sink {
    fn new() -> Self {
        Self::default()
    }

    /// Append data, discarding anything beyond `cap` bytes
    fn push(&self, data: &[u8], cap: usize) {
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        if buf.len() >= cap {
            return;
        }
        let room = cap - buf.len();
        buf.extend_from_slice(&data[..data.len().min(room)]);
    }

    /// The captured bytes so far
    pub fn contents(&self) -> Vec<u8> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The captured bytes so far, lossily decoded as UTF-8
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

/// One run's capture scope: scratch directory, output sinks, and the
/// execution gate permit.
///
/// Dropping the scope removes the scratch directory (and everything the
/// snippet wrote into it) and releases the gate, on every exit path.
#[derive(Debug)]
pub struct CaptureScope {
    workdir: TempDir,
    stdout: Sink,
    stderr: Sink,
    _permit: OwnedSemaphorePermit,
}

impl CaptureScope {
    /// Open a new scope, creating its scratch directory.
    ///
    /// The caller must hold the permit of the executor's single-slot gate;
    /// passing it in ties the gate's release to the scope's teardown.
    pub(crate) fn open(
        permit: OwnedSemaphorePermit,
        scratch_root: Option<&Path>,
    ) -> Result<Self, CaptureError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tutorbox-");

        let workdir = match scratch_root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(CaptureError::Scratch)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(CaptureError::Scratch)?;

        debug!(path = %workdir.path().display(), "opened capture scope");

        Ok(Self {
            workdir,
            stdout: Sink::new(),
            stderr: Sink::new(),
            _permit: permit,
        })
    }

    /// Path of the scratch directory
    pub fn path(&self) -> &Path {
        self.workdir.path()
    }

    /// Write a file into the scratch directory
    ///
    /// Returns an error if the name contains path traversal attempts.
    pub fn write_file(&self, name: &str, content: &[u8]) -> Result<PathBuf, CaptureError> {
        if name.contains("..") || name.starts_with('/') {
            return Err(CaptureError::InvalidPath(format!(
                "path traversal not allowed: {name}"
            )));
        }
        let path = self.workdir.path().join(name);
        std::fs::write(&path, content)?;
        debug!(path = %path.display(), len = content.len(), "wrote file to scope");
        Ok(path)
    }

    /// Handle to the stdout sink
    pub fn stdout_sink(&self) -> Sink {
        self.stdout.clone()
    }

    /// Handle to the stderr sink
    pub fn stderr_sink(&self) -> Sink {
        self.stderr.clone()
    }

    /// Captured stdout so far, lossily decoded
    pub fn stdout_text(&self) -> String {
        self.stdout.to_text()
    }

    /// Captured stderr so far, lossily decoded
    pub fn stderr_text(&self) -> String {
        self.stderr.to_text()
    }

    /// Drain a child stream into a sink until EOF, capping captured bytes
    pub(crate) fn drain(
        mut stream: impl AsyncRead + Unpin + Send + 'static,
        sink: Sink,
        cap: usize,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut chunk = [0u8; 8192];
            loop {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    // Keep reading past the cap so the child never blocks on
                    // a full pipe; excess bytes are discarded by the sink.
                    Ok(n) => sink.push(&chunk[..n], cap),
                }
            }
        })
    }
}
