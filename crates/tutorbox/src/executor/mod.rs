//! Snippet execution
//!
//! Runs untrusted source text in an isolated interpreter child process and
//! converts every outcome into an [`ExecutionResult`]. Syntax faults, runtime
//! faults, timeouts, and sandbox violations are contained in the result;
//! [`ExecuteError`] is reserved for host-side problems such as a missing
//! interpreter or scratch directory I/O failures.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::capture::{CaptureError, CaptureScope};
use crate::config::Config;
use crate::types::{ExecutionResult, FaultInfo, FaultKind, RunLimits};

mod fault;

/// Sandbox harness injected ahead of the snippet when sandboxing is enabled
const HARNESS: &str = include_str!("harness.py");
const HARNESS_NAME: &str = "_harness.py";

/// How long to wait for the output pipes to reach EOF after the child exits
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Await a drain task, abandoning it if the pipe never reaches EOF
async fn join_drain(task: Option<JoinHandle<()>>, grace: Duration) {
    let Some(mut task) = task else { return };
    if tokio::time::timeout(grace, &mut task).await.is_err() {
        warn!("output pipe still open after the drain grace period");
        task.abort();
    }
}

/// Errors that occur on the host side of an execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("failed to spawn interpreter '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("interpreter command is empty")]
    EmptyCommand,

    #[error("invalid wall time limit: {0} (must be a finite positive number of seconds)")]
    InvalidWallTime(f64),

    #[error("capture scope error: {0}")]
    Capture(#[from] CaptureError),

    #[error("execution gate closed")]
    GateClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Executor for untrusted snippets
///
/// Cloning shares the single-slot execution gate, so all clones together
/// still run at most one snippet at a time.
#[derive(Debug, Clone)]
pub struct Executor {
    config: Config,
    gate: Arc<Semaphore>,
}

impl Executor {
    /// Create a new executor with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            gate: Arc::new(Semaphore::new(1)),
        }
    }

    /// Create a new executor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(Config::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute a snippet with the configured default limits
    pub async fn execute(&self, source: &str) -> Result<ExecutionResult, ExecuteError> {
        self.execute_with(source, None).await
    }

    /// Execute a snippet, layering `limits` over the configured defaults
    ///
    /// Blocks until the execution gate is free, runs the snippet to
    /// completion or until the wall clock limit expires, and returns the
    /// captured output together with the fault classification. Whatever the
    /// snippet printed before faulting or being aborted is preserved.
    #[instrument(skip(self, source, limits))]
    pub async fn execute_with(
        &self,
        source: &str,
        limits: Option<&RunLimits>,
    ) -> Result<ExecutionResult, ExecuteError> {
        let limits = self.config.effective_limits(limits);
        let wall_time = limits.wall_time.unwrap_or(5.0);
        let cap = limits.max_output.unwrap_or(RunLimits::MB) as usize;

        // Rejects negative, zero, NaN, infinite, and unrepresentably large
        // values before any resources are acquired.
        let deadline = Duration::try_from_secs_f64(wall_time)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or(ExecuteError::InvalidWallTime(wall_time))?;

        // Single-slot gate: only one capture scope may be active at a time.
        // The permit travels with the scope and is released on its teardown.
        let permit = self
            .gate
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ExecuteError::GateClosed)?;
        let scope = CaptureScope::open(permit, self.config.scratch_root.as_deref())?;

        let source_name = self.config.interpreter.source_name.clone();
        scope.write_file(&source_name, source.as_bytes())?;

        let entry = if self.config.sandbox.enabled {
            scope.write_file(HARNESS_NAME, HARNESS.as_bytes())?;
            HARNESS_NAME
        } else {
            source_name.as_str()
        };

        let mut cmd = self.config.interpreter.expand_command(entry);
        if self.config.sandbox.enabled {
            // The harness receives the snippet file as its first argument
            cmd.push(source_name.clone());
        }
        let program = cmd.first().ok_or(ExecuteError::EmptyCommand)?.clone();

        debug!(?cmd, scope = %scope.path().display(), "spawning interpreter");

        let mut child = Command::new(&program)
            .args(&cmd[1..])
            .current_dir(scope.path())
            .env_clear()
            .env("PATH", &self.config.interpreter.path)
            .envs(&self.config.interpreter.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecuteError::SpawnFailed {
                command: program,
                source,
            })?;

        let stdout_task = child
            .stdout
            .take()
            .map(|s| CaptureScope::drain(s, scope.stdout_sink(), cap));
        let stderr_task = child
            .stderr
            .take()
            .map(|s| CaptureScope::drain(s, scope.stderr_sink(), cap));

        let status = match tokio::time::timeout(deadline, child.wait()).await {
            Ok(status) => Some(status?),
            Err(_) => {
                warn!(wall_time, "wall clock limit exceeded, killing interpreter");
                if let Err(e) = child.start_kill() {
                    warn!(error = %e, "failed to kill timed-out interpreter");
                }
                let _ = child.wait().await;
                None
            }
        };

        // Pipes normally hit EOF once the child is gone, but a grandchild
        // that inherited them can keep them open indefinitely. Wait only a
        // short grace period; the sinks already hold everything written up
        // to the point of termination.
        join_drain(stdout_task, DRAIN_GRACE).await;
        join_drain(stderr_task, DRAIN_GRACE).await;

        let stdout = scope.stdout_text();
        let stderr = scope.stderr_text();

        let fault = match status {
            None => Some(FaultInfo::new(
                FaultKind::Timeout,
                format!("execution exceeded the {wall_time}s wall clock limit"),
            )),
            Some(status) if status.success() => None,
            Some(status) => Some(fault::classify(&stderr, &status)),
        };

        debug!(
            fault = ?fault.as_ref().map(|f| f.kind),
            stdout_len = stdout.len(),
            stderr_len = stderr.len(),
            "execution complete"
        );

        // Scope drops here: scratch directory removed, gate released
        Ok(ExecutionResult {
            stdout,
            stderr,
            fault,
        })
    }
}
