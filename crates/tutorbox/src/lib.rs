//! Sandboxed snippet execution and exercise grading for an interactive
//! learning platform.
//!
//! Tutorbox takes untrusted learner-submitted source text, executes it in an
//! isolated interpreter child process, captures its output without touching
//! the host's own streams, and decides whether the output matches a reference
//! solution. Lesson completion state is persisted across restarts.
//!
//! # Features
//!
//! - **Fault containment** — syntax, runtime, timeout, and sandbox faults
//!   become plain-data [`FaultInfo`] values; nothing a snippet does can crash
//!   or hang the host.
//! - **Capture scope** — per-run scratch directory and append-only output
//!   sinks, torn down on every exit path; one execution at a time.
//! - **Timeouts** — every run is bounded by a wall clock limit and killed on
//!   expiry, keeping whatever it printed before the abort.
//! - **Sandboxing** — an audit-hook harness denies filesystem access outside
//!   the scratch area, sockets, and subprocesses.
//! - **Grading** — trimmed exact-match comparison against a reference run,
//!   or a caller-supplied check; reference faults surface as configuration
//!   errors, not learner failures.
//! - **Progress** — lesson-id → completion map, flushed atomically as flat
//!   JSON on every mutation.

pub use capture::{CaptureError, CaptureScope, Sink};
pub use config::{Config, ConfigError, EXAMPLE_CONFIG, Interpreter, SandboxPolicy};
pub use executor::{ExecuteError, Executor};
pub use grader::{GradeError, Grader, outputs_match};
pub use progress::{ProgressError, ProgressStore};
pub use types::{ExecutionResult, FaultInfo, FaultKind, RunLimits, Verdict};

pub mod capture;
pub mod config;
pub mod executor;
pub mod grader;
pub mod progress;
pub mod types;
