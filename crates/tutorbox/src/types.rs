use serde::{Deserialize, Serialize};

/// Limits applied to a single snippet execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLimits {
    /// Wall clock time limit in seconds
    #[serde(default)]
    pub wall_time: Option<f64>,

    /// Maximum captured output per stream in bytes
    #[serde(default)]
    pub max_output: Option<u64>,
}

impl RunLimits {
    /// 1 megabyte in bytes
    pub const MB: u64 = 1024 * 1024;

    /// Create new limits with all fields set to None
    pub fn new() -> Self {
        Self {
            wall_time: None,
            max_output: None,
        }
    }

    /// Set the wall clock time limit in seconds
    pub fn with_wall_time(mut self, seconds: f64) -> Self {
        self.wall_time = Some(seconds);
        self
    }

    /// Set the maximum captured output per stream in bytes
    pub fn with_max_output(mut self, bytes: u64) -> Self {
        self.max_output = Some(bytes);
        self
    }

    /// Apply overrides from another RunLimits, preferring values from `overrides`
    ///
    /// Returns a new RunLimits with values from `overrides` taking precedence
    /// over values from `self` when both are present.
    pub fn with_overrides(&self, overrides: &RunLimits) -> RunLimits {
        RunLimits {
            wall_time: overrides.wall_time.or(self.wall_time),
            max_output: overrides.max_output.or(self.max_output),
        }
    }
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            wall_time: Some(5.0),
            max_output: Some(Self::MB),
        }
    }
}

/// Result of executing one snippet of learner or author code.
///
/// `stdout` and `stderr` always hold the complete captured text up to the
/// point of termination, including when the run faulted partway through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Present iff the run terminated abnormally
    pub fault: Option<FaultInfo>,
}

impl ExecutionResult {
    /// Check if the execution completed normally
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.fault.is_none()
    }
}

/// Classification of an abnormal execution outcome
///
/// Corresponds to the failure taxonomy shown to learners. Serialized as
/// kebab-case strings so verdicts can cross a process boundary as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultKind {
    /// The submitted text could not be parsed
    Syntax,

    /// A name was referenced before being defined
    MissingName,

    /// An operation was applied to a value of the wrong type
    TypeMismatch,

    /// Division or modulo by zero
    ZeroDivision,

    /// A missing dictionary key or out-of-range index
    MissingKey,

    /// Any other fault raised during execution
    Runtime,

    /// The run exceeded its wall clock budget and was aborted
    Timeout,

    /// The snippet attempted a disallowed operation
    SandboxViolation,

    /// The submission was empty or whitespace-only
    EmptySubmission,
}

impl FaultKind {
    /// The kebab-case name used in messages and serialized verdicts
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::Syntax => "syntax",
            FaultKind::MissingName => "missing-name",
            FaultKind::TypeMismatch => "type-mismatch",
            FaultKind::ZeroDivision => "zero-division",
            FaultKind::MissingKey => "missing-key",
            FaultKind::Runtime => "runtime",
            FaultKind::Timeout => "timeout",
            FaultKind::SandboxViolation => "sandbox-violation",
            FaultKind::EmptySubmission => "empty-submission",
        }
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong, as plain data
///
/// Holds a classification and a one-line human-readable message. The raised
/// trap itself is never retained; everything a caller needs to display or
/// serialize is here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultInfo {
    /// Failure classification
    pub kind: FaultKind,

    /// Human-readable one-line description
    pub message: String,
}

impl FaultInfo {
    /// Create a new fault with the given kind and message
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FaultInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Outcome of grading one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the submission passed
    pub passed: bool,

    /// Stdout captured from the learner's run (empty if the run was skipped)
    pub observed_output: String,

    /// Stdout captured from the reference run, when one was performed
    pub expected_output: Option<String>,

    /// Why the submission failed, when failure came from a fault rather
    /// than an output mismatch
    pub diagnostics: Option<FaultInfo>,
}

impl Verdict {
    /// A failing verdict caused by a fault, before or during the learner run
    pub fn rejected(observed_output: impl Into<String>, fault: FaultInfo) -> Self {
        Self {
            passed: false,
            observed_output: observed_output.into(),
            expected_output: None,
            diagnostics: Some(fault),
        }
    }
}
