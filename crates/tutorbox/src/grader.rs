//! Exercise grading
//!
//! Runs a learner submission through the [`Executor`], obtains the expected
//! output from a reference solution (or a caller-supplied check), and
//! produces a [`Verdict`]. A fault in the reference solution is a
//! content-authoring defect and surfaces as [`GradeError::BrokenReference`],
//! never as a learner failure.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::executor::{ExecuteError, Executor};
use crate::types::{ExecutionResult, FaultInfo, FaultKind, Verdict};

/// Errors that occur during grading
#[derive(Debug, Error)]
pub enum GradeError {
    /// The reference solution itself failed to execute
    #[error("reference solution failed to execute: {fault}")]
    BrokenReference { fault: FaultInfo },

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Compare captured outputs the way exercises are judged: exact string
/// equality after trimming leading and trailing whitespace.
///
/// Intentionally strict. Formatting differences inside the output (inner
/// whitespace, float precision, ordering) fail the check.
pub fn outputs_match(observed: &str, expected: &str) -> bool {
    observed.trim() == expected.trim()
}

/// Grader for exercise submissions
///
/// Never mutates lesson progress; it only returns verdicts. The caller
/// decides whether a passing verdict advances lesson state.
#[derive(Debug, Clone)]
pub struct Grader {
    executor: Executor,
}

impl Grader {
    /// Create a grader backed by the given executor
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Create a grader with a default executor
    pub fn with_defaults() -> Self {
        Self::new(Executor::with_defaults())
    }

    /// Get the backing executor
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Grade a submission against a reference solution.
    ///
    /// The learner run always completes (success or fault) before the
    /// reference is considered; on a learner fault the reference is never
    /// executed.
    #[instrument(skip(self, learner_source, reference_source))]
    pub async fn grade(
        &self,
        learner_source: &str,
        reference_source: &str,
    ) -> Result<Verdict, GradeError> {
        let Some(learner) = self.run_learner(learner_source).await? else {
            return Ok(empty_submission());
        };

        if let Some(fault) = learner.fault {
            debug!(kind = %fault.kind, "learner run faulted, skipping reference");
            return Ok(Verdict::rejected(learner.stdout, fault));
        }

        let reference = self.executor.execute(reference_source).await?;
        if let Some(fault) = reference.fault {
            return Err(GradeError::BrokenReference { fault });
        }

        let passed = outputs_match(&learner.stdout, &reference.stdout);
        debug!(passed, "graded against reference output");

        Ok(Verdict {
            passed,
            observed_output: learner.stdout,
            expected_output: Some(reference.stdout),
            diagnostics: None,
        })
    }

    /// Grade a submission with a caller-supplied check instead of a
    /// reference run.
    ///
    /// The check receives the learner source and the captured stdout and
    /// decides the verdict; `expected_output` stays `None`.
    #[instrument(skip(self, learner_source, check))]
    pub async fn grade_with<F>(&self, learner_source: &str, check: F) -> Result<Verdict, GradeError>
    where
        F: FnOnce(&str, &str) -> bool,
    {
        let Some(learner) = self.run_learner(learner_source).await? else {
            return Ok(empty_submission());
        };

        if let Some(fault) = learner.fault {
            debug!(kind = %fault.kind, "learner run faulted, skipping check");
            return Ok(Verdict::rejected(learner.stdout, fault));
        }

        let passed = check(learner_source, &learner.stdout);
        debug!(passed, "graded with custom check");

        Ok(Verdict {
            passed,
            observed_output: learner.stdout,
            expected_output: None,
            diagnostics: None,
        })
    }

    /// Run the learner source, or return `None` for an empty submission
    /// without invoking the executor.
    async fn run_learner(
        &self,
        learner_source: &str,
    ) -> Result<Option<ExecutionResult>, GradeError> {
        if learner_source.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(self.executor.execute(learner_source).await?))
    }
}

fn empty_submission() -> Verdict {
    Verdict::rejected(
        "",
        FaultInfo::new(
            FaultKind::EmptySubmission,
            "write some code before checking",
        ),
    )
}
