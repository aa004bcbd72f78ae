use tutorbox::{FaultKind, GradeError};

use super::test_grader;

#[tokio::test]
async fn trailing_newline_still_passes() {
    let grader = test_grader();

    // Learner prints "42\n", reference writes "42" without a newline
    let verdict = grader
        .grade(
            "print(42)\n",
            "import sys\nsys.stdout.write(\"42\")\n",
        )
        .await
        .expect("grading failed");

    assert!(verdict.passed);
    assert_eq!(verdict.observed_output, "42\n");
    assert_eq!(verdict.expected_output.as_deref(), Some("42"));
}

#[tokio::test]
async fn wrong_output_fails() {
    let grader = test_grader();

    let verdict = grader
        .grade("print(43)\n", "print(42)\n")
        .await
        .expect("grading failed");

    assert!(!verdict.passed);
    assert_eq!(verdict.observed_output, "43\n");
    assert_eq!(verdict.expected_output.as_deref(), Some("42\n"));
    assert!(verdict.diagnostics.is_none());
}

#[tokio::test]
async fn learner_fault_short_circuits() {
    let grader = test_grader();

    let verdict = grader
        .grade(
            "print(\"partial\")\nprint(1 / 0)\n",
            "print(\"reference ran\")\n",
        )
        .await
        .expect("grading failed");

    assert!(!verdict.passed);
    // The reference was never executed: no expected output in the verdict
    assert!(verdict.expected_output.is_none());
    assert_eq!(verdict.observed_output, "partial\n");
    assert_eq!(verdict.diagnostics.unwrap().kind, FaultKind::ZeroDivision);
}

#[tokio::test]
async fn broken_reference_is_a_configuration_error() {
    let grader = test_grader();

    let result = grader.grade("print(42)\n", "print(missing_name)\n").await;

    match result {
        Err(GradeError::BrokenReference { fault }) => {
            assert_eq!(fault.kind, FaultKind::MissingName);
        }
        other => panic!("expected BrokenReference, got {other:?}"),
    }
}

#[tokio::test]
async fn custom_check_decides_the_verdict() {
    let grader = test_grader();

    let verdict = grader
        .grade_with("print(6 * 7)\n", |_, stdout| stdout.trim() == "42")
        .await
        .expect("grading failed");

    assert!(verdict.passed);
    assert!(verdict.expected_output.is_none());

    let verdict = grader
        .grade_with("print(6 * 7)\n", |_, stdout| stdout.trim() == "41")
        .await
        .expect("grading failed");

    assert!(!verdict.passed);
}

#[tokio::test]
async fn custom_check_sees_the_learner_source() {
    let grader = test_grader();

    let verdict = grader
        .grade_with("total = sum(range(5))\nprint(total)\n", |source, stdout| {
            source.contains("sum(") && stdout.trim() == "10"
        })
        .await
        .expect("grading failed");

    assert!(verdict.passed);
}
