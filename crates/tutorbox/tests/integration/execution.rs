use tutorbox::FaultKind;

use super::test_executor;

#[tokio::test]
async fn captures_stdout_and_stderr_separately() {
    let executor = test_executor();
    let result = executor
        .execute("import sys\nprint(\"to stdout\")\nsys.stderr.write(\"to stderr\\n\")\n")
        .await
        .expect("execution failed");

    assert_eq!(result.stdout, "to stdout\n");
    assert_eq!(result.stderr, "to stderr\n");
    assert!(result.fault.is_none());
}

#[tokio::test]
async fn zero_division_is_contained() {
    let executor = test_executor();
    let result = executor
        .execute("print(1 / 0)\n")
        .await
        .expect("execution must not propagate snippet faults");

    let fault = result.fault.expect("expected a fault");
    assert_eq!(fault.kind, FaultKind::ZeroDivision);
    assert!(fault.message.contains("division by zero"));
}

#[tokio::test]
async fn syntax_fault_is_classified() {
    let executor = test_executor();
    let result = executor.execute("def f(:\n").await.expect("execution failed");

    let fault = result.fault.expect("expected a fault");
    assert_eq!(fault.kind, FaultKind::Syntax);
}

#[tokio::test]
async fn missing_name_is_classified() {
    let executor = test_executor();
    let result = executor
        .execute("print(undefined_thing)\n")
        .await
        .expect("execution failed");

    let fault = result.fault.expect("expected a fault");
    assert_eq!(fault.kind, FaultKind::MissingName);
}

#[tokio::test]
async fn missing_key_is_classified() {
    let executor = test_executor();
    let result = executor
        .execute("d = {}\nprint(d[\"absent\"])\n")
        .await
        .expect("execution failed");

    let fault = result.fault.expect("expected a fault");
    assert_eq!(fault.kind, FaultKind::MissingKey);
}

#[tokio::test]
async fn partial_output_survives_a_fault() {
    let executor = test_executor();
    let result = executor
        .execute("print(\"before the crash\")\nprint(1 / 0)\n")
        .await
        .expect("execution failed");

    assert_eq!(result.stdout, "before the crash\n");
    assert_eq!(result.fault.unwrap().kind, FaultKind::ZeroDivision);
}

#[tokio::test]
async fn bindings_do_not_leak_between_runs() {
    let executor = test_executor();

    let first = executor
        .execute("leaked = 42\nprint(leaked)\n")
        .await
        .expect("execution failed");
    assert!(first.fault.is_none());

    let second = executor
        .execute("print(leaked)\n")
        .await
        .expect("execution failed");
    assert_eq!(second.fault.unwrap().kind, FaultKind::MissingName);
}

#[tokio::test]
async fn scope_is_torn_down_between_runs() {
    let executor = test_executor();

    let first = executor
        .execute("print(\"first run\")\n")
        .await
        .expect("execution failed");
    let second = executor
        .execute("print(\"second run\")\n")
        .await
        .expect("execution failed");

    // No stale sink: each run captures only its own output
    assert_eq!(first.stdout, "first run\n");
    assert_eq!(second.stdout, "second run\n");
}

#[tokio::test]
async fn nonzero_exit_without_traceback_is_a_runtime_fault() {
    let executor = test_executor();
    let result = executor
        .execute("import sys\nsys.exit(3)\n")
        .await
        .expect("execution failed");

    let fault = result.fault.expect("expected a fault");
    assert_eq!(fault.kind, FaultKind::Runtime);
}
