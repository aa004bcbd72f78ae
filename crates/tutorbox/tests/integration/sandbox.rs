use tutorbox::{Config, Executor, FaultKind};

use super::test_executor;

#[tokio::test]
async fn reading_outside_the_scratch_area_is_denied() {
    let executor = test_executor();
    let result = executor
        .execute("print(open(\"/etc/passwd\").read())\n")
        .await
        .expect("execution failed");

    let fault = result.fault.expect("expected a fault");
    assert_eq!(fault.kind, FaultKind::SandboxViolation);
    assert!(result.stdout.is_empty());
}

#[tokio::test]
async fn sockets_are_denied() {
    let executor = test_executor();
    let result = executor
        .execute("import socket\nsocket.socket()\n")
        .await
        .expect("execution failed");

    assert_eq!(
        result.fault.expect("expected a fault").kind,
        FaultKind::SandboxViolation
    );
}

#[tokio::test]
async fn subprocesses_are_denied() {
    let executor = test_executor();
    let result = executor
        .execute("import subprocess\nsubprocess.run([\"ls\"])\n")
        .await
        .expect("execution failed");

    assert_eq!(
        result.fault.expect("expected a fault").kind,
        FaultKind::SandboxViolation
    );
}

#[tokio::test]
async fn files_inside_the_scratch_area_are_allowed() {
    let executor = test_executor();
    let result = executor
        .execute(
            "with open(\"notes.txt\", \"w\") as f:\n    f.write(\"hi\")\nprint(open(\"notes.txt\").read())\n",
        )
        .await
        .expect("execution failed");

    assert!(result.fault.is_none(), "fault: {:?}", result.fault);
    assert_eq!(result.stdout, "hi\n");
}

#[tokio::test]
async fn sandbox_can_be_disabled_by_config() {
    let mut config = Config::default();
    config.sandbox.enabled = false;
    let executor = Executor::new(config);

    // Without the harness the snippet runs bare; stdlib imports still work
    let result = executor
        .execute("import math\nprint(math.floor(2.5))\n")
        .await
        .expect("execution failed");

    assert!(result.fault.is_none());
    assert_eq!(result.stdout, "2\n");
}
