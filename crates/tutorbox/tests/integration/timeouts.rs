use std::time::Instant;

use tutorbox::{Config, Executor, FaultKind, RunLimits};

use super::test_executor;

#[tokio::test]
async fn infinite_loop_is_aborted() {
    let executor = test_executor();
    let limits = RunLimits::new().with_wall_time(1.0);

    let start = Instant::now();
    let result = executor
        .execute_with("while True:\n    pass\n", Some(&limits))
        .await
        .expect("execution failed");

    // Killed near the deadline, not at the default budget
    assert!(start.elapsed().as_secs_f64() < 4.0);
    assert_eq!(result.fault.unwrap().kind, FaultKind::Timeout);
}

#[tokio::test]
async fn output_before_the_abort_is_kept() {
    let executor = test_executor();
    let limits = RunLimits::new().with_wall_time(1.0);

    let result = executor
        .execute_with(
            "print(\"started\", flush=True)\nwhile True:\n    pass\n",
            Some(&limits),
        )
        .await
        .expect("execution failed");

    assert_eq!(result.stdout, "started\n");
    assert_eq!(result.fault.unwrap().kind, FaultKind::Timeout);
}

#[tokio::test]
async fn executor_stays_usable_after_a_timeout() {
    let executor = test_executor();
    let limits = RunLimits::new().with_wall_time(1.0);

    let timed_out = executor
        .execute_with("while True:\n    pass\n", Some(&limits))
        .await
        .expect("execution failed");
    assert_eq!(timed_out.fault.unwrap().kind, FaultKind::Timeout);

    // The gate was released and the next run is clean
    let result = executor.execute("print(\"ok\")\n").await.expect("execution failed");
    assert_eq!(result.stdout, "ok\n");
    assert!(result.fault.is_none());
}

#[tokio::test]
async fn lingering_grandchild_does_not_stall_the_return() {
    // A grandchild inherits the output pipes and outlives the killed child,
    // so the pipes never reach EOF. The run must still return near the
    // deadline with everything captured before the kill.
    let mut config = Config::default();
    config.sandbox.enabled = false;
    let executor = Executor::new(config);
    let limits = RunLimits::new().with_wall_time(1.0);

    let start = Instant::now();
    let result = executor
        .execute_with(
            "import subprocess, time\n\
             print(\"spawning\", flush=True)\n\
             subprocess.Popen([\"sleep\", \"30\"])\n\
             time.sleep(60)\n",
            Some(&limits),
        )
        .await
        .expect("execution failed");

    assert!(start.elapsed().as_secs_f64() < 4.0);
    assert_eq!(result.stdout, "spawning\n");
    assert_eq!(result.fault.unwrap().kind, FaultKind::Timeout);
}

#[tokio::test]
async fn output_cap_does_not_stall_the_child() {
    let executor = test_executor();
    let limits = RunLimits::new().with_max_output(1024);

    // Writes far more than the cap; the child must still run to completion
    let result = executor
        .execute_with(
            "for _ in range(10000):\n    print(\"x\" * 100)\n",
            Some(&limits),
        )
        .await
        .expect("execution failed");

    assert!(result.fault.is_none());
    assert!(result.stdout.len() <= 1024);
}
