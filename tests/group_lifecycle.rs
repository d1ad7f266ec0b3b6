// tests/group_lifecycle.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use runherd::group::{GroupState, ProcessGroup};
use runherd_test_utils::builders::TaskBuilder;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn wait_for_first_returns_first_exit_and_tears_down_siblings() -> TestResult {
    init_tracing();

    let group = ProcessGroup::new();
    group.spawn(&TaskBuilder::shell("one", "sleep 30").build(), false)?;
    group.spawn(
        &TaskBuilder::shell("two", "sleep 0.2; exit 7").build(),
        false,
    )?;
    group.spawn(&TaskBuilder::shell("three", "sleep 30").build(), false)?;

    let code = with_timeout(group.wait_for_first()).await;
    assert_eq!(code, 7);

    // Every sibling must be observed terminated before the call returns.
    for proc in group.processes() {
        assert!(
            proc.exit_code().is_some(),
            "process '{}' still running after wait_for_first",
            proc.name()
        );
    }
    assert_eq!(group.state(), GroupState::Terminated);
    Ok(())
}

#[tokio::test]
async fn wait_for_all_returns_max_exit_code() -> TestResult {
    init_tracing();

    let group = ProcessGroup::new();
    group.spawn(&TaskBuilder::shell("zero-a", "exit 0").build(), false)?;
    group.spawn(&TaskBuilder::shell("two", "exit 2").build(), false)?;
    group.spawn(&TaskBuilder::shell("zero-b", "exit 0").build(), false)?;

    let code = with_timeout(group.wait_for_all()).await;
    assert_eq!(code, 2);
    Ok(())
}

#[tokio::test]
async fn wait_for_all_is_zero_only_when_all_succeed() -> TestResult {
    init_tracing();

    let group = ProcessGroup::new();
    group.spawn(&TaskBuilder::shell("a", "exit 0").build(), false)?;
    group.spawn(&TaskBuilder::shell("b", "true").build(), false)?;

    let code = with_timeout(group.wait_for_all()).await;
    assert_eq!(code, 0);
    Ok(())
}

#[tokio::test]
async fn concurrent_teardown_runs_cleanups_exactly_once() -> TestResult {
    init_tracing();

    let group = ProcessGroup::new();
    group.spawn(&TaskBuilder::shell("sleeper", "sleep 30").build(), false)?;

    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    group.on_cleanup(move || {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    // Two rapid signals → two concurrent teardown triggers.
    with_timeout(async {
        tokio::join!(group.kill_all(), group.kill_all());
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(group.state(), GroupState::Terminated);
    Ok(())
}

#[tokio::test]
async fn failing_cleanup_does_not_block_later_cleanups_or_the_kill() -> TestResult {
    init_tracing();

    let group = ProcessGroup::new();
    group.spawn(&TaskBuilder::shell("sleeper", "sleep 30").build(), false)?;

    let second_ran = Arc::new(AtomicUsize::new(0));
    group.on_cleanup(|| Err(anyhow::anyhow!("first cleanup failed")));
    let counted = Arc::clone(&second_ran);
    group.on_cleanup(move || {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    with_timeout(group.kill_all()).await;

    assert_eq!(second_ran.load(Ordering::SeqCst), 1);
    for proc in group.processes() {
        assert!(proc.exit_code().is_some());
    }
    Ok(())
}

#[tokio::test]
async fn spawn_after_teardown_is_rejected() -> TestResult {
    init_tracing();

    let group = ProcessGroup::new();
    group.spawn(&TaskBuilder::shell("sleeper", "sleep 30").build(), false)?;
    with_timeout(group.kill_all()).await;

    let err = group.spawn(&TaskBuilder::shell("late", "true").build(), false);
    assert!(err.is_err(), "spawning into a torn-down group must fail");
    Ok(())
}

#[tokio::test]
async fn sigterm_immune_process_is_killed_after_grace_period() -> TestResult {
    init_tracing();

    let group = ProcessGroup::with_grace_period(Duration::from_millis(300));
    group.spawn(
        &TaskBuilder::shell("stubborn", "trap '' TERM; sleep 30").build(),
        false,
    )?;

    with_timeout(group.kill_all()).await;

    // Never left alive: the straggler was SIGKILLed and observed dead.
    for proc in group.processes() {
        assert!(proc.exit_code().is_some(), "straggler survived teardown");
    }
    assert_eq!(group.state(), GroupState::Terminated);
    Ok(())
}

#[tokio::test]
async fn state_progresses_from_empty_to_running() -> TestResult {
    init_tracing();

    let group = ProcessGroup::new();
    assert_eq!(group.state(), GroupState::Empty);

    group.spawn(&TaskBuilder::shell("p", "exit 0").build(), false)?;
    assert_eq!(group.state(), GroupState::Running);

    let code = with_timeout(group.wait_for_all()).await;
    assert_eq!(code, 0);
    assert_eq!(group.state(), GroupState::Terminated);
    Ok(())
}
