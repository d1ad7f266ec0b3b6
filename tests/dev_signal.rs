// tests/dev_signal.rs

//! End-to-end signal handling for `runherd dev`: an OS interrupt or
//! termination signal must tear the whole group down and exit 130, under
//! either wait policy.

#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

const DEADLINE: Duration = Duration::from_secs(10);

fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + DEADLINE;
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(50));
    }
}

fn send_signal(pid: u32, signal: &str) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn pid_alive(pid: u32) -> bool {
    send_signal(pid, "-0")
}

fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn wait_exit(session: &mut Child) -> ExitStatus {
    let deadline = Instant::now() + DEADLINE;
    loop {
        if let Ok(Some(status)) = session.try_wait() {
            return status;
        }
        if Instant::now() >= deadline {
            let _ = session.kill();
            panic!("dev session did not exit in time");
        }
        thread::sleep(Duration::from_millis(50));
    }
}

/// Spawn the `runherd dev` binary against a config whose processes record
/// their own pids, and return the session child plus the observed pids.
fn spawn_dev_session(config: &str, pidfiles: &[&Path]) -> std::io::Result<(Child, Vec<u32>)> {
    let dir = pidfiles[0].parent().expect("pidfile has a parent");
    let config_path = dir.join("Runherd.toml");
    fs::write(&config_path, config)?;

    let session = Command::new(env!("CARGO_BIN_EXE_runherd"))
        .args(["--config", &config_path.display().to_string(), "dev"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    for pidfile in pidfiles {
        wait_until("managed process to start", || read_pid(pidfile).is_some());
    }
    let pids = pidfiles
        .iter()
        .map(|p| read_pid(p).expect("pid file readable"))
        .collect();

    // Let the session's signal subscriptions register before delivering.
    thread::sleep(Duration::from_millis(200));
    Ok((session, pids))
}

#[test]
fn interrupt_tears_down_the_group_and_exits_130() -> TestResult {
    let dir = tempdir()?;
    let pidfile = dir.path().join("sleeper.pid");
    let config = format!(
        r#"
[[dev.process]]
name = "sleeper"
cmd = ["sh", "-c", "echo $$ > {pidfile} && exec sleep 30"]
"#,
        pidfile = pidfile.display()
    );

    let (mut session, pids) = spawn_dev_session(&config, &[&pidfile])?;
    assert!(send_signal(session.id(), "-INT"), "deliver SIGINT");

    let status = wait_exit(&mut session);
    assert_eq!(status.code(), Some(130));
    wait_until("managed process to die", || !pid_alive(pids[0]));
    Ok(())
}

#[test]
fn terminate_signal_during_wait_all_exits_130() -> TestResult {
    let dir = tempdir()?;
    let pidfile_a = dir.path().join("a.pid");
    let pidfile_b = dir.path().join("b.pid");
    let config = format!(
        r#"
[dev]
wait = "all"

[[dev.process]]
name = "a"
cmd = ["sh", "-c", "echo $$ > {a} && exec sleep 30"]

[[dev.process]]
name = "b"
cmd = ["sh", "-c", "echo $$ > {b} && exec sleep 30"]
"#,
        a = pidfile_a.display(),
        b = pidfile_b.display()
    );

    let (mut session, pids) = spawn_dev_session(&config, &[&pidfile_a, &pidfile_b])?;
    assert!(send_signal(session.id(), "-TERM"), "deliver SIGTERM");

    let status = wait_exit(&mut session);
    assert_eq!(status.code(), Some(130));
    for pid in pids {
        wait_until("managed process to die", || !pid_alive(pid));
    }
    Ok(())
}
