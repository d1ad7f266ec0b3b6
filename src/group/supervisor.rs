// src/group/supervisor.rs

use std::process::{ExitStatus, Stdio};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::{Result, RunherdError};
use crate::exec::command::build_command;
use crate::exec::task::{EXEC_FAILURE_CODE, Task};
use crate::group::terminal;

/// Grace period between the graceful termination signal and the forceful
/// kill during teardown.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Exit code reported when shutdown was triggered by an interruption or
/// termination signal.
pub const SIGNAL_EXIT_CODE: i32 = 130;

/// Lifecycle of a [`ProcessGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// Constructed, no processes yet.
    Empty,
    /// At least one process spawned, signal subscriptions live.
    Running,
    /// Teardown in progress.
    TearingDown,
    /// Signal subscriptions removed, terminal restored.
    Terminated,
}

type CleanupFn = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// One subprocess owned by a [`ProcessGroup`].
///
/// The child handle itself lives in a monitor task that resolves the
/// completion marker (a `watch` channel) when the OS process terminates.
/// Only the owning group sends it signals.
#[derive(Debug, Clone)]
pub struct ManagedProcess {
    name: String,
    pid: Option<u32>,
    exit_rx: watch::Receiver<Option<i32>>,
}

impl ManagedProcess {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exit code if the process has already been observed to terminate.
    pub fn exit_code(&self) -> Option<i32> {
        *self.exit_rx.borrow()
    }

    /// Suspend until the process terminates and return its exit code.
    pub async fn wait(&self) -> i32 {
        let mut rx = self.exit_rx.clone();
        match rx.wait_for(|code| code.is_some()).await {
            Ok(code) => (*code).unwrap_or(EXEC_FAILURE_CODE),
            // Monitor task dropped without reporting; treat as unobservable.
            Err(_) => EXEC_FAILURE_CODE,
        }
    }

    fn terminate(&self) {
        if let Some(pid) = self.pid {
            debug!(process = %self.name, pid, "sending graceful termination signal");
            signal_pid(pid, TerminationKind::Graceful);
        }
    }

    fn kill(&self) {
        if let Some(pid) = self.pid {
            warn!(process = %self.name, pid, "forcefully killing process");
            signal_pid(pid, TerminationKind::Forceful);
        }
    }
}

enum TerminationKind {
    Graceful,
    Forceful,
}

#[cfg(unix)]
fn signal_pid(pid: u32, kind: TerminationKind) {
    let signal = match kind {
        TerminationKind::Graceful => libc::SIGTERM,
        TerminationKind::Forceful => libc::SIGKILL,
    };
    // ESRCH for an already-reaped child is fine to ignore.
    unsafe {
        libc::kill(pid as libc::pid_t, signal);
    }
}

#[cfg(not(unix))]
fn signal_pid(_pid: u32, _kind: TerminationKind) {
    // No graceful/forceful distinction without unix signals; the monitor
    // task's child handle is killed on process exit instead.
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(EXEC_FAILURE_CODE)
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(EXEC_FAILURE_CODE)
}

/// A set of long-lived subprocesses sharing one lifecycle.
///
/// Teardown ([`kill_all`](Self::kill_all)) is single-shot and
/// re-entrancy-safe: it runs registered cleanup callbacks in registration
/// order (each error-isolated), sends a graceful termination signal to
/// every live process, waits up to the grace period, escalates to a
/// forceful kill for stragglers, removes the group's signal subscriptions,
/// and restores shared terminal state.
pub struct ProcessGroup {
    procs: Mutex<Vec<ManagedProcess>>,
    cleanups: Mutex<Vec<CleanupFn>>,
    state: Mutex<GroupState>,
    grace_period: Duration,
    /// Listener tasks for SIGINT/SIGTERM; aborted on teardown so a second
    /// external signal cannot re-enter the handler.
    signal_tasks: Mutex<Vec<JoinHandle<()>>>,
    signal_rx: tokio::sync::Mutex<mpsc::Receiver<()>>,
}

impl std::fmt::Debug for ProcessGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessGroup")
            .field("state", &self.state())
            .field("processes", &lock(&self.procs).len())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProcessGroup {
    pub fn new() -> Self {
        Self::with_grace_period(DEFAULT_GRACE_PERIOD)
    }

    pub fn with_grace_period(grace_period: Duration) -> Self {
        let (signal_tx, signal_rx) = mpsc::channel(1);
        let signal_tasks = install_signal_listeners(signal_tx);

        Self {
            procs: Mutex::new(Vec::new()),
            cleanups: Mutex::new(Vec::new()),
            state: Mutex::new(GroupState::Empty),
            grace_period,
            signal_tasks: Mutex::new(signal_tasks),
            signal_rx: tokio::sync::Mutex::new(signal_rx),
        }
    }

    pub fn state(&self) -> GroupState {
        *lock(&self.state)
    }

    /// Snapshot of the managed processes in spawn order.
    pub fn processes(&self) -> Vec<ManagedProcess> {
        lock(&self.procs).clone()
    }

    /// Register a cleanup callback to run during teardown, in registration
    /// order. A failing callback cannot block the callbacks after it or the
    /// kill sequence.
    pub fn on_cleanup(&self, cleanup: impl FnOnce() -> anyhow::Result<()> + Send + 'static) {
        lock(&self.cleanups).push(Box::new(cleanup));
    }

    /// Spawn a process into the group with inherited stdout/stderr; stdin
    /// is connected to the orchestrator's own only when `inherit_stdin` is
    /// requested (so an interactive process can receive keystrokes while
    /// its siblings stay silent consumers).
    ///
    /// Only legal before teardown has begun.
    pub fn spawn(&self, task: &Task, inherit_stdin: bool) -> Result<()> {
        {
            let mut state = lock(&self.state);
            match *state {
                GroupState::Empty | GroupState::Running => *state = GroupState::Running,
                GroupState::TearingDown | GroupState::Terminated => {
                    return Err(RunherdError::GroupClosed(task.name.clone()));
                }
            }
        }

        let stdin = if inherit_stdin {
            Stdio::inherit()
        } else {
            Stdio::null()
        };

        let mut child = build_command(task, false)
            .stdin(stdin)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawning process '{}'", task.name))?;

        let pid = child.id();
        info!(process = %task.name, pid, "spawned managed process");

        let (exit_tx, exit_rx) = watch::channel(None);
        let name = task.name.clone();
        tokio::spawn(async move {
            let code = match child.wait().await {
                Ok(status) => exit_code_of(status),
                Err(err) => {
                    warn!(process = %name, error = %err, "failed to observe process exit");
                    EXEC_FAILURE_CODE
                }
            };
            debug!(process = %name, exit_code = code, "managed process exited");
            let _ = exit_tx.send(Some(code));
        });

        lock(&self.procs).push(ManagedProcess {
            name: task.name.clone(),
            pid,
            exit_rx,
        });

        Ok(())
    }

    /// The teardown contract. Idempotent and single-shot: however many
    /// concurrent signals or exit observations trigger it, exactly one
    /// teardown sequence ever runs.
    pub async fn kill_all(&self) {
        {
            let mut state = lock(&self.state);
            match *state {
                GroupState::TearingDown | GroupState::Terminated => return,
                _ => *state = GroupState::TearingDown,
            }
        }
        info!("tearing down process group");

        let cleanups: Vec<CleanupFn> = lock(&self.cleanups).drain(..).collect();
        for cleanup in cleanups {
            if let Err(err) = cleanup() {
                warn!(error = %err, "cleanup callback failed");
            }
        }

        let procs: Vec<ManagedProcess> = lock(&self.procs).clone();

        for proc in &procs {
            if proc.exit_code().is_none() {
                proc.terminate();
            }
        }

        let all_exited = async {
            for proc in &procs {
                proc.wait().await;
            }
        };
        if timeout(self.grace_period, all_exited).await.is_err() {
            for proc in &procs {
                if proc.exit_code().is_none() {
                    proc.kill();
                }
            }
            // SIGKILL cannot be caught; wait so every straggler is observed
            // terminated before teardown completes.
            for proc in &procs {
                proc.wait().await;
            }
        }

        self.remove_signal_listeners();
        terminal::restore();
        *lock(&self.state) = GroupState::Terminated;
        info!("process group terminated");
    }

    /// Block until any one process exits, tear down the rest, and return
    /// the first process's exit code. An OS termination signal instead
    /// tears everything down and yields [`SIGNAL_EXIT_CODE`].
    pub async fn wait_for_first(&self) -> i32 {
        let procs: Vec<ManagedProcess> = lock(&self.procs).clone();

        let (first_tx, mut first_rx) = mpsc::channel(procs.len().max(1));
        for proc in procs {
            let tx = first_tx.clone();
            tokio::spawn(async move {
                let code = proc.wait().await;
                let _ = tx.send((proc.name, code)).await;
            });
        }
        drop(first_tx);

        let mut signal_rx = self.signal_rx.lock().await;
        tokio::select! {
            first = first_rx.recv() => {
                let code = match first {
                    Some((name, code)) => {
                        info!(process = %name, exit_code = code, "first process exited");
                        code
                    }
                    // Group was empty; nothing ever exits.
                    None => 0,
                };
                self.kill_all().await;
                code
            }
            _ = signal_rx.recv() => {
                info!("termination signal received; shutting down process group");
                self.kill_all().await;
                SIGNAL_EXIT_CODE
            }
        }
    }

    /// Block until every process has exited on its own and return the
    /// least-successful (maximum) exit code; 0 only if all exited 0. No
    /// proactive teardown, but an OS termination signal still tears the
    /// group down and yields [`SIGNAL_EXIT_CODE`].
    pub async fn wait_for_all(&self) -> i32 {
        let procs: Vec<ManagedProcess> = lock(&self.procs).clone();

        let mut signal_rx = self.signal_rx.lock().await;
        let all_exited = async {
            let mut worst = 0;
            for proc in &procs {
                let code = proc.wait().await;
                // An unobservable exit still counts as a failure.
                let code = if code < 0 { 1 } else { code };
                worst = worst.max(code);
            }
            worst
        };

        tokio::select! {
            worst = all_exited => {
                self.remove_signal_listeners();
                *lock(&self.state) = GroupState::Terminated;
                worst
            }
            _ = signal_rx.recv() => {
                info!("termination signal received; shutting down process group");
                self.kill_all().await;
                SIGNAL_EXIT_CODE
            }
        }
    }

    fn remove_signal_listeners(&self) {
        for handle in lock(&self.signal_tasks).drain(..) {
            handle.abort();
        }
    }
}

impl Default for ProcessGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.remove_signal_listeners();
    }
}

#[cfg(unix)]
fn install_signal_listeners(tx: mpsc::Sender<()>) -> Vec<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut handles = Vec::new();
    for kind in [SignalKind::interrupt(), SignalKind::terminate()] {
        let tx = tx.clone();
        handles.push(tokio::spawn(async move {
            match signal(kind) {
                Ok(mut stream) => {
                    if stream.recv().await.is_some() {
                        let _ = tx.send(()).await;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "failed to install signal listener");
                }
            }
        }));
    }
    handles
}

#[cfg(not(unix))]
fn install_signal_listeners(tx: mpsc::Sender<()>) -> Vec<JoinHandle<()>> {
    vec![tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(()).await;
        }
    })]
}
