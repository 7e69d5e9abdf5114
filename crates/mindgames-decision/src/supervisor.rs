//! Backend process supervision
//!
//! A launched backend gets three tasks: one re-logging stdout, one re-logging
//! stderr, and an exit watcher that owns the child and publishes its exit
//! status on a watch channel.

use crate::config::LaunchConfig;
use crate::error::DecisionError;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Log target for lines the backend prints
pub(crate) const BACKEND_LOG_TARGET: &str = "mindgames::backend";

/// Exit description, `None` while the process runs
pub(crate) type ExitReceiver = watch::Receiver<Option<String>>;

/// A running backend process
pub(crate) struct BackendProcess {
    pid: Option<u32>,
    exit_rx: ExitReceiver,
    kill_tx: Option<oneshot::Sender<()>>,
    tasks: Vec<JoinHandle<()>>,
}

impl BackendProcess {
    /// Locate a working executable and directory, then spawn the backend
    pub(crate) async fn launch(launch: &LaunchConfig) -> Result<Self, DecisionError> {
        let executable = find_executable(launch).await?;
        let working_dir = find_working_dir(launch)?;

        info!(
            executable = %executable,
            dir = %working_dir.display(),
            "Starting decision backend"
        );

        let mut child = Command::new(&executable)
            .args(&launch.args)
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(DecisionError::Spawn)?;

        let pid = child.id();
        let mut tasks = Vec::with_capacity(3);
        if let Some(stdout) = child.stdout.take() {
            tasks.push(tokio::spawn(relay_output(stdout, false)));
        }
        if let Some(stderr) = child.stderr.take() {
            tasks.push(tokio::spawn(relay_output(stderr, true)));
        }

        let (exit_tx, exit_rx) = watch::channel(None);
        let (kill_tx, kill_rx) = oneshot::channel();
        tasks.push(tokio::spawn(watch_exit(child, kill_rx, exit_tx)));

        Ok(Self {
            pid,
            exit_rx,
            kill_tx: Some(kill_tx),
            tasks,
        })
    }

    /// OS process id, if the process was still running when spawned
    pub(crate) fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Exit description once the process has ended
    pub(crate) fn exit_status(&self) -> Option<String> {
        self.exit_rx.borrow().clone()
    }

    /// True until the exit watcher has seen the process end
    pub(crate) fn is_alive(&self) -> bool {
        self.exit_rx.borrow().is_none()
    }

    /// Channel on which the exit status is published
    pub(crate) fn exit_receiver(&self) -> ExitReceiver {
        self.exit_rx.clone()
    }

    /// Stop the process: SIGTERM first, forced kill after `grace`
    pub(crate) async fn terminate(mut self, grace: Duration) {
        if self.is_alive() {
            let graceful = self.request_graceful_exit();
            let exited = graceful && self.wait_for_exit(grace).await;

            if !exited {
                warn!(pid = ?self.pid(), "Decision backend did not exit in time, killing");
                if let Some(kill_tx) = self.kill_tx.take() {
                    let _ = kill_tx.send(());
                }
                self.wait_for_exit(grace).await;
            }
        }

        for task in self.tasks.drain(..) {
            // Readers can outlive the process if it left children holding the pipes.
            let abort = task.abort_handle();
            if tokio::time::timeout(grace, task).await.is_err() {
                abort.abort();
            }
        }

        debug!(status = ?self.exit_status(), "Decision backend stopped");
    }

    async fn wait_for_exit(&self, limit: Duration) -> bool {
        let mut exit_rx = self.exit_rx.clone();
        let exited = matches!(
            tokio::time::timeout(limit, exit_rx.wait_for(Option::is_some)).await,
            Ok(Ok(_))
        );
        exited
    }

    #[cfg(unix)]
    fn request_graceful_exit(&self) -> bool {
        let Some(pid) = self.pid.and_then(|p| libc::pid_t::try_from(p).ok()) else {
            return false;
        };
        // SAFETY: plain signal delivery to a child we spawned and have not reaped.
        let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
        rc == 0
    }

    #[cfg(not(unix))]
    fn request_graceful_exit(&self) -> bool {
        false
    }
}

impl Drop for BackendProcess {
    fn drop(&mut self) {
        if let Some(kill_tx) = self.kill_tx.take() {
            let _ = kill_tx.send(());
        }
    }
}

async fn find_executable(launch: &LaunchConfig) -> Result<String, DecisionError> {
    for candidate in &launch.executables {
        let probe = Command::new(candidate)
            .args(&launch.probe_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(launch.probe_timeout(), probe).await {
            Ok(Ok(status)) if status.success() => {
                debug!(executable = %candidate, "Backend executable found");
                return Ok(candidate.clone());
            }
            Ok(Ok(status)) => debug!(executable = %candidate, %status, "Probe failed"),
            Ok(Err(e)) => debug!(executable = %candidate, error = %e, "Probe failed"),
            Err(_) => debug!(executable = %candidate, "Probe timed out"),
        }
    }

    Err(DecisionError::BackendNotFound(format!(
        "no working executable among {:?}",
        launch.executables
    )))
}

fn find_working_dir(launch: &LaunchConfig) -> Result<PathBuf, DecisionError> {
    launch
        .working_dirs
        .iter()
        .find(|dir| dir.is_dir())
        .cloned()
        .ok_or_else(|| {
            DecisionError::BackendNotFound(format!(
                "no backend directory among {:?}",
                launch.working_dirs
            ))
        })
}

async fn relay_output<R>(stream: R, is_stderr: bool)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if is_stderr => warn!(target: BACKEND_LOG_TARGET, "{}", line),
            Ok(Some(line)) => info!(target: BACKEND_LOG_TARGET, "{}", line),
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Backend output closed");
                break;
            }
        }
    }
}

async fn watch_exit(
    mut child: Child,
    kill_rx: oneshot::Receiver<()>,
    exit_tx: watch::Sender<Option<String>>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill_rx => {
            let _ = child.start_kill();
            child.wait().await
        }
    };

    let description = match status {
        Ok(status) => status.to_string(),
        Err(e) => format!("wait failed: {}", e),
    };
    info!(status = %description, "Decision backend process exited");
    exit_tx.send_replace(Some(description));
}
