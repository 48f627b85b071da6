// src/exec/runner.rs

//! Timeout-enforcing process runner.
//!
//! One command is spawned per call with stdout/stderr piped. Each pipe is
//! drained by its own reader task; lines flow through a single bounded
//! channel to a relay task that echoes them to stdout. Channel closure
//! (both readers done) is the drain-complete signal, and the main flow waits
//! on the relay with a bounded join before reporting the final status, so
//! all observed output precedes the exit code.
//!
//! On timeout the process goes through a fixed escalation: graceful
//! terminate, bounded wait, then two hard kills each with a bounded wait,
//! then give up. The timeout exit code is returned either way; a process
//! surviving all attempts is logged but not treated as fatal to the runner.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::exec::cmdline::CommandLine;
use crate::exec::{INTERNAL_ERROR_EXIT_CODE, TIMEOUT_EXIT_CODE};

/// Bound applied to each escalation wait and to output draining.
const GRACE: Duration = Duration::from_secs(10);

/// Number of hard-kill attempts after a failed graceful terminate.
const KILL_ATTEMPTS: u32 = 2;

/// Spawn `cmdline`, relay its merged output, and wait up to `run_timeout`
/// for natural exit.
///
/// Returns the process exit code, [`TIMEOUT_EXIT_CODE`] on timeout, or
/// [`INTERNAL_ERROR_EXIT_CODE`] when spawning/waiting itself fails.
pub async fn run_with_timeout(name: &str, cmdline: &CommandLine, run_timeout: Duration) -> i32 {
    info!(
        name,
        timeout_sec = run_timeout.as_secs(),
        cmd = %cmdline.masked(),
        "running command"
    );

    let mut cmd = Command::new(cmdline.program());
    cmd.args(cmdline.argv())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            error!(name, error = %err, "failed to spawn process");
            report_exit(name, INTERNAL_ERROR_EXIT_CODE);
            return INTERNAL_ERROR_EXIT_CODE;
        }
    };

    let (tx, rx) = mpsc::channel::<String>(256);
    if let Some(stdout) = child.stdout.take() {
        spawn_pipe_reader(stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_pipe_reader(stderr, tx.clone());
    }
    // The readers hold the only remaining senders; the channel closes once
    // both pipes reach EOF.
    drop(tx);
    let relay = spawn_relay(rx);

    let wait_result = timeout(run_timeout, child.wait()).await;
    let rc = match wait_result {
        Ok(Ok(status)) => {
            debug!(name, "process finished");
            join_relay(relay, name).await;
            status.code().unwrap_or(-1)
        }
        Ok(Err(err)) => {
            error!(name, error = %err, "waiting for process failed");
            join_relay(relay, name).await;
            INTERNAL_ERROR_EXIT_CODE
        }
        Err(_) => {
            warn!(
                name,
                timeout_sec = run_timeout.as_secs(),
                "process timed out; terminating"
            );
            escalate(&mut child, name).await;
            join_relay(relay, name).await;
            TIMEOUT_EXIT_CODE
        }
    };

    report_exit(name, rc);
    rc
}

/// Final status line: stderr for failures, stdout otherwise.
fn report_exit(name: &str, rc: i32) {
    let line = format!("{name} finished with exit code {rc}");
    if rc == 0 {
        println!("{line}");
    } else {
        eprintln!("{line}");
    }
}

/// Read one pipe line by line, decoding permissively, into the relay channel.
fn spawn_pipe_reader<R>(pipe: R, tx: mpsc::Sender<String>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut segments = BufReader::new(pipe).split(b'\n');
        while let Ok(Some(mut segment)) = segments.next_segment().await {
            if segment.last() == Some(&b'\r') {
                segment.pop();
            }
            if tx.send(decode_line(segment)).await.is_err() {
                break;
            }
        }
    })
}

/// Best-effort decoding: UTF-8, falling back to lossy replacement.
fn decode_line(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

/// Echo relayed lines to stdout until the channel closes.
fn spawn_relay(mut rx: mpsc::Receiver<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            println!("{line}");
        }
    })
}

/// Wait for the relay to flush, bounded by [`GRACE`].
async fn join_relay(relay: JoinHandle<()>, name: &str) {
    if timeout(GRACE, relay).await.is_err() {
        warn!(
            name,
            grace_sec = GRACE.as_secs(),
            "output relay still draining after grace period"
        );
        return;
    }
    debug!(name, "output draining finished");
}

/// Fixed escalation sequence: terminate, wait; kill, wait; kill, wait; give
/// up. The giving-up path leaves the process running and only logs.
async fn escalate(child: &mut Child, name: &str) {
    request_terminate(child, name);
    if wait_bounded(child).await {
        return;
    }

    warn!(name, "still running after terminate; killing");

    for attempt in 1..=KILL_ATTEMPTS {
        if let Err(err) = child.start_kill() {
            warn!(name, attempt, error = %err, "kill request failed");
        }
        if wait_bounded(child).await {
            return;
        }
    }

    warn!(name, "still running after kill; giving up");
}

/// True once the process has been reaped (or waiting is no longer possible).
async fn wait_bounded(child: &mut Child) -> bool {
    timeout(GRACE, child.wait()).await.is_ok()
}

#[cfg(unix)]
fn request_terminate(child: &mut Child, name: &str) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match child.id() {
        Some(pid) => {
            if let Err(err) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                warn!(name, error = %err, "sending SIGTERM failed");
            }
        }
        None => debug!(name, "process already reaped before terminate"),
    }
}

#[cfg(not(unix))]
fn request_terminate(child: &mut Child, name: &str) {
    // No graceful signal on this platform; go straight to the hard kill.
    if let Err(err) = child.start_kill() {
        warn!(name, error = %err, "terminate request failed");
    }
}

#[cfg(test)]
mod tests {
    use super::decode_line;

    #[test]
    fn decode_line_handles_invalid_utf8() {
        let line = decode_line(vec![b'o', b'k', 0xff, b'!']);
        assert_eq!(line, "ok\u{fffd}!");
    }

    #[test]
    fn decode_line_passes_valid_utf8_through() {
        assert_eq!(decode_line(b"hello".to_vec()), "hello");
    }
}
