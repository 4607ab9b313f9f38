// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `wait4(2)`-based process runner.
//!
//! The command line runs under `<shell> -c` in its own process group. The
//! child is reaped with `wait4`, which hands back the rusage of that child
//! (including descendants it waited for) rather than of every child this
//! process ever had.

use std::mem::MaybeUninit;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;

use super::{CommandLine, ProcessRunner};
use crate::types::{Measurement, RunOutcome};

/// `ru_maxrss` units per reported megabyte. Apple platforms report bytes.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub const MAXRSS_UNITS_PER_MB: u64 = 1_000_000;

/// `ru_maxrss` units per reported megabyte. Linux and the BSDs report kilobytes.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub const MAXRSS_UNITS_PER_MB: u64 = 1_000;

/// How often a child is polled when a timeout is configured.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs command lines through a shell and reads their rusage.
#[derive(Debug, Clone)]
pub struct RusageRunner {
    shell: PathBuf,
    timeout: Option<Duration>,
}

impl RusageRunner {
    /// Create a runner using `shell` as the command interpreter.
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
            timeout: None,
        }
    }

    /// Kill invocations that run longer than `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn wait(&self, pid: Pid) -> Result<(libc::c_int, libc::rusage, bool), Errno> {
        let Some(limit) = self.timeout else {
            let (status, usage) = wait4(pid, 0)?.ok_or(Errno::ECHILD)?;
            return Ok((status, usage, false));
        };

        let start = Instant::now();
        loop {
            if let Some((status, usage)) = wait4(pid, libc::WNOHANG)? {
                return Ok((status, usage, false));
            }

            if start.elapsed() >= limit {
                tracing::warn!(pid = pid.as_raw(), timeout = ?limit, "Killing timed out export");
                // The group may already be gone; reaping below settles it.
                let _ = killpg(pid, Signal::SIGKILL);
                let (status, usage) = wait4(pid, 0)?.ok_or(Errno::ECHILD)?;
                return Ok((status, usage, true));
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Default for RusageRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl ProcessRunner for RusageRunner {
    fn run(&self, command: &CommandLine) -> Measurement {
        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!(shell = %self.shell.display(), error = %e, "Spawn failed");
                return Measurement::launch_failed(format!(
                    "cannot start {}: {}",
                    self.shell.display(),
                    e
                ));
            }
        };

        // The std handle is dropped unreaped; wait4 below does the reaping.
        let pid = Pid::from_raw(child.id() as libc::pid_t);
        drop(child);

        let (status, usage, timed_out) = match self.wait(pid) {
            Ok(result) => result,
            Err(errno) => {
                return Measurement::launch_failed(format!("wait4 failed: {}", errno));
            }
        };

        let outcome = if timed_out {
            RunOutcome::TimedOut
        } else {
            outcome_from_status(pid, status)
        };

        let measurement = measurement_from_rusage(&usage, outcome);
        tracing::debug!(
            pid = pid.as_raw(),
            user_ms = measurement.user_ms,
            system_ms = measurement.system_ms,
            memory_mb = measurement.memory_mb,
            outcome = %measurement.outcome,
            "Export finished"
        );
        measurement
    }
}

/// `wait4` with EINTR retry. `Ok(None)` means still running under `WNOHANG`.
fn wait4(pid: Pid, options: libc::c_int) -> Result<Option<(libc::c_int, libc::rusage)>, Errno> {
    let mut status: libc::c_int = 0;
    let mut usage = MaybeUninit::<libc::rusage>::zeroed();

    loop {
        let rc = unsafe { libc::wait4(pid.as_raw(), &mut status, options, usage.as_mut_ptr()) };
        match rc {
            -1 if Errno::last() == Errno::EINTR => continue,
            -1 => return Err(Errno::last()),
            0 => return Ok(None),
            _ => {
                let usage = unsafe { usage.assume_init() };
                return Ok(Some((status, usage)));
            }
        }
    }
}

fn outcome_from_status(pid: Pid, status: libc::c_int) -> RunOutcome {
    match WaitStatus::from_raw(pid, status) {
        Ok(WaitStatus::Exited(_, 0)) => RunOutcome::Success,
        Ok(WaitStatus::Exited(_, code)) => RunOutcome::Failed { code },
        Ok(WaitStatus::Signaled(_, signal, _)) => RunOutcome::Signaled {
            signal: signal.as_str().to_string(),
        },
        _ => RunOutcome::Failed { code: -1 },
    }
}

fn timeval_ms(tv: &libc::timeval) -> u64 {
    let ms = (tv.tv_sec as i64) * 1000 + (tv.tv_usec as i64) / 1000;
    ms.max(0) as u64
}

fn measurement_from_rusage(usage: &libc::rusage, outcome: RunOutcome) -> Measurement {
    let max_rss = (usage.ru_maxrss as i64).max(0) as u64;

    Measurement::new(
        timeval_ms(&usage.ru_utime),
        timeval_ms(&usage.ru_stime),
        max_rss / MAXRSS_UNITS_PER_MB,
        outcome,
    )
}
