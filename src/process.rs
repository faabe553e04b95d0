//! # External Command Execution
//!
//! This module is the only place where submodule-sync spawns processes.
//!
//! ## Design
//!
//! Execution goes through the [`CommandRunner`] trait so the reconciler can
//! be driven by a recording mock in tests and by [`SystemRunner`] in the
//! binary. A runner never returns an error: spawn failures, non-zero exits
//! and timeouts all come back as an [`ActionOutcome`] with `success` unset,
//! and the caller decides what to do with it.
//!
//! Every invocation is logged with its command line, exit status, duration
//! and captured stderr before control returns to the caller.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use serde::Serialize;

/// Captured output beyond this many bytes is cut off.
pub const MAX_CAPTURED_BYTES: usize = 16 * 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A command to run: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The command line as a single display string.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Result of one executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// The action as issued, e.g. `git submodule add ../a libs/a`.
    pub command: String,
    /// Directory the action ran in.
    pub cwd: PathBuf,
    /// Exit code, when the process exited normally.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip)]
    pub duration: Duration,
}

impl ActionOutcome {
    /// An outcome for an action performed in-process rather than by spawning.
    pub fn from_io(command: impl Into<String>, cwd: &Path, result: std::io::Result<()>) -> Self {
        let (success, stderr) = match result {
            Ok(()) => (true, String::new()),
            Err(e) => (false, e.to_string()),
        };
        let outcome = Self {
            command: command.into(),
            cwd: cwd.to_path_buf(),
            exit_code: None,
            success,
            timed_out: false,
            stdout: String::new(),
            stderr,
            duration: Duration::ZERO,
        };
        outcome.log();
        outcome
    }

    fn spawn_failure(spec: &CommandSpec, message: String) -> Self {
        Self {
            command: spec.command_line(),
            cwd: spec.cwd.clone(),
            exit_code: None,
            success: false,
            timed_out: false,
            stdout: String::new(),
            stderr: message,
            duration: Duration::ZERO,
        }
    }

    /// Write the audit record for this outcome.
    pub fn log(&self) {
        if self.success {
            debug!(
                "Command succeeded in {:.2}s: {}",
                self.duration.as_secs_f64(),
                self.command
            );
            if !self.stdout.trim().is_empty() {
                debug!("\t{}", self.stdout.trim_end());
            }
        } else {
            error!("Error running command: {}", self.command);
            error!("\texit status: {}", self.status_text());
            error!("\t{}", self.stderr.trim_end());
        }
    }

    /// Human-readable exit status.
    pub fn status_text(&self) -> String {
        if self.timed_out {
            "timed out".to_string()
        } else {
            match self.exit_code {
                Some(code) => code.to_string(),
                None if self.success => "ok".to_string(),
                None => "failed to run".to_string(),
            }
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.command, self.status_text())
    }
}

/// Trait for command execution - allows mocking in tests
pub trait CommandRunner {
    /// Run `spec` to completion and describe what happened.
    fn run(&self, spec: &CommandSpec) -> ActionOutcome;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// A runner that kills commands running longer than `timeout`.
    ///
    /// `None` lets commands run to completion.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> ActionOutcome {
        info!("Running command: {}", spec.command_line());
        let outcome = run_with_timeout(spec, self.timeout);
        outcome.log();
        outcome
    }
}

fn run_with_timeout(spec: &CommandSpec, timeout: Option<Duration>) -> ActionOutcome {
    let start = Instant::now();
    let mut child = match Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(&spec.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            return ActionOutcome::spawn_failure(
                spec,
                format!("failed to start {}: {}", spec.program, e),
            )
        }
    };

    // Drain both pipes on their own threads so a chatty command cannot
    // block on a full pipe while we poll for exit.
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let mut timed_out = false;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(e) => {
                error!("Could not poll {}: {}", spec.command_line(), e);
                let _ = child.kill();
                break child.wait().ok();
            }
        }
        if timeout.is_some_and(|limit| start.elapsed() > limit) {
            timed_out = true;
            let _ = child.kill();
            break child.wait().ok();
        }
        thread::sleep(POLL_INTERVAL);
    };

    // A killed command may leave grandchildren holding the pipes open, so
    // its output is abandoned rather than waited for.
    let (stdout, stderr) = if timed_out {
        (
            String::new(),
            format!(
                "killed after exceeding timeout of {:.1}s",
                timeout.unwrap_or_default().as_secs_f64()
            ),
        )
    } else {
        (join_reader(stdout), join_reader(stderr))
    };

    ActionOutcome {
        command: spec.command_line(),
        cwd: spec.cwd.clone(),
        exit_code: status.and_then(|s| s.code()),
        success: !timed_out && status.is_some_and(|s| s.success()),
        timed_out,
        stdout,
        stderr,
        duration: start.elapsed(),
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

fn join_reader(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    let bytes = handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    truncate_output(&bytes, MAX_CAPTURED_BYTES)
}

/// Decode captured bytes, keeping at most `limit` bytes.
pub fn truncate_output(bytes: &[u8], limit: usize) -> String {
    if bytes.len() <= limit {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    let mut text = String::from_utf8_lossy(&bytes[..limit]).into_owned();
    text.push_str(&format!("\n... [{} bytes truncated]", bytes.len() - limit));
    text
}
