/// Execution Engine - runs the materialized script
///
/// **Core Responsibility:**
/// Run the interpreter against the script once, feed the test input on
/// stdin and capture raw stdout/stderr plus an outcome.
///
/// **Critical Architectural Boundary:**
/// - Engine knows HOW to execute
/// - Engine does NOT compare outputs or build messages
/// - Engine returns raw outputs for the evaluator to judge
///
/// **Deadline:**
/// One deadline is fixed when the job starts and shared by every run. It is
/// never reset per test case, so a job whose runs add up past the deadline is
/// abandoned mid-way.
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How a single run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Non-zero exit, signal, or failure to start the interpreter
    RuntimeError(String),
    /// The job deadline passed before the run finished
    TimedOut,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::RuntimeError(detail) => write!(f, "{}", detail),
            Outcome::TimedOut => write!(f, "signal: killed"),
        }
    }
}

/// Raw result of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub stdout: String,
    pub stderr: String,
    pub outcome: Outcome,
}

impl Execution {
    fn failed(outcome: Outcome) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            outcome,
        }
    }
}

/// Backend that runs a script with a given stdin under a deadline
pub trait ExecutionEngine {
    async fn run(&self, script: &Path, stdin: &str, deadline: Instant) -> Execution;
}

/// Runs the script with an external interpreter as a child process
pub struct ProcessEngine {
    interpreter: String,
    args: Vec<String>,
    workdir: PathBuf,
}

impl ProcessEngine {
    pub fn new(interpreter: impl Into<String>, args: Vec<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            args,
            workdir: workdir.into(),
        }
    }
}

impl ExecutionEngine for ProcessEngine {
    #[tracing::instrument(skip(self, stdin), fields(interpreter = %self.interpreter))]
    async fn run(&self, script: &Path, stdin: &str, deadline: Instant) -> Execution {
        if Instant::now() >= deadline {
            warn!("Deadline already passed; not starting interpreter");
            return Execution::failed(Outcome::TimedOut);
        }

        let mut command = Command::new(&self.interpreter);
        command
            .args(&self.args)
            .arg(script)
            .current_dir(&self.workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "Failed to start interpreter");
                return Execution::failed(Outcome::RuntimeError(format!(
                    "exec: \"{}\": {}",
                    self.interpreter, e
                )));
            }
        };

        // Written from its own task so a full stdout pipe cannot deadlock us.
        // The handle is dropped afterwards, closing the child's stdin.
        if let Some(mut pipe) = child.stdin.take() {
            let input = stdin.to_owned();
            tokio::spawn(async move {
                if let Err(e) = pipe.write_all(input.as_bytes()).await {
                    debug!(error = %e, "Child did not consume all of stdin");
                }
            });
        }

        // On timeout the child is dropped here and killed
        match tokio::time::timeout_at(deadline, child.wait_with_output()).await {
            Ok(Ok(output)) => Execution {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                outcome: outcome_from_status(output.status),
            },
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to collect child output");
                Execution::failed(Outcome::RuntimeError(e.to_string()))
            }
            Err(_) => {
                warn!("Deadline exceeded; child killed");
                Execution::failed(Outcome::TimedOut)
            }
        }
    }
}

fn outcome_from_status(status: ExitStatus) -> Outcome {
    if status.success() {
        return Outcome::Success;
    }
    if let Some(code) = status.code() {
        return Outcome::RuntimeError(format!("exit status {}", code));
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Outcome::RuntimeError(format!("signal: {}", signal_name(signal)));
        }
    }

    Outcome::RuntimeError(status.to_string())
}

/// Human-readable name for common POSIX signals, falling back to the number
fn signal_name(signal: i32) -> String {
    let name = match signal {
        1 => "hangup",
        2 => "interrupt",
        3 => "quit",
        4 => "illegal instruction",
        5 => "trace/breakpoint trap",
        6 => "aborted",
        7 => "bus error",
        8 => "floating point exception",
        9 => "killed",
        11 => "segmentation fault",
        13 => "broken pipe",
        14 => "alarm clock",
        15 => "terminated",
        _ => return signal.to_string(),
    };
    name.to_string()
}
