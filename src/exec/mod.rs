//! Process execution for approved commands.
//!
//! Tokens are passed as an argument vector — never through a shell — so
//! quoting, expansion, and operator injection are structurally impossible
//! at this layer. The environment is cleared and rebuilt from a safe
//! baseline to keep secrets out of spawned commands.

use std::collections::HashSet;
use std::process::Stdio;
use std::time::Duration;

/// Maximum command execution time before kill.
const EXEC_TIMEOUT_SECS: u64 = 60;
/// Maximum captured output size in bytes (1MB).
const MAX_OUTPUT_BYTES: usize = 1_048_576;
/// Environment variables safe to pass to spawned commands.
/// Only functional variables are included — never API keys or secrets.
const SAFE_ENV_VARS: &[&str] = &[
    "PATH", "HOME", "TERM", "LANG", "LC_ALL", "LC_CTYPE", "USER", "SHELL", "TMPDIR",
];

/// Terminal result of one command submission, as surfaced to callers.
///
/// Every failure mode in the pipeline ends up here as a structured
/// variant; nothing propagates as an uncaught fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Process ran and exited zero.
    Success { stdout: String },
    /// Process ran and exited non-zero (or was killed on timeout).
    Failure {
        stderr: String,
        exit_code: Option<i32>,
    },
    /// No such executable on the PATH.
    NotFound { command: String },
    /// The deny tier matched; never executed.
    Blocked { command: String },
    /// The caller or the human behind the prompt declined.
    Cancelled,
    /// A non-blocking surface needs an explicit decision attached.
    ConfirmationRequired { rationale: String },
    /// Malformed submission or an unexpected spawn failure.
    InternalError { detail: String },
}

impl ExecutionOutcome {
    /// Wire-level status keyword for this outcome.
    pub fn status(&self) -> &'static str {
        match self {
            ExecutionOutcome::Success { .. } => "success",
            ExecutionOutcome::Blocked { .. } => "blocked",
            ExecutionOutcome::Cancelled => "cancelled",
            ExecutionOutcome::Failure { .. }
            | ExecutionOutcome::NotFound { .. }
            | ExecutionOutcome::ConfirmationRequired { .. }
            | ExecutionOutcome::InternalError { .. } => "error",
        }
    }

    /// Human-readable report for this outcome.
    pub fn message(&self) -> String {
        match self {
            ExecutionOutcome::Success { stdout } => {
                format!("Command executed successfully.\n{stdout}")
            }
            ExecutionOutcome::Failure {
                stderr,
                exit_code: Some(code),
            } => format!("Command exited with status {code}.\n{stderr}"),
            ExecutionOutcome::Failure {
                stderr,
                exit_code: None,
            } => format!("Command execution failed.\n{stderr}"),
            ExecutionOutcome::NotFound { command } => format!("Command '{command}' not found."),
            ExecutionOutcome::Blocked { command } => {
                format!("The command '{command}' is restricted and cannot be executed.")
            }
            ExecutionOutcome::Cancelled => "Command execution cancelled by the user.".into(),
            ExecutionOutcome::ConfirmationRequired { rationale } => {
                format!("Confirmation required: {rationale}")
            }
            ExecutionOutcome::InternalError { detail } => {
                format!("An unexpected error occurred: {detail}")
            }
        }
    }
}

/// Spawns approved commands and reports structured outcomes.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    /// Extra environment variable names allowed through to children,
    /// merged with the built-in safe baseline.
    pub env_passthrough: Vec<String>,
}

impl Executor {
    pub fn new(env_passthrough: Vec<String>) -> Self {
        Self { env_passthrough }
    }

    /// Run a tokenized command to completion, capturing output.
    ///
    /// Distinguishes a missing binary from a non-zero exit; a command
    /// still running after the timeout is killed and reported as a
    /// failure.
    pub async fn run(&self, tokens: &[String]) -> ExecutionOutcome {
        let Some((program, args)) = tokens.split_first() else {
            return ExecutionOutcome::InternalError {
                detail: "no command provided".into(),
            };
        };

        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .env_clear();

        for var in self.allowed_env_vars() {
            if let Ok(val) = std::env::var(&var) {
                cmd.env(&var, val);
            }
        }

        let result = tokio::time::timeout(Duration::from_secs(EXEC_TIMEOUT_SECS), cmd.output()).await;

        match result {
            Ok(Ok(output)) => {
                let stdout = truncate_output(&output.stdout);
                let stderr = truncate_output(&output.stderr);
                if output.status.success() {
                    ExecutionOutcome::Success { stdout }
                } else {
                    ExecutionOutcome::Failure {
                        stderr,
                        exit_code: output.status.code(),
                    }
                }
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => ExecutionOutcome::NotFound {
                command: program.clone(),
            },
            Ok(Err(e)) => ExecutionOutcome::InternalError {
                detail: format!("failed to execute '{program}': {e}"),
            },
            Err(_) => ExecutionOutcome::Failure {
                stderr: format!("command timed out after {EXEC_TIMEOUT_SECS}s and was killed"),
                exit_code: None,
            },
        }
    }

    fn allowed_env_vars(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        for key in SAFE_ENV_VARS
            .iter()
            .copied()
            .chain(self.env_passthrough.iter().map(String::as_str))
        {
            let candidate = key.trim();
            if candidate.is_empty() || !is_valid_env_var_name(candidate) {
                continue;
            }
            if seen.insert(candidate.to_string()) {
                out.push(candidate.to_string());
            }
        }
        out
    }
}

fn is_valid_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Lossy-decode captured bytes, truncating at a UTF-8 boundary.
fn truncate_output(raw: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(raw).into_owned();
    if text.len() > MAX_OUTPUT_BYTES {
        let mut end = MAX_OUTPUT_BYTES;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("\n... [output truncated at 1MB]");
    }
    text
}
