//! Argument/context predicates used by conditional policy filters.
//!
//! Each predicate is a fixed enum variant rather than an inline closure so
//! the full set is enumerable, serializable in debug output, and
//! independently unit-testable. Predicates are fail-closed: when the
//! ambient context cannot be read they return `false`, they never error.

use crate::config::PolicyConfig;
use std::path::Path;

/// A boolean condition over the argument tail and the ambient process
/// context, attached to a conditional policy filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Package installs must name a trusted source (`--trusted-host...`)
    /// or run inside an isolated interpreter environment.
    TrustedSourceOrIsolated,
    /// Installs must stay project-local: no global flag, and the working
    /// directory must look like a project root.
    ScopedToProject,
    /// Container invocations limited to `run`/`build` operations.
    ContainerRunOrBuild,
    /// The last argument must be a member of the trusted-hosts set.
    LastArgTrustedHost,
    /// The last argument must be a member of the allowed-remotes set.
    LastArgAllowedRemote,
}

impl Predicate {
    /// Evaluate against the argument tail and a context snapshot.
    pub fn eval(self, args: &[String], ctx: &ExecutionContext) -> bool {
        match self {
            Predicate::TrustedSourceOrIsolated => {
                args.iter().any(|arg| arg.starts_with("--trusted-host")) || ctx.isolated_runtime
            }
            Predicate::ScopedToProject => {
                !args.iter().any(|arg| arg == "-g") && ctx.in_project_directory()
            }
            Predicate::ContainerRunOrBuild => {
                args.iter().any(|arg| arg == "run" || arg == "build")
            }
            Predicate::LastArgTrustedHost => args
                .last()
                .is_some_and(|host| ctx.trusted_hosts.iter().any(|t| t == host)),
            Predicate::LastArgAllowedRemote => args
                .last()
                .is_some_and(|remote| ctx.allowed_remotes.iter().any(|r| r == remote)),
        }
    }
}

/// Snapshot of the ambient process context taken once per submission.
///
/// Predicates read the snapshot instead of probing the environment
/// themselves, which keeps evaluation pure and the policy testable
/// without any filesystem or env setup.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Caller is inside an isolated interpreter environment (virtualenv,
    /// conda) distinct from the system-wide one.
    pub isolated_runtime: bool,
    /// File names present in the working directory.
    pub cwd_entries: Vec<String>,
    /// File names that mark a directory as a project root.
    pub project_markers: Vec<String>,
    /// Hosts remote-shell connections may target.
    pub trusted_hosts: Vec<String>,
    /// Remotes version-control pushes may target.
    pub allowed_remotes: Vec<String>,
}

impl ExecutionContext {
    /// Capture a live snapshot: env markers and the current directory
    /// listing are re-read on every call.
    pub fn capture(policy: &PolicyConfig) -> Self {
        Self::capture_in(Path::new("."), policy)
    }

    /// Capture a snapshot with an explicit directory instead of the
    /// process working directory.
    pub fn capture_in(dir: &Path, policy: &PolicyConfig) -> Self {
        let isolated_runtime = std::env::var_os("VIRTUAL_ENV").is_some()
            || std::env::var_os("CONDA_PREFIX").is_some();

        // Unreadable directory ⇒ empty listing ⇒ project checks fail closed.
        let cwd_entries = std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            isolated_runtime,
            cwd_entries,
            project_markers: policy.project_markers.clone(),
            trusted_hosts: policy.trusted_hosts.clone(),
            allowed_remotes: policy.allowed_remotes.clone(),
        }
    }

    fn in_project_directory(&self) -> bool {
        self.cwd_entries
            .iter()
            .any(|entry| self.project_markers.iter().any(|m| m == entry))
    }
}
