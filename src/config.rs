//! TOML configuration, loaded once at startup.
//!
//! The policy sections only *extend* the built-in rule lists; there is no
//! way to remove a built-in deny or confirm entry from config.

use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration (`~/.warden/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub policy: PolicyConfig,
}

/// `[gateway]` — HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address. Default: loopback only.
    pub host: String,
    pub port: u16,
    /// Permit binding to a non-loopback address. Default: `false`.
    pub allow_public_bind: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            allow_public_bind: false,
        }
    }
}

/// `[policy]` — extensions and predicate data for the rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Extra base commands merged into the built-in deny list.
    pub deny_commands: Vec<String>,
    /// Extra base commands merged into the built-in confirm list.
    pub confirm_commands: Vec<String>,
    /// Hosts remote-shell connections may target without tripping the
    /// trusted-host filter.
    pub trusted_hosts: Vec<String>,
    /// Remotes version-control pushes may target.
    pub allowed_remotes: Vec<String>,
    /// File names that mark the working directory as a project root.
    pub project_markers: Vec<String>,
    /// Extra environment variable names passed through to spawned
    /// commands, on top of the built-in safe baseline.
    pub env_passthrough: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            deny_commands: Vec::new(),
            confirm_commands: Vec::new(),
            trusted_hosts: vec![
                "github.com".into(),
                "gitlab.com".into(),
                "bitbucket.org".into(),
            ],
            allowed_remotes: vec!["origin".into(), "upstream".into()],
            project_markers: vec![
                "requirements.txt".into(),
                "package.json".into(),
                "Pipfile".into(),
                "pyproject.toml".into(),
                "Cargo.toml".into(),
            ],
            env_passthrough: Vec::new(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location. A
    /// missing file yields the defaults; a present-but-invalid file is
    /// an error rather than a silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        Ok(config)
    }
}

fn default_config_path() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("could not find home directory")?;
    Ok(home.join(".warden").join("config.toml"))
}
