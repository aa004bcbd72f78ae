use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::types::RunLimits;

mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../tutorbox.example.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for Tutorbox
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Where the lesson progress map is persisted.
    #[serde(default = "default_progress_path")]
    pub progress_path: PathBuf,

    /// Root directory for per-run scratch directories.
    /// Defaults to the system temp directory when unset.
    #[serde(default)]
    pub scratch_root: Option<PathBuf>,

    /// Interpreter used to execute snippets.
    #[serde(default)]
    pub interpreter: Interpreter,

    /// Default limits applied to every execution.
    /// Overridden per call when the caller supplies its own limits.
    #[serde(default)]
    pub default_limits: RunLimits,

    /// Sandbox policy for executed snippets.
    #[serde(default)]
    pub sandbox: SandboxPolicy,
}

/// How snippet source text is turned into a runnable child process
#[derive(Debug, Clone, Deserialize)]
pub struct Interpreter {
    /// Command template. The `{entry}` placeholder is replaced with the
    /// file the interpreter should run.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// File name the snippet is written to inside the scratch directory
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// PATH visible to the child process
    #[serde(default = "default_path")]
    pub path: String,

    /// Extra environment variables for the child process
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Interpreter {
    /// Expand the command template for the given entry file
    pub fn expand_command(&self, entry: &str) -> Vec<String> {
        self.command
            .iter()
            .map(|arg| arg.replace("{entry}", entry))
            .collect()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            command: default_command(),
            source_name: default_source_name(),
            path: default_path(),
            env: HashMap::new(),
        }
    }
}

/// Sandbox policy applied to executed snippets
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxPolicy {
    /// Run snippets under the audit-hook harness that denies filesystem
    /// access outside the scratch directory, sockets, and subprocesses.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Create a new config from the embedded example
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge run limits with the configured defaults
    pub fn effective_limits(&self, overrides: Option<&RunLimits>) -> RunLimits {
        match overrides {
            Some(limits) => self.default_limits.with_overrides(limits),
            None => self.default_limits.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded default config should be valid")
    }
}

fn default_progress_path() -> PathBuf {
    PathBuf::from("user_progress.json")
}

fn default_command() -> Vec<String> {
    vec!["python3".into(), "-I".into(), "{entry}".into()]
}

fn default_source_name() -> String {
    "main.py".to_string()
}

fn default_path() -> String {
    "/usr/local/bin:/usr/bin:/bin".to_string()
}

fn default_true() -> bool {
    true
}
