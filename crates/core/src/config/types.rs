use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Transcoding engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Fixed location of the ffmpeg executable.
    #[serde(default = "default_engine_path")]
    pub path: PathBuf,
    /// Kill the engine after this many seconds. Unset means no limit
    /// beyond whatever the host enforces.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Where the engine's stdout is forwarded.
    #[serde(default = "default_stdout_target")]
    pub stdout: DiagnosticTarget,
    /// Where the engine's stderr is forwarded.
    #[serde(default = "default_stderr_target")]
    pub stderr: DiagnosticTarget,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            timeout_secs: None,
            stdout: default_stdout_target(),
            stderr: default_stderr_target(),
        }
    }
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("/opt/bin/ffmpeg")
}

fn default_stdout_target() -> DiagnosticTarget {
    DiagnosticTarget::Stdout
}

fn default_stderr_target() -> DiagnosticTarget {
    DiagnosticTarget::Stderr
}

/// Host channel that receives a child process output stream.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticTarget {
    Stdout,
    Stderr,
    Discard,
}

/// Per-invocation workspace configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// Directory under which invocation workspaces are created.
    #[serde(default = "default_workspace_root")]
    pub root: PathBuf,
    /// Name prefix of each workspace directory.
    #[serde(default = "default_workspace_prefix")]
    pub prefix: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
            prefix: default_workspace_prefix(),
        }
    }
}

fn default_workspace_root() -> PathBuf {
    std::env::temp_dir()
}

fn default_workspace_prefix() -> String {
    "lambda-".to_string()
}

/// Remote fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Overall request timeout in seconds (default: none)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Connect timeout in seconds (default: none)
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            connect_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("transcodegate/{}", env!("CARGO_PKG_VERSION"))
}
