//! Failure taxonomy.
//!
//! `WalintError` covers fatal pre-run conditions that abort before any
//! linting. `ToolError` covers per-file subprocess failures; those are
//! collected into the report and never abort sibling files.

use crate::models::ToolKind;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal setup errors surfaced before linting begins.
#[derive(Debug, Error)]
pub enum WalintError {
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("no workflow files (*.yml, *.yaml) found in {0}")]
    NoTargets(PathBuf),

    #[error("invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("missing required tools: {}; install them and re-run", join_tools(.0))]
    ToolsNotFound(Vec<ToolKind>),
}

fn join_tools(tools: &[ToolKind]) -> String {
    tools
        .iter()
        .map(|t| t.program().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-file subprocess failures. Recoverable at run level: recorded for
/// that file, the run continues, and the verdict reflects the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("failed to launch {tool}: {message}")]
    Spawn { tool: ToolKind, message: String },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: ToolKind, secs: u64 },

    #[error("{tool} terminated by signal: {message}")]
    Crashed { tool: ToolKind, message: String },

    #[error("{tool} invocation cancelled")]
    Cancelled { tool: ToolKind },
}

impl ToolError {
    pub fn tool(&self) -> ToolKind {
        match self {
            ToolError::Spawn { tool, .. }
            | ToolError::Timeout { tool, .. }
            | ToolError::Crashed { tool, .. }
            | ToolError::Cancelled { tool } => *tool,
        }
    }
}
