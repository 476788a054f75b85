//! Shared data models for linter invocations, findings, and run results.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Which of the two external checkers produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Yamllint,
    Actionlint,
}

impl ToolKind {
    /// Both tools, in invocation order.
    pub const ALL: [ToolKind; 2] = [ToolKind::Yamllint, ToolKind::Actionlint];

    /// Executable name looked up on PATH.
    pub fn program(self) -> &'static str {
        match self {
            ToolKind::Yamllint => "yamllint",
            ToolKind::Actionlint => "actionlint",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Derived command-line arguments for one external tool.
///
/// Built once per run by the config translator and shared read-only by
/// every invocation of that tool. The target file is appended at invoke
/// time and is not part of the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub args: Vec<String>,
}

/// Captured outcome of one subprocess invocation.
///
/// `status` is `Some(code)` for a normal exit; signal-terminated children
/// never reach this type (the invoker reports them as crashes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInvocation {
    pub tool: ToolKind,
    pub file: PathBuf,
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Rendered command line, kept for verbose/debug reporting.
    pub command: String,
}

impl RawInvocation {
    pub fn clean_exit(&self) -> bool {
        self.status == Some(0)
    }
}

/// One reported problem in a workflow file, normalized across tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub tool: ToolKind,
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub severity: Severity,
    pub rule: Option<String>,
    pub message: String,
}

/// A per-file fatal tool condition (timeout, crash, spawn failure),
/// carried into the report alongside findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolFailure {
    pub tool: ToolKind,
    pub file: String,
    pub error: String,
}

/// One invocation's command and raw output, for verbose/debug reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationTrace {
    pub tool: ToolKind,
    pub file: String,
    pub command: String,
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Aggregated counts used by printers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub problems: usize,
    pub files: usize,
}

/// Run-level verdict across all files and both tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub findings: Vec<Finding>,
    pub tool_errors: Vec<ToolFailure>,
    pub traces: Vec<InvocationTrace>,
    pub yamllint_failed: bool,
    pub actionlint_failed: bool,
    pub summary: Summary,
    pub overall_failed: bool,
}
