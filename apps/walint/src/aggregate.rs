//! Run-level aggregation of findings and tool exit statuses.
//!
//! The aggregator exclusively owns the accumulating state and serializes
//! `record` calls behind a mutex, so per-file finding order survives
//! concurrent file processing. `finalize` sorts findings by file path for
//! deterministic cross-file report order and is idempotent.

use crate::error::ToolError;
use crate::models::{
    Finding, InvocationTrace, RawInvocation, RunResult, Severity, Summary, ToolFailure, ToolKind,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    findings: Vec<Finding>,
    tool_errors: Vec<ToolFailure>,
    traces: Vec<InvocationTrace>,
    yamllint_failed: bool,
    actionlint_failed: bool,
    files: BTreeSet<PathBuf>,
    finalized: Option<RunResult>,
}

#[derive(Default)]
pub struct Aggregator {
    inner: Mutex<Inner>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one invocation's normalized findings and exit status.
    pub fn record(&self, raw: &RawInvocation, findings: Vec<Finding>) {
        let mut inner = self.inner.lock().expect("aggregator lock");
        inner.finalized = None;
        inner.files.insert(raw.file.clone());
        if !raw.clean_exit() {
            mark_failed(&mut inner, raw.tool);
        }
        inner.traces.push(InvocationTrace {
            tool: raw.tool,
            file: raw.file.to_string_lossy().to_string(),
            command: raw.command.clone(),
            status: raw.status,
            stdout: raw.stdout.clone(),
            stderr: raw.stderr.clone(),
        });
        inner.findings.extend(findings);
    }

    /// Record a per-file fatal tool condition (timeout, crash, spawn
    /// failure). Counts against the run verdict like a failing exit.
    pub fn record_error(&self, file: &Path, err: &ToolError) {
        let mut inner = self.inner.lock().expect("aggregator lock");
        inner.finalized = None;
        inner.files.insert(file.to_path_buf());
        mark_failed(&mut inner, err.tool());
        inner.tool_errors.push(ToolFailure {
            tool: err.tool(),
            file: file.to_string_lossy().to_string(),
            error: err.to_string(),
        });
    }

    /// Compute the run verdict. Idempotent: repeated calls without
    /// intervening records return the identical `RunResult`.
    pub fn finalize(&self) -> RunResult {
        let mut inner = self.inner.lock().expect("aggregator lock");
        if let Some(done) = inner.finalized.as_ref() {
            return done.clone();
        }
        let mut findings = inner.findings.clone();
        // Stable sort: cross-file order is path-sorted regardless of
        // completion order, per-file arrival order is preserved.
        findings.sort_by(|a, b| a.file.cmp(&b.file));
        let mut tool_errors = inner.tool_errors.clone();
        tool_errors.sort_by(|a, b| a.file.cmp(&b.file).then(a.tool.cmp(&b.tool)));
        let mut traces = inner.traces.clone();
        traces.sort_by(|a, b| a.file.cmp(&b.file).then(a.tool.cmp(&b.tool)));

        let errors = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        let warnings = findings.len() - errors;
        let overall_failed = inner.yamllint_failed
            || inner.actionlint_failed
            || !tool_errors.is_empty()
            || errors > 0;

        let result = RunResult {
            summary: Summary {
                errors,
                warnings,
                problems: findings.len(),
                files: inner.files.len(),
            },
            findings,
            tool_errors,
            traces,
            yamllint_failed: inner.yamllint_failed,
            actionlint_failed: inner.actionlint_failed,
            overall_failed,
        };
        inner.finalized = Some(result.clone());
        result
    }
}

fn mark_failed(inner: &mut Inner, tool: ToolKind) {
    match tool {
        ToolKind::Yamllint => inner.yamllint_failed = true,
        ToolKind::Actionlint => inner.actionlint_failed = true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tool: ToolKind, file: &str, status: i32) -> RawInvocation {
        RawInvocation {
            tool,
            file: PathBuf::from(file),
            status: Some(status),
            stdout: String::new(),
            stderr: String::new(),
            command: format!("{} {}", tool, file),
        }
    }

    fn finding(tool: ToolKind, file: &str, severity: Severity, message: &str) -> Finding {
        Finding {
            tool,
            file: file.to_string(),
            line: Some(1),
            column: Some(1),
            severity,
            rule: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_clean_run_passes() {
        let agg = Aggregator::new();
        agg.record(&raw(ToolKind::Yamllint, "/a.yml", 0), vec![]);
        agg.record(&raw(ToolKind::Actionlint, "/a.yml", 0), vec![]);
        let res = agg.finalize();
        assert!(!res.overall_failed);
        assert_eq!(res.summary.files, 1);
        assert_eq!(res.summary.problems, 0);
    }

    #[test]
    fn test_nonzero_exit_fails_run_and_marks_tool() {
        let agg = Aggregator::new();
        agg.record(&raw(ToolKind::Yamllint, "/a.yml", 1), vec![]);
        agg.record(&raw(ToolKind::Actionlint, "/a.yml", 0), vec![]);
        let res = agg.finalize();
        assert!(res.yamllint_failed);
        assert!(!res.actionlint_failed);
        assert!(res.overall_failed);
    }

    #[test]
    fn test_warnings_alone_do_not_fail() {
        let agg = Aggregator::new();
        agg.record(
            &raw(ToolKind::Yamllint, "/a.yml", 0),
            vec![finding(ToolKind::Yamllint, "/a.yml", Severity::Warning, "w")],
        );
        let res = agg.finalize();
        assert_eq!(res.summary.warnings, 1);
        assert!(!res.overall_failed);
    }

    #[test]
    fn test_cross_file_order_is_path_sorted_within_file_arrival_order() {
        let agg = Aggregator::new();
        // Completion order: b first, then a
        agg.record(
            &raw(ToolKind::Yamllint, "/b.yml", 1),
            vec![finding(ToolKind::Yamllint, "/b.yml", Severity::Error, "b1")],
        );
        agg.record(
            &raw(ToolKind::Yamllint, "/a.yml", 1),
            vec![
                finding(ToolKind::Yamllint, "/a.yml", Severity::Error, "a1"),
                finding(ToolKind::Yamllint, "/a.yml", Severity::Error, "a2"),
            ],
        );
        agg.record(
            &raw(ToolKind::Actionlint, "/a.yml", 1),
            vec![finding(ToolKind::Actionlint, "/a.yml", Severity::Error, "a3")],
        );
        let res = agg.finalize();
        let messages: Vec<&str> = res.findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["a1", "a2", "a3", "b1"]);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let agg = Aggregator::new();
        agg.record(
            &raw(ToolKind::Actionlint, "/a.yml", 1),
            vec![finding(ToolKind::Actionlint, "/a.yml", Severity::Error, "x")],
        );
        let first = agg.finalize();
        let second = agg.finalize();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tool_error_counts_against_verdict() {
        let agg = Aggregator::new();
        agg.record(&raw(ToolKind::Yamllint, "/a.yml", 0), vec![]);
        agg.record_error(
            Path::new("/a.yml"),
            &ToolError::Timeout {
                tool: ToolKind::Actionlint,
                secs: 30,
            },
        );
        let res = agg.finalize();
        assert!(res.overall_failed);
        assert!(res.actionlint_failed);
        assert_eq!(res.tool_errors.len(), 1);
        assert!(res.tool_errors[0].error.contains("timed out"));
        assert_eq!(res.summary.files, 1);
    }
}
