//! Normalization of heterogeneous tool output into `Finding` records.
//!
//! The parse strategy is a tagged variant chosen once per tool at startup:
//! line-based for yamllint's parsable format (and actionlint's default
//! text output), JSON for actionlint when structured output was requested.
//! Line parsing is tolerant: lines that do not match the expected
//! `file:line:col: message` grammar are skipped, since the external tools'
//! exact wording varies slightly across versions.

use crate::models::{Finding, RawInvocation, Severity, ToolKind};
use regex::Regex;
use serde::Deserialize;

/// How one tool's stdout is decoded. Selected per tool at startup, never
/// sniffed per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Lines,
    Json,
}

impl ParseMode {
    /// JSON is only available from actionlint, and only when requested.
    pub fn for_tool(tool: ToolKind, json: bool) -> ParseMode {
        match tool {
            ToolKind::Actionlint if json => ParseMode::Json,
            _ => ParseMode::Lines,
        }
    }
}

/// actionlint's structured finding object, mapped onto `Finding`. The
/// object's `filepath` is ignored in favor of the invocation target so
/// grouping stays consistent across tools.
#[derive(Debug, Deserialize)]
struct ActionlintJsonFinding {
    message: String,
    line: Option<u32>,
    column: Option<u32>,
    kind: Option<String>,
}

/// Parses one tool's raw invocations into findings.
pub struct Normalizer {
    mode: ParseMode,
    line_re: Regex,
}

impl Normalizer {
    pub fn new(mode: ParseMode) -> Self {
        // file:line:col: message — the colon after the column is optional
        // since actionlint and yamllint disagree on it across versions.
        let line_re = Regex::new(r"^(?P<file>[^\s:][^:]*):(?P<line>\d+):(?P<col>\d+):?\s+(?P<rest>.+?)\s*$")
            .expect("line pattern compiles");
        Self { mode, line_re }
    }

    /// Normalize one raw invocation into ordered findings.
    ///
    /// Empty stdout with a clean exit yields zero findings (the pass
    /// case). A non-zero exit that decodes to zero findings is surfaced
    /// as a single error finding so the failure is never silently lost.
    pub fn normalize(&self, raw: &RawInvocation) -> Vec<Finding> {
        let mut findings = match self.mode {
            ParseMode::Lines => self.parse_lines(raw),
            ParseMode::Json => parse_json(raw),
        };
        if !raw.clean_exit() && findings.is_empty() {
            findings.push(Finding {
                tool: raw.tool,
                file: raw.file.to_string_lossy().to_string(),
                line: None,
                column: None,
                severity: Severity::Error,
                rule: None,
                message: format!(
                    "tool signaled failure with no decodable findings (exit {})",
                    raw.status.unwrap_or(-1)
                ),
            });
        }
        findings
    }

    fn parse_lines(&self, raw: &RawInvocation) -> Vec<Finding> {
        let file = raw.file.to_string_lossy().to_string();
        raw.stdout
            .lines()
            .filter_map(|line| {
                let caps = self.line_re.captures(line)?;
                let rest = caps.name("rest")?.as_str();
                let (severity, rest) = split_severity(rest);
                let (message, rule) = split_rule(raw.tool, rest);
                Some(Finding {
                    tool: raw.tool,
                    file: file.clone(),
                    line: caps.name("line")?.as_str().parse().ok(),
                    column: caps.name("col")?.as_str().parse().ok(),
                    severity,
                    rule,
                    message,
                })
            })
            .collect()
    }
}

/// Strip yamllint's leading `[error]`/`[warning]` level token.
fn split_severity(rest: &str) -> (Severity, &str) {
    if let Some(tail) = rest.strip_prefix("[warning]") {
        (Severity::Warning, tail.trim_start())
    } else if let Some(tail) = rest.strip_prefix("[error]") {
        (Severity::Error, tail.trim_start())
    } else {
        (Severity::Error, rest)
    }
}

/// Pull the trailing rule name off a message: yamllint writes `(rule)`,
/// actionlint writes `[rule]`.
fn split_rule(tool: ToolKind, rest: &str) -> (String, Option<String>) {
    let (open, close) = match tool {
        ToolKind::Yamllint => ('(', ')'),
        ToolKind::Actionlint => ('[', ']'),
    };
    if rest.ends_with(close) {
        if let Some(start) = rest.rfind(open) {
            let rule = &rest[start + 1..rest.len() - 1];
            if !rule.is_empty() && !rule.contains(' ') {
                return (rest[..start].trim_end().to_string(), Some(rule.to_string()));
            }
        }
    }
    (rest.to_string(), None)
}

fn parse_json(raw: &RawInvocation) -> Vec<Finding> {
    let Ok(items) = serde_json::from_str::<Vec<ActionlintJsonFinding>>(&raw.stdout) else {
        // Undecodable output falls through to the non-zero-exit rule.
        return Vec::new();
    };
    let file = raw.file.to_string_lossy().to_string();
    items
        .into_iter()
        .map(|item| Finding {
            tool: raw.tool,
            file: file.clone(),
            line: item.line,
            column: item.column,
            severity: Severity::Error,
            rule: item.kind,
            message: item.message,
        })
        .collect()
}
