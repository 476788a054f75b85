//! Report rendering for human and JSON output.
//!
//! Rendering is a pure projection of `RunResult`: the compose functions
//! return values/strings and never mutate state, and the print layer just
//! writes them out. Colors honor `NO_COLOR`.

use crate::models::{RunResult, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

/// Requested report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// How much detail the report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Final verdict only.
    Quiet,
    /// Findings and a summary.
    Normal,
    /// Also the command run per invocation.
    Verbose,
    /// Also raw subprocess stdout/stderr.
    Debug,
}

fn use_colors(format: OutputFormat) -> bool {
    format != OutputFormat::Json && std::env::var_os("NO_COLOR").is_none()
}

/// Print the final report in the requested format.
pub fn print_report(res: &RunResult, format: OutputFormat, verbosity: Verbosity) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&compose_json(res, verbosity)).unwrap()
        ),
        OutputFormat::Human => print!("{}", render_human(res, verbosity, use_colors(format))),
    }
}

/// Compose the JSON report: one record per finding plus a summary.
/// Invocation traces are included from verbose upward.
pub fn compose_json(res: &RunResult, verbosity: Verbosity) -> JsonVal {
    let mut out = json!({
        "findings": res.findings,
        "tool_errors": res.tool_errors,
        "yamllint_failed": res.yamllint_failed,
        "actionlint_failed": res.actionlint_failed,
        "summary": res.summary,
        "failed": res.overall_failed,
    });
    if verbosity >= Verbosity::Verbose {
        let traces: Vec<JsonVal> = res
            .traces
            .iter()
            .map(|t| {
                let mut v = json!({
                    "tool": t.tool,
                    "file": t.file,
                    "command": t.command,
                    "status": t.status,
                });
                if verbosity >= Verbosity::Debug {
                    v["stdout"] = json!(t.stdout);
                    v["stderr"] = json!(t.stderr);
                }
                v
            })
            .collect();
        out["invocations"] = json!(traces);
    }
    out
}

/// Render the human-readable report: findings grouped by file, severity
/// colored, summary and verdict at the end.
pub fn render_human(res: &RunResult, verbosity: Verbosity, color: bool) -> String {
    let mut out = String::new();
    if verbosity >= Verbosity::Normal {
        let mut current_file: Option<&str> = None;
        for f in &res.findings {
            if current_file != Some(f.file.as_str()) {
                current_file = Some(f.file.as_str());
                let header = display_path(&f.file);
                if color {
                    out.push_str(&format!("📄 {}\n", header.bold()));
                } else {
                    out.push_str(&format!("📄 {}\n", header));
                }
            }
            out.push_str(&render_finding(f, color));
        }
        for te in &res.tool_errors {
            let line = format!("✖ {} — {}", display_path(&te.file), te.error);
            if color {
                out.push_str(&format!("{}\n", line.red()));
            } else {
                out.push_str(&format!("{}\n", line));
            }
        }
        if verbosity >= Verbosity::Verbose {
            for t in &res.traces {
                out.push_str(&format!(
                    "🔧 {} exit={} — {}\n",
                    t.tool,
                    t.status.map_or("signal".to_string(), |c| c.to_string()),
                    t.command
                ));
                if verbosity >= Verbosity::Debug {
                    if !t.stdout.is_empty() {
                        out.push_str(&format!("--- {} stdout\n{}\n", t.tool, t.stdout.trim_end()));
                    }
                    if !t.stderr.is_empty() {
                        out.push_str(&format!("--- {} stderr\n{}\n", t.tool, t.stderr.trim_end()));
                    }
                }
            }
        }
        let summary = format!(
            "{} problems (errors={} warnings={} files={})",
            res.summary.problems, res.summary.errors, res.summary.warnings, res.summary.files
        );
        if color {
            out.push_str(&format!("{}\n", summary.bold()));
        } else {
            out.push_str(&format!("{}\n", summary));
        }
    }
    let verdict = if res.overall_failed {
        let v = "✖ checks completed with errors";
        if color {
            v.red().bold().to_string()
        } else {
            v.to_string()
        }
    } else {
        let v = "✔ all checks passed";
        if color {
            v.green().bold().to_string()
        } else {
            v.to_string()
        }
    };
    out.push_str(&verdict);
    out.push('\n');
    out
}

fn render_finding(f: &crate::models::Finding, color: bool) -> String {
    let sev = match f.severity {
        Severity::Error => {
            if color {
                "[error]".red().bold().to_string()
            } else {
                "[error]".to_string()
            }
        }
        Severity::Warning => {
            if color {
                "[warning]".yellow().bold().to_string()
            } else {
                "[warning]".to_string()
            }
        }
    };
    let icon = match f.severity {
        Severity::Error => {
            if color {
                "✖".red().to_string()
            } else {
                "✖".to_string()
            }
        }
        Severity::Warning => {
            if color {
                "▲".yellow().to_string()
            } else {
                "▲".to_string()
            }
        }
    };
    let position = match (f.line, f.column) {
        (Some(l), Some(c)) => format!("{}:{}", l, c),
        (Some(l), None) => l.to_string(),
        _ => "-".to_string(),
    };
    let rule = f
        .rule
        .as_deref()
        .map(|r| format!(" ({})", r))
        .unwrap_or_default();
    format!(
        "  {} {} {} {}{} [{}]\n",
        icon, sev, position, f.message, rule, f.tool
    )
}

/// Show paths relative to the current directory when they live under it.
pub fn display_path(file: &str) -> String {
    let path = Path::new(file);
    let Ok(cwd) = std::env::current_dir() else {
        return file.to_string();
    };
    match pathdiff::diff_paths(path, &cwd) {
        Some(rel) if !rel.starts_with("..") => rel.to_string_lossy().to_string(),
        _ => file.to_string(),
    }
}

/// Prefix for fatal error messages on stderr.
pub fn error_prefix(color: bool) -> String {
    if color {
        "✖ error:".red().bold().to_string()
    } else {
        "✖ error:".to_string()
    }
}

pub fn stderr_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}
