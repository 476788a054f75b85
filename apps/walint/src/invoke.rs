//! External linter invocation.
//!
//! Each invocation spawns the tool as a subprocess with piped output,
//! drains stdout/stderr on reader threads (no truncation), and polls the
//! child against a deadline so a hung tool cannot stall the run. A
//! non-zero exit with captured output is a successful invocation carrying
//! a failing lint result, never an error.

use crate::error::{ToolError, WalintError};
use crate::models::{RawInvocation, ToolConfig, ToolKind};
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Shared cancellation flag passed into every invocation.
///
/// Once set, no new subprocesses are launched and in-flight children are
/// killed. Already-completed results remain valid.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Verify both external tools exist on PATH before any file is processed.
///
/// Checking only one of the two would produce misleading partial
/// confidence, so any missing tool aborts the whole run.
pub fn ensure_tools() -> Result<(), WalintError> {
    let path = std::env::var_os("PATH").unwrap_or_default();
    let missing: Vec<ToolKind> = ToolKind::ALL
        .into_iter()
        .filter(|t| find_in_path(&path, t.program()).is_none())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(WalintError::ToolsNotFound(missing))
    }
}

fn find_in_path(path_var: &OsStr, program: &str) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Runs one external tool against files, with a per-invocation timeout.
#[derive(Debug, Clone)]
pub struct Invoker {
    tool: ToolKind,
    program: String,
    timeout: Duration,
}

impl Invoker {
    pub fn new(tool: ToolKind, timeout: Duration) -> Self {
        Self::with_program(tool, tool.program(), timeout)
    }

    /// Override the executable, e.g. to point at a stub in tests.
    pub fn with_program(tool: ToolKind, program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            tool,
            program: program.into(),
            timeout,
        }
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Invoke the tool against `file` with config-derived arguments.
    ///
    /// Does not interpret output; exit status and both streams are
    /// captured verbatim. No retries.
    pub fn invoke(
        &self,
        file: &Path,
        config: &ToolConfig,
        cancel: &CancelToken,
    ) -> Result<RawInvocation, ToolError> {
        if cancel.is_cancelled() {
            return Err(ToolError::Cancelled { tool: self.tool });
        }
        let command = render_command(&self.program, &config.args, file);
        let mut child = Command::new(&self.program)
            .args(&config.args)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolError::Spawn {
                tool: self.tool,
                message: e.to_string(),
            })?;

        // Drain both pipes off-thread so a chatty child never deadlocks
        // against a full pipe buffer while we poll for exit.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let out_handle = thread::spawn(move || drain(stdout_pipe));
        let err_handle = thread::spawn(move || drain(stderr_pipe));

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ToolError::Crashed {
                        tool: self.tool,
                        message: e.to_string(),
                    });
                }
            }
            if cancel.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ToolError::Cancelled { tool: self.tool });
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ToolError::Timeout {
                    tool: self.tool,
                    secs: self.timeout.as_secs(),
                });
            }
            thread::sleep(Duration::from_millis(10));
        };

        let stdout = out_handle.join().unwrap_or_default();
        let stderr = err_handle.join().unwrap_or_default();

        match status.code() {
            Some(code) => Ok(RawInvocation {
                tool: self.tool,
                file: file.to_path_buf(),
                status: Some(code),
                stdout,
                stderr,
                command,
            }),
            None => Err(ToolError::Crashed {
                tool: self.tool,
                message: "killed by signal".to_string(),
            }),
        }
    }
}

fn drain(pipe: Option<impl Read>) -> String {
    let Some(mut pipe) = pipe else {
        return String::new();
    };
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn render_command(program: &str, args: &[String], file: &Path) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().cloned());
    parts.push(file.to_string_lossy().to_string());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn stub(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn cfg(args: &[&str]) -> ToolConfig {
        ToolConfig {
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_captures_streams_and_exit_status() {
        let dir = tempdir().unwrap();
        let program = stub(dir.path(), "yl", "echo out-line; echo err-line >&2; exit 1");
        let inv = Invoker::with_program(
            ToolKind::Yamllint,
            program.to_string_lossy(),
            Duration::from_secs(5),
        );

        let raw = inv
            .invoke(Path::new("wf.yml"), &cfg(&[]), &CancelToken::new())
            .unwrap();
        // Non-zero exit with output is a successful invocation
        assert_eq!(raw.status, Some(1));
        assert!(!raw.clean_exit());
        assert_eq!(raw.stdout.trim(), "out-line");
        assert_eq!(raw.stderr.trim(), "err-line");
        assert!(raw.command.ends_with("wf.yml"));
    }

    #[test]
    fn test_config_args_precede_file() {
        let dir = tempdir().unwrap();
        let program = stub(dir.path(), "al", r#"printf '%s\n' "$@""#);
        let inv = Invoker::with_program(
            ToolKind::Actionlint,
            program.to_string_lossy(),
            Duration::from_secs(5),
        );

        let raw = inv
            .invoke(Path::new("wf.yml"), &cfg(&["-no-color"]), &CancelToken::new())
            .unwrap();
        assert_eq!(raw.stdout, "-no-color\nwf.yml\n");
    }

    #[test]
    fn test_timeout_kills_hung_tool() {
        let dir = tempdir().unwrap();
        let program = stub(dir.path(), "hang", "sleep 5");
        let inv = Invoker::with_program(
            ToolKind::Yamllint,
            program.to_string_lossy(),
            Duration::from_millis(150),
        );

        let started = Instant::now();
        let err = inv
            .invoke(Path::new("wf.yml"), &cfg(&[]), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_cancelled_token_prevents_launch() {
        let dir = tempdir().unwrap();
        let marker = dir.path().join("ran");
        let program = stub(
            dir.path(),
            "tool",
            &format!("touch {}", marker.to_string_lossy()),
        );
        let inv = Invoker::with_program(
            ToolKind::Actionlint,
            program.to_string_lossy(),
            Duration::from_secs(5),
        );
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = inv
            .invoke(Path::new("wf.yml"), &cfg(&[]), &cancel)
            .unwrap_err();
        assert!(matches!(err, ToolError::Cancelled { .. }));
        assert!(!marker.exists());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let inv = Invoker::with_program(
            ToolKind::Yamllint,
            "/definitely/not/here",
            Duration::from_secs(5),
        );
        let err = inv
            .invoke(Path::new("wf.yml"), &cfg(&[]), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }

    #[test]
    fn test_find_in_path_scans_directories_in_order() {
        let dir = tempdir().unwrap();
        stub(dir.path(), "sometool", "exit 0");
        let path_var = std::env::join_paths([dir.path().to_path_buf(), PathBuf::from("/nope")])
            .unwrap();
        assert!(find_in_path(&path_var, "sometool").is_some());
        assert!(find_in_path(&path_var, "othertool").is_none());
    }
}
