//! CLI argument parsing via `clap`.

use crate::output::Verbosity;
use crate::resolve::DEFAULT_WORKFLOWS_DIR;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "walint",
    version,
    about = "Lint GitHub Actions workflows with yamllint and actionlint",
    long_about = "walint — orchestrates yamllint and actionlint against workflow files,\nmerges their findings into one report, and exits non-zero when either\ntool is unhappy.\n\nBy default every *.yml/*.yaml file in .github/workflows is checked.",
    after_help = "Examples:\n  walint\n  walint -f .github/workflows/ci.yml\n  walint -c walint.yaml -j\n  walint --dir ci/workflows --jobs 4 -v"
)]
/// Top-level CLI options.
pub struct Cli {
    /// Check a single workflow file instead of scanning a directory
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Path to configuration file (YAML or TOML; defaults apply if absent)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Verbose output: show the command run per invocation
    #[arg(short = 'v', long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,

    /// Debug output: implies verbose, also shows raw tool stdout/stderr
    #[arg(short = 'd', long, action = clap::ArgAction::SetTrue)]
    pub debug: bool,

    /// JSON output from actionlint and for the final report
    #[arg(short = 'j', long = "json", action = clap::ArgAction::SetTrue)]
    pub json: bool,

    /// Only print the final verdict
    #[arg(short = 'q', long, action = clap::ArgAction::SetTrue, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    /// Workflows directory to scan when no file is given
    #[arg(long = "dir", default_value = DEFAULT_WORKFLOWS_DIR)]
    pub dir: PathBuf,

    /// Number of files checked in parallel (default: CPU count)
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Per-linter timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.debug {
            Verbosity::Debug
        } else if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}
