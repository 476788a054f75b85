//! Pipeline orchestration: fan files out over a bounded worker pool, run
//! both linters per file, normalize, aggregate, finalize.
//!
//! Files are independent and processed in parallel; within one file the
//! two invocations are sequential. The aggregator serializes recording,
//! and `finalize` path-sorts the report, so the output is deterministic
//! regardless of completion order.

use crate::aggregate::Aggregator;
use crate::config::{self, UserConfig};
use crate::error::ToolError;
use crate::invoke::{CancelToken, Invoker};
use crate::models::{RunResult, ToolConfig, ToolKind};
use crate::normalize::{Normalizer, ParseMode};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Run-wide knobs resolved from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Request structured output from actionlint.
    pub json: bool,
    /// Worker pool size; `None` uses the CPU-derived default.
    pub jobs: Option<usize>,
    /// Per-invocation timeout.
    pub timeout: Duration,
}

/// One tool's invoker, derived config, and output parser.
pub struct ToolRunner {
    pub invoker: Invoker,
    pub config: ToolConfig,
    pub normalizer: Normalizer,
}

impl ToolRunner {
    fn check(&self, file: &Path, agg: &Aggregator, cancel: &CancelToken) {
        match self.invoker.invoke(file, &self.config, cancel) {
            Ok(raw) => {
                let findings = self.normalizer.normalize(&raw);
                agg.record(&raw, findings);
            }
            // A cancelled invocation did not complete; only finished
            // results are reported.
            Err(ToolError::Cancelled { .. }) => {}
            Err(err) => agg.record_error(file, &err),
        }
    }
}

/// The full two-linter pipeline for one run.
pub struct Pipeline {
    yamllint: ToolRunner,
    actionlint: ToolRunner,
    jobs: Option<usize>,
}

impl Pipeline {
    /// Production wiring: PATH-resolved tools, configs derived from the
    /// user configuration.
    pub fn new(user_cfg: &UserConfig, opts: &RunOptions) -> Self {
        let (yaml_cfg, act_cfg) = config::translate(user_cfg, opts.json);
        let yamllint = ToolRunner {
            invoker: Invoker::new(ToolKind::Yamllint, opts.timeout),
            config: yaml_cfg,
            normalizer: Normalizer::new(ParseMode::for_tool(ToolKind::Yamllint, opts.json)),
        };
        let actionlint = ToolRunner {
            invoker: Invoker::new(ToolKind::Actionlint, opts.timeout),
            config: act_cfg,
            normalizer: Normalizer::new(ParseMode::for_tool(ToolKind::Actionlint, opts.json)),
        };
        Self::with_runners(yamllint, actionlint, opts.jobs)
    }

    /// Explicit wiring; lets tests point the invokers at stub programs.
    pub fn with_runners(yamllint: ToolRunner, actionlint: ToolRunner, jobs: Option<usize>) -> Self {
        Self {
            yamllint,
            actionlint,
            jobs,
        }
    }

    /// Check every file and produce the finalized run result.
    pub fn run(&self, files: &[PathBuf], cancel: &CancelToken) -> RunResult {
        let agg = Aggregator::new();
        let scan = || {
            files.par_iter().for_each(|file| {
                if cancel.is_cancelled() {
                    return;
                }
                self.yamllint.check(file, &agg, cancel);
                self.actionlint.check(file, &agg, cancel);
            });
        };
        match ThreadPoolBuilder::new()
            .num_threads(self.jobs.unwrap_or(0))
            .build()
        {
            Ok(pool) => pool.install(scan),
            // Fall back to the global pool if the builder is rejected.
            Err(_) => scan(),
        }
        agg.finalize()
    }
}
