//! walint CLI binary entry point.
//!
//! Fatal setup errors (bad path, malformed config, missing tools) abort
//! before any linting with exit code 1; lint failures share the same
//! code.

use clap::Parser;
use std::time::Duration;
use walint::cli::Cli;
use walint::config;
use walint::error::WalintError;
use walint::invoke::{self, CancelToken};
use walint::output::{self, OutputFormat, Verbosity};
use walint::resolve;
use walint::run::{Pipeline, RunOptions};

fn main() {
    std::process::exit(real_main());
}

fn real_main() -> i32 {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let cancel = CancelToken::new();
    {
        let token = cancel.clone();
        let _ = ctrlc::set_handler(move || token.cancel());
    }

    // Fail fast, in order: config, then tool availability, then targets.
    let user_cfg = match config::load_user_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return fatal(&err),
    };
    if verbosity >= Verbosity::Debug {
        eprintln!(
            "configuration: yamllint rules={:?} actionlint flags={:?}",
            user_cfg.yamllint.as_ref().map(|y| &y.rules),
            user_cfg.actionlint.as_ref().map(|a| &a.flags),
        );
    }
    if let Err(err) = invoke::ensure_tools() {
        return fatal(&err);
    }
    let files = match resolve::resolve(cli.file.as_deref(), &cli.dir) {
        Ok(files) => files,
        Err(err) => return fatal(&err),
    };

    let opts = RunOptions {
        json: cli.json,
        jobs: cli.jobs,
        timeout: Duration::from_secs(cli.timeout),
    };
    let result = Pipeline::new(&user_cfg, &opts).run(&files, &cancel);
    output::print_report(&result, format, verbosity);

    if cancel.is_cancelled() {
        eprintln!(
            "{} run interrupted; partial results above",
            output::error_prefix(output::stderr_colors())
        );
        return 1;
    }
    if result.overall_failed {
        1
    } else {
        0
    }
}

fn fatal(err: &WalintError) -> i32 {
    eprintln!("{} {}", output::error_prefix(output::stderr_colors()), err);
    1
}
