//! walint core library.
//!
//! Orchestrates two independent external linters — yamllint (generic YAML
//! syntax) and actionlint (GitHub-Actions-specific) — against a set of
//! workflow files, merges their findings into one report, and derives a
//! single pass/fail verdict.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: User configuration loading and per-tool argument derivation.
//! - `resolve`: Workflow file discovery.
//! - `invoke`: Subprocess invocation with timeout and cancellation.
//! - `normalize`: Tool output parsing into unified findings.
//! - `aggregate`: Run-level accumulation and verdict.
//! - `run`: Pipeline orchestration over a bounded worker pool.
//! - `output`: Human/JSON report rendering.
//! - `models`: Shared data types.
//! - `error`: Failure taxonomy.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod invoke;
pub mod models;
pub mod normalize;
pub mod output;
pub mod resolve;
pub mod run;
