use std::path::PathBuf;

use clap::{Args, Subcommand};
use primer_core::Category;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List units with their categories.
    List(ListArgs),
    /// Show one unit's metadata and source.
    Show(ShowArgs),
    /// Run a single unit and print its output and verdict.
    RunOne(RunOneArgs),
    /// Run every matching unit and print the aggregate report.
    RunAll(RunAllArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Only units in this category
    #[arg(long)]
    pub category: Option<Category>,

    /// Only units whose name matches this glob
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ShowArgs {
    /// Unit name
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct RunOneArgs {
    /// Unit name
    pub name: String,

    /// Timeout in seconds (overrides `runner.timeout_secs`)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

#[derive(Clone, Debug, Args)]
pub struct RunAllArgs {
    /// Only units in this category
    #[arg(long)]
    pub category: Option<Category>,

    /// Only units whose name matches this glob
    #[arg(long)]
    pub filter: Option<String>,

    /// Maximum units running at once (overrides `runner.concurrency`)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,

    /// Timeout in seconds per unit (overrides `runner.timeout_secs`)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Count timed-out units as skipped instead of failed
    #[arg(long)]
    pub timeouts_as_skipped: bool,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}
