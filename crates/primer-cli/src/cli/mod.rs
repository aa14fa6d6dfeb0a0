use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::Commands;

/// Top-level CLI parser for the `primer` binary.
#[derive(Debug, Parser)]
#[command(name = "primer", version, about = "primer - run and check lesson examples")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: table, json, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Color status cells: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Progress bars: auto, on, off
    #[arg(long, global = true, default_value = "auto")]
    pub progress: ProgressMode,

    /// Catalog root (defaults to `catalog.root` from config)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            color: self.color,
            progress: self.progress,
            root: self.root.clone(),
        }
    }
}
