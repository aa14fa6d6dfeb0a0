use std::process::ExitCode;

use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("primer error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(flags.quiet, flags.verbose)?;
    ui::init(&flags);

    let (project_root, config) = bootstrap::load_config(&flags)?;
    context::warn_unconfigured(&config);

    let ctx = context::AppContext::init(&project_root, config, flags.root.as_deref())?;
    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PRIMER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
