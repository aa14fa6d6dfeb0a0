use std::process::ExitCode;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::List(args) => {
            commands::list::handle(&args, ctx, flags)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show(args) => {
            commands::show::handle(&args, ctx, flags)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::RunOne(args) => commands::run_one::handle(&args, ctx, flags).await,
        Commands::RunAll(args) => commands::run_all::handle(&args, ctx, flags).await,
    }
}
