use std::process::ExitCode;
use std::sync::Arc;

use primer_report::{Collector, ReportPolicy, UnitOutcome};
use serde::Serialize;

use crate::cli::root_commands::RunOneArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::interrupt::InterruptGuard;
use crate::commands::shared::overrides::effective_timeout;
use crate::commands::verdict::{OUTCOME_HEADERS, is_acceptable, outcome_row};
use crate::context::AppContext;
use crate::output::{Tabular, output};

#[derive(Serialize)]
#[serde(transparent)]
struct RunOneResponse {
    outcome: UnitOutcome,
}

impl Tabular for RunOneResponse {
    fn headers(&self) -> &'static [&'static str] {
        OUTCOME_HEADERS
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![outcome_row(&self.outcome)]
    }
}

/// Handle `primer run-one`.
pub async fn handle(
    args: &RunOneArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let unit = Arc::clone(ctx.registry.get(&args.name)?);
    let timeout = effective_timeout(args.timeout, &ctx.config.runner);
    let policy = ReportPolicy {
        timeouts_as_skipped: ctx.config.runner.timeouts_as_skipped,
    };

    let interrupt = InterruptGuard::install();
    let result = ctx
        .runner()
        .run_with_cancel(&unit, timeout, interrupt.cancellation())
        .await;
    drop(interrupt);

    let mut collector = Collector::new([Arc::clone(&unit)], policy);
    let outcome = collector.record(unit.name(), &result)?.clone();

    if flags.format == OutputFormat::Table
        && let Some(execution) = &outcome.execution
    {
        print!("{}", execution.stdout);
        if !is_acceptable(outcome.state()) && !execution.stderr.is_empty() {
            eprint!("{}", execution.stderr);
        }
    }

    let code = if is_acceptable(outcome.state()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };
    output(&RunOneResponse { outcome }, flags.format)?;
    Ok(code)
}
