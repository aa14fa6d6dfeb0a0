use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use primer_report::{Collector, Report, ReportPolicy};
use primer_runner::{Schedule, run_pool};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunAllArgs;
use crate::commands::shared::interrupt::InterruptGuard;
use crate::commands::shared::overrides::{effective_concurrency, effective_timeout};
use crate::commands::shared::select::select_units;
use crate::commands::verdict::{OUTCOME_HEADERS, outcome_row};
use crate::context::AppContext;
use crate::output::{Tabular, output};
use crate::progress::Progress;

#[derive(Serialize)]
#[serde(transparent)]
struct RunAllResponse<'a> {
    report: &'a Report,
}

impl Tabular for RunAllResponse<'_> {
    fn headers(&self) -> &'static [&'static str] {
        OUTCOME_HEADERS
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.report.units.iter().map(outcome_row).collect()
    }

    fn footer(&self) -> Option<String> {
        let summary = &self.report.summary;
        Some(format!(
            "{} units: {} passed, {} failed, {} skipped, {} timed out, {} errored in {:.1}s",
            summary.total,
            summary.passed,
            summary.failed,
            summary.skipped,
            summary.timed_out,
            summary.errored,
            std::time::Duration::from_millis(self.report.wall_time_ms).as_secs_f64(),
        ))
    }
}

/// Handle `primer run-all`.
pub async fn handle(
    args: &RunAllArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let units = select_units(&ctx.registry, args.category, args.filter.as_deref())?;
    let runner_config = &ctx.config.runner;
    let schedule = Schedule {
        concurrency: effective_concurrency(args.concurrency, runner_config),
        timeout: effective_timeout(args.timeout, runner_config),
    };
    let policy = ReportPolicy {
        timeouts_as_skipped: args.timeouts_as_skipped || runner_config.timeouts_as_skipped,
    };

    tracing::info!(
        units = units.len(),
        concurrency = schedule.concurrency,
        timeout = ?schedule.timeout,
        "running units"
    );

    let mut collector = Collector::new(units.iter().cloned(), policy);
    let progress = Progress::bar(u64::try_from(units.len()).unwrap_or(u64::MAX), "running");
    let interrupt = InterruptGuard::install();

    run_pool(
        Arc::new(ctx.runner()),
        units,
        schedule,
        interrupt.cancellation(),
        |run| {
            match collector.record(run.unit.name(), &run.result) {
                Ok(outcome) => {
                    progress.set_message(&format!("{} {}", outcome.name, outcome.state()));
                }
                Err(error) => tracing::error!(%error, "failed to record unit result"),
            }
            progress.inc(1);
        },
    )
    .await;

    if interrupt.cancellation().is_cancelled() {
        progress.finish_err("interrupted");
    } else {
        progress.finish_clear();
    }
    drop(interrupt);

    let report = collector.finish();
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }

    output(&RunAllResponse { report: &report }, flags.format)?;
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn write_report(path: &Path, report: &Report) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
