//! Bounded concurrent execution of many units.

use std::sync::Arc;
use std::time::Duration;

use primer_core::ExampleUnit;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cancel::Cancellation;
use crate::error::RunError;
use crate::runner::{ExecutionResult, Runner};

/// Concurrency bound and per-unit timeout for a pool run.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub concurrency: usize,
    pub timeout: Duration,
}

/// One unit paired with what happened when it ran.
#[derive(Debug)]
pub struct UnitRun {
    pub unit: Arc<ExampleUnit>,
    pub result: Result<ExecutionResult, RunError>,
}

/// Run `units` with at most `schedule.concurrency` children alive at once.
///
/// The bound is clamped to `1..=Semaphore::MAX_PERMITS`.
///
/// Runs are returned, and passed to `on_complete`, in completion order. Units
/// still waiting for a slot when `cancel` fires come back as
/// [`RunError::Cancelled`]; in-flight units are killed and report a cancelled
/// exit status.
pub async fn run_pool<F>(
    runner: Arc<Runner>,
    units: Vec<Arc<ExampleUnit>>,
    schedule: Schedule,
    cancel: &Cancellation,
    mut on_complete: F,
) -> Vec<UnitRun>
where
    F: FnMut(&UnitRun),
{
    let concurrency = schedule.concurrency.clamp(1, Semaphore::MAX_PERMITS);
    let slots = Arc::new(Semaphore::new(concurrency));
    let mut set = JoinSet::new();
    let total = units.len();

    tracing::debug!(
        units = total,
        concurrency,
        timeout = ?schedule.timeout,
        "starting pool"
    );

    for unit in units {
        let runner = Arc::clone(&runner);
        let slots = Arc::clone(&slots);
        let cancel = cancel.clone();
        set.spawn(async move {
            let permit = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                permit = slots.acquire_owned() => permit.ok(),
            };
            let result = match permit {
                Some(_permit) => {
                    runner
                        .run_with_cancel(&unit, schedule.timeout, &cancel)
                        .await
                }
                None => Err(RunError::Cancelled {
                    unit: unit.name().to_string(),
                }),
            };
            UnitRun { unit, result }
        });
    }

    let mut finished = Vec::with_capacity(total);
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(run) => {
                on_complete(&run);
                finished.push(run);
            }
            Err(error) => {
                tracing::error!(%error, "unit task failed");
            }
        }
    }

    finished
}
