use primer_runner::Cancellation;
use tokio::task::JoinHandle;

/// Cancels a run on Ctrl-C for as long as it is alive.
pub struct InterruptGuard {
    cancel: Cancellation,
    watcher: JoinHandle<()>,
}

impl InterruptGuard {
    #[must_use]
    pub fn install() -> Self {
        let cancel = Cancellation::new();
        let trigger = cancel.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted; cancelling in-flight units");
                trigger.cancel();
            }
        });
        Self { cancel, watcher }
    }

    #[must_use]
    pub const fn cancellation(&self) -> &Cancellation {
        &self.cancel
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}
