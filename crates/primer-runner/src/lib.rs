//! # primer-runner
//!
//! Runs example units one at a time or as a bounded pool.
//!
//! Every run gets a private temporary directory that serves as working
//! directory, `HOME` and `TMPDIR`. The child environment is cleared and
//! rebuilt from an explicit pass-through list, so concurrent runs share no
//! mutable process state. The directory is removed on every exit path.

mod cancel;
mod error;
mod pool;
mod process;
mod runner;
mod sandbox;

pub use cancel::Cancellation;
pub use error::RunError;
pub use pool::{Schedule, UnitRun, run_pool};
pub use runner::{ExecutionResult, ExitStatus, Runner};
