//! # primer-report
//!
//! Judges unit runs and aggregates them into a report:
//! - [`compare`]: exact, in-order line comparison with the first divergence
//! - [`classify`]: one run to one [`Verdict`]
//! - [`Collector`]: gathers results as they complete and drives each unit's
//!   state machine; [`Collector::finish`] produces the [`Report`] in registry order

mod compare;
mod outcome;
mod report;

pub use compare::{Divergence, compare, output_lines};
pub use outcome::{ReportPolicy, SkipReason, Verdict, classify, was_spawned};
pub use report::{Collector, Report, ReportError, Summary, UnitOutcome};
