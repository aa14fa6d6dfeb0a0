//! # primer-core
//!
//! Core types shared by every primer crate:
//! - [`ExampleUnit`]: one self-contained lesson fragment plus its expected output
//! - [`Category`] tags and the per-run [`UnitState`] machine
//! - Cross-cutting error types

pub mod enums;
pub mod errors;
pub mod unit;

pub use enums::{Category, UnitState};
pub use errors::CoreError;
pub use unit::{Determinism, ExampleUnit};
