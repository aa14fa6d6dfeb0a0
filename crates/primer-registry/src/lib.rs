//! # primer-registry
//!
//! Builds the read-only catalog of example units.
//!
//! A catalog is a directory tree of source files, one unit per file, grouped
//! by category directory:
//!
//! ```text
//! lessons/
//!   fixtures/sample.json        staged into working directories on demand
//!   functions/greet.py
//!   io/write_output.py
//! ```
//!
//! Each file opens with a comment header of `@` directives (expected output,
//! fixtures, stdin). See [`directives`] for the format.

pub mod determinism;
pub mod directives;
mod error;
mod registry;
mod walk;

pub use error::{LoadError, RegistryError};
pub use registry::{LoadOptions, Registry, Units};
