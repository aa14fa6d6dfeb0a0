//! Cross-cutting error types for primer.
//!
//! Crate-specific failures (`LoadError`, `RunError`, `ConfigError`) live in
//! their own crates and converge into `anyhow` in `primer-cli`.

use thiserror::Error;

/// Errors that can be raised while building or inspecting core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Category tag outside the known set.
    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),

    /// A unit state transition that the state machine does not allow.
    #[error("Invalid state transition: {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Unit data failed validation (empty source, malformed name, ...).
    #[error("Invalid unit '{name}': {reason}")]
    InvalidUnit { name: String, reason: String },
}
