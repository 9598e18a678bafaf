//! Error types for the claims model.

use thiserror::Error;

/// Errors raised by claim, identity and principal operations.
///
/// Only malformed calls are errors. A query that simply finds nothing
/// (no such claim, not in role) returns `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    /// A required argument was empty.
    #[error("invalid argument '{argument}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

impl ClaimsError {
    #[must_use]
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Fails with `InvalidArgument` when `value` is empty.
    pub(crate) fn require_non_empty(argument: &'static str, value: &str) -> Result<(), Self> {
        if value.is_empty() {
            return Err(Self::invalid_argument(argument, "cannot be empty"));
        }
        Ok(())
    }
}
