//! Errors the composer surfaces to its callers.

use thiserror::Error;

/// Failures that must be distinguishable by callers.
///
/// Stats normalization never fails; an unknown style is the only hard error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("unknown style '{id}' (available: {})", .available.join(", "))]
    UnknownStyle { id: String, available: Vec<String> },
}
