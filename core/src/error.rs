//! Error types for the grid engine.
//!
//! The engine deliberately has a small error surface:
//!
//! - [`ActionError`] - failures inside caller-supplied action handlers,
//!   caught at the dispatch boundary
//! - [`DeleteError`] - per-item failures during a bulk delete batch
//!
//! Neither type ever unwinds through the grid. Action errors are logged and
//! converted to a transient notice; delete errors are counted per item and
//! reported once as an aggregate. Malformed permission payloads are not
//! errors at all: they degrade to an empty grant set (see
//! [`crate::permissions`]).

use thiserror::Error;

// =============================================================================
// Action Dispatch Errors
// =============================================================================

/// Error raised by a row-scoped action handler.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Handler reported a failure.
    #[error("Action '{action}' failed: {message}")]
    HandlerFailed { action: String, message: String },

    /// Row was missing data the handler needs.
    #[error("Action '{action}' missing row field '{field}'")]
    MissingField { action: String, field: String },
}

impl ActionError {
    /// Convenience constructor for handler failures.
    pub fn failed(action: impl Into<String>, message: impl Into<String>) -> Self {
        ActionError::HandlerFailed {
            action: action.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Bulk Delete Errors
// =============================================================================

/// Per-item failure inside a bulk delete batch.
#[derive(Debug, Error)]
#[error("Delete failed for '{key}': {message}")]
pub struct DeleteError {
    /// Row key the failure belongs to.
    pub key: String,
    /// Backend-supplied failure message.
    pub message: String,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for action handlers.
pub type ActionResult = Result<(), ActionError>;

/// Result type for per-item delete operations.
pub type DeleteResult = Result<(), DeleteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_format() {
        let err = ActionError::failed("edit", "network unreachable");
        let msg = err.to_string();
        assert!(msg.contains("edit"));
        assert!(msg.contains("network unreachable"));
    }

    #[test]
    fn test_delete_error_format() {
        let err = DeleteError {
            key: "42".into(),
            message: "row locked".into(),
        };
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("row locked"));
    }
}
