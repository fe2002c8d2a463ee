//! Engine error kinds.
//!
//! Every failure in this crate is local and recoverable: a rejected command is
//! simply not applied and never reaches the undo history.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::doc::ElementId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The command would leave an element in an invalid state.
    #[error("invalid geometry for {id}: {reason}")]
    Validation { id: ElementId, reason: String },
    /// The command refers to an element that is not in the collection.
    #[error("element not found: {0}")]
    NotFound(ElementId),
    /// An add command reuses an id that is already live.
    #[error("element already exists: {0}")]
    DuplicateId(ElementId),
    /// The command carries no changes.
    #[error("command has no changes")]
    EmptyCommand,
}

impl EngineError {
    /// Stable machine-readable code for host error reporting.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "E_VALIDATION",
            Self::NotFound(_) => "E_NOT_FOUND",
            Self::DuplicateId(_) => "E_DUPLICATE_ID",
            Self::EmptyCommand => "E_EMPTY_COMMAND",
        }
    }

    pub(crate) fn validation(id: ElementId, reason: impl Into<String>) -> Self {
        Self::Validation { id, reason: reason.into() }
    }
}
