//! Unified error types for the domain layer
//!
//! Provides a common error type usable across all domain operations, so
//! callers never have to fall back to String or anyhow at this level.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A text field could not be parsed (reward lines, requirement lines)
    #[error("Parse error: {0}")]
    Parse(String),

    /// An imported progress document had the wrong shape or invalid JSON
    #[error("Invalid progress import: {0}")]
    InvalidImport(String),

    /// A quest id was referenced but no node exists for it
    #[error("Unknown quest: {0}")]
    UnknownQuest(String),
}

impl DomainError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid-import error
    pub fn invalid_import(msg: impl Into<String>) -> Self {
        Self::InvalidImport(msg.into())
    }

    /// Create an unknown-quest error
    pub fn unknown_quest(id: impl Into<String>) -> Self {
        Self::UnknownQuest(id.into())
    }
}
