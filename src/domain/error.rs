//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the construct-tree contract.
/// Structural errors are fatal at construction time and never retried.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("duplicate child id '{id}' under '{parent}'")]
    DuplicateChildId { parent: String, id: String },

    #[error("tree is frozen, cannot attach '{node}' after synthesis has started")]
    TreeFrozen { node: String },

    #[error("invalid node id '{id}': {reason}")]
    InvalidId { id: String, reason: String },

    #[error("no repository ancestor for node '{node}'")]
    NoRepository { node: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
