//! Synthesis-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::component::{HookError, Phase};
use crate::domain::error::DomainError;

/// Errors raised while driving the synthesis lifecycle. A hook failure
/// aborts the current and all later phases; partial output may already
/// exist on disk and is not rolled back.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{phase} failed at '{node}'")]
    Hook {
        node: String,
        phase: Phase,
        #[source]
        source: HookError,
    },

    #[error("output collision on '{path}': declared by both '{first}' and '{second}'")]
    OutputCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("tree rooted at '{root}' was already synthesized")]
    AlreadySynthesized { root: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthesisError>;
