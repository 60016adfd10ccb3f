//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::error::SynthesisError;
use crate::domain::error::DomainError;
use crate::infrastructure::error::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<SynthesisError> for CliError {
    fn from(e: SynthesisError) -> Self {
        CliError::Infra(InfraError::from(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::from(SynthesisError::from(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Synthesis(s) => match s {
                    SynthesisError::Config { .. } => crate::exitcode::CONFIG,
                    SynthesisError::OutputCollision { .. } => crate::exitcode::CANTCREAT,
                    SynthesisError::Domain(_) => crate::exitcode::DATAERR,
                    _ => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}
