//! Domain layer: the construct tree and its lifecycle contract.

pub mod component;
pub mod error;
pub mod node;
pub mod project;
pub mod repository;
pub(crate) mod tree;
pub mod variant;

pub use component::{Component, HookError, HookResult, Phase, SynthContext, WriteError};
pub use error::{DomainError, DomainResult};
pub use node::{Construct, NodeRef};
pub use project::{Project, ProjectOptions};
pub use repository::{Repository, RepositoryOptions};
pub use variant::{GitHubOptions, GitLabOptions, GitOptions, PlatformVariant};
