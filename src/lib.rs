//! rsproj: declarative workspace synthesizer.
//!
//! Model a source-controlled workspace as a tree of construct nodes —
//! one [`Repository`] root carrying a platform variant, any number of
//! [`Project`] units under it — then run the three-phase synthesis
//! lifecycle to turn attached components into files on disk.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::components::{GithubWorkflow, GitlabCi, IgnoreFile, ProjectIndex, TextFile};
pub use application::{SynthResult, Synthesizer, SynthesisError};
pub use domain::{
    Component, Construct, DomainError, DomainResult, GitHubOptions, GitLabOptions, GitOptions,
    HookError, HookResult, NodeRef, Phase, PlatformVariant, Project, ProjectOptions, Repository,
    RepositoryOptions, SynthContext, WriteError,
};
pub use infrastructure::{FileSystem, RealFileSystem};
