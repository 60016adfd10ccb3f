//! Platform variants: the closed set of git/CI specializations a
//! repository can carry.
//!
//! This is deliberately a tagged union with capability accessors, not an
//! open plugin trait: the set is fixed and the GitHub and GitLab
//! configuration surfaces are genuinely disjoint. Downstream code matches
//! on the concrete variant instead of calling through a shared interface.

use crate::application::components::{GithubWorkflow, GitlabCi, IgnoreFile};
use crate::domain::error::DomainResult;
use crate::domain::repository::Repository;

/// Git-level options, shared by every git-based variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOptions {
    /// Seed patterns for the managed ignore file.
    pub ignore_patterns: Vec<String>,
}

impl Default for GitOptions {
    fn default() -> Self {
        Self {
            ignore_patterns: vec![".DS_Store".to_string(), "*.bak".to_string()],
        }
    }
}

/// GitHub-specific options (extends [`GitOptions`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubOptions {
    pub git: GitOptions,
    /// Workflow file name under `.github/workflows/`, without extension.
    pub workflow_name: String,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            git: GitOptions::default(),
            workflow_name: "build".to_string(),
        }
    }
}

/// GitLab-specific options (extends [`GitOptions`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLabOptions {
    pub git: GitOptions,
    /// Pipeline stages for `.gitlab-ci.yml`, in order.
    pub stages: Vec<String>,
}

impl Default for GitLabOptions {
    fn default() -> Self {
        Self {
            git: GitOptions::default(),
            stages: vec!["build".to_string()],
        }
    }
}

/// Closed set of platform specializations composed onto a repository at
/// construction. Fixed for the repository's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformVariant {
    /// No version-control integration at all.
    None,
    /// Plain git: managed ignore file, no CI.
    Git(GitOptions),
    /// Git plus a GitHub Actions workflow.
    GitHub(GitHubOptions),
    /// Git plus a GitLab CI pipeline.
    GitLab(GitLabOptions),
}

impl PlatformVariant {
    pub fn label(&self) -> &'static str {
        match self {
            PlatformVariant::None => "none",
            PlatformVariant::Git(_) => "git",
            PlatformVariant::GitHub(_) => "github",
            PlatformVariant::GitLab(_) => "gitlab",
        }
    }

    /// Git-level options, present for every git-based variant.
    pub fn git_options(&self) -> Option<&GitOptions> {
        match self {
            PlatformVariant::None => None,
            PlatformVariant::Git(git) => Some(git),
            PlatformVariant::GitHub(options) => Some(&options.git),
            PlatformVariant::GitLab(options) => Some(&options.git),
        }
    }

    pub fn is_github(&self) -> bool {
        matches!(self, PlatformVariant::GitHub(_))
    }

    pub fn is_gitlab(&self) -> bool {
        matches!(self, PlatformVariant::GitLab(_))
    }
}

/// Attach the variant's fixed component bundle to a freshly constructed
/// repository. Runs once, from `Repository::new`.
pub(crate) fn compose(repo: &Repository) -> DomainResult<()> {
    let variant = repo.variant();
    if let Some(git) = variant.git_options() {
        let mut ignore = IgnoreFile::new();
        ignore.add_patterns(git.ignore_patterns.iter().cloned());
        repo.add_component(ignore)?;
    }
    match &variant {
        PlatformVariant::GitHub(options) => {
            repo.add_component(GithubWorkflow::new(options.workflow_name.as_str()))?;
        }
        PlatformVariant::GitLab(options) => {
            repo.add_component(GitlabCi::new(options.stages.clone()))?;
        }
        PlatformVariant::None | PlatformVariant::Git(_) => {}
    }
    Ok(())
}
