//! Tests for platform-variant bundle composition

use rstest::rstest;
use tempfile::TempDir;

use rsproj::util::testing;
use rsproj::{
    GitHubOptions, GitLabOptions, GitOptions, PlatformVariant, Repository, RepositoryOptions,
};

fn repo_with(variant: PlatformVariant) -> Repository {
    Repository::new(RepositoryOptions {
        id: "ws".to_string(),
        variant,
        ..Default::default()
    })
    .unwrap()
}

#[rstest]
#[case::none(PlatformVariant::None, false, false, false)]
#[case::git(PlatformVariant::Git(GitOptions::default()), true, false, false)]
#[case::github(PlatformVariant::GitHub(GitHubOptions::default()), true, true, false)]
#[case::gitlab(PlatformVariant::GitLab(GitLabOptions::default()), true, false, true)]
fn given_variant_when_synthesizing_then_fixed_bundle_is_written(
    #[case] variant: PlatformVariant,
    #[case] ignore_file: bool,
    #[case] github_ci: bool,
    #[case] gitlab_ci: bool,
) {
    testing::init_test_setup();
    // Arrange
    let repo = repo_with(variant);

    // Act
    let out = TempDir::new().unwrap();
    repo.synth(out.path()).unwrap();

    // Assert
    assert_eq!(out.path().join(".gitignore").is_file(), ignore_file);
    assert_eq!(
        out.path().join(".github/workflows/build.yml").is_file(),
        github_ci
    );
    assert_eq!(out.path().join(".gitlab-ci.yml").is_file(), gitlab_ci);
}

#[test]
fn given_git_variant_when_synthesizing_then_ignore_file_has_seed_patterns() {
    testing::init_test_setup();
    let repo = repo_with(PlatformVariant::Git(GitOptions {
        ignore_patterns: vec!["target/".to_string(), "*.tmp".to_string()],
    }));

    let out = TempDir::new().unwrap();
    repo.synth(out.path()).unwrap();

    let content = std::fs::read_to_string(out.path().join(".gitignore")).unwrap();
    assert!(content.contains("target/"));
    assert!(content.contains("*.tmp"));
    assert!(content.contains("# rsproj-managed start"));
    assert!(content.contains("# rsproj-managed end"));
}

#[test]
fn given_existing_ignore_file_when_synthesizing_then_foreign_lines_survive() {
    testing::init_test_setup();
    // Arrange: a hand-maintained ignore file already in place
    let out = TempDir::new().unwrap();
    std::fs::write(out.path().join(".gitignore"), "node_modules/\n").unwrap();

    let repo = repo_with(PlatformVariant::Git(GitOptions::default()));

    // Act
    repo.synth(out.path()).unwrap();

    // Assert
    let content = std::fs::read_to_string(out.path().join(".gitignore")).unwrap();
    assert!(content.contains("node_modules/"));
    assert!(content.contains(".DS_Store"));
}

#[test]
fn given_gitlab_variant_when_synthesizing_then_pipeline_lists_stages() {
    testing::init_test_setup();
    let repo = repo_with(PlatformVariant::GitLab(GitLabOptions {
        git: GitOptions::default(),
        stages: vec!["build".to_string(), "deploy".to_string()],
    }));

    let out = TempDir::new().unwrap();
    repo.synth(out.path()).unwrap();

    let content = std::fs::read_to_string(out.path().join(".gitlab-ci.yml")).unwrap();
    assert!(content.contains("stages:"));
    assert!(content.contains("- build"));
    assert!(content.contains("- deploy"));
}

#[test]
fn given_github_variant_when_asking_capabilities_then_checks_are_explicit() {
    testing::init_test_setup();
    // Dispatch is a closed set: callers check the concrete variant.
    let variant = PlatformVariant::GitHub(GitHubOptions::default());
    assert!(variant.is_github());
    assert!(!variant.is_gitlab());
    assert!(variant.git_options().is_some());
    assert_eq!(variant.label(), "github");

    assert!(PlatformVariant::None.git_options().is_none());
}
