//! Tests for backward-compatible auto-wrapping of parentless units

use rsproj::util::testing;
use rsproj::{
    DomainError, PlatformVariant, Project, ProjectOptions, Repository, RepositoryOptions,
};

#[test]
fn given_parentless_unit_when_constructing_then_default_repository_is_spliced_in() {
    testing::init_test_setup();
    // Act
    let solo = Project::new("solo", ProjectOptions::default()).unwrap();

    // Assert: exactly one implicit ancestor, and resolution finds it
    let repo = Repository::of(&solo).unwrap();
    assert_eq!(solo.path(), "workspace/solo");
    assert_eq!(repo.id(), "workspace");
    assert!(repo.variant().is_github());
}

#[test]
fn given_parentless_unit_when_resolving_then_unit_is_the_only_project() {
    testing::init_test_setup();
    // Arrange
    let solo = Project::new("solo", ProjectOptions::default()).unwrap();

    // Act
    let repo = Repository::of(&solo).unwrap();
    let projects = repo.projects();

    // Assert
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0], solo);
}

#[test]
fn given_explicit_repository_when_constructing_units_then_no_auto_wrap_happens() {
    testing::init_test_setup();
    // Arrange
    let repo = Repository::new(RepositoryOptions {
        id: "ws".to_string(),
        variant: PlatformVariant::None,
        ..Default::default()
    })
    .unwrap();

    // Act
    let api = repo.project("api").unwrap();
    let web = repo.project("web").unwrap();

    // Assert: exactly the explicitly attached units, no implicit
    // repository anywhere in either chain
    let projects = repo.projects();
    assert_eq!(projects, vec![api.clone(), web.clone()]);
    assert_eq!(api.path(), "ws/api");
    assert_eq!(web.path(), "ws/web");
    assert_eq!(Repository::of(&api).unwrap(), repo);
    assert_eq!(Repository::of(&web).unwrap(), repo);
}

#[test]
fn given_auto_wrap_disabled_when_constructing_parentless_unit_then_lookup_fails() {
    testing::init_test_setup();
    // Act
    let result = Project::new(
        "solo",
        ProjectOptions {
            auto_wrap: false,
            ..Default::default()
        },
    );

    // Assert: the error names the orphan
    let err = result.unwrap_err();
    assert!(matches!(err, DomainError::NoRepository { .. }));
    assert!(err.to_string().contains("solo"));
}

#[test]
fn given_wrapped_unit_when_synthesizing_then_implicit_repository_behaves_like_explicit() {
    testing::init_test_setup();
    // The auto-created repository carries the default variant bundle,
    // indistinguishable from one created directly.
    let solo = Project::new("solo", ProjectOptions::default()).unwrap();
    let repo = Repository::of(&solo).unwrap();

    let out = tempfile::TempDir::new().unwrap();
    repo.synth(out.path()).unwrap();

    assert!(out.path().join(".gitignore").is_file());
    assert!(out.path().join(".github/workflows/build.yml").is_file());
}
