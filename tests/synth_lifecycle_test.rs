//! Tests for the three-phase lifecycle: ordering, barriers, abort-on-failure

use std::cell::RefCell;
use std::rc::Rc;

use rsproj::util::testing;
use rsproj::{
    Component, HookResult, Phase, PlatformVariant, Repository, RepositoryOptions, SynthContext,
    SynthesisError,
};
use tempfile::TempDir;

type Log = Rc<RefCell<Vec<String>>>;

/// Appends `<phase>:<tag>` to a shared log on every hook; optionally
/// fails in one phase.
struct Recorder {
    log: Log,
    tag: &'static str,
    fail_on: Option<Phase>,
}

impl Recorder {
    fn new(log: &Log, tag: &'static str) -> Self {
        Self {
            log: Rc::clone(log),
            tag,
            fail_on: None,
        }
    }

    fn failing(log: &Log, tag: &'static str, phase: Phase) -> Self {
        Self {
            log: Rc::clone(log),
            tag,
            fail_on: Some(phase),
        }
    }

    fn record(&self, phase: Phase) -> HookResult {
        self.log.borrow_mut().push(format!("{}:{}", phase, self.tag));
        if self.fail_on == Some(phase) {
            return Err(format!("{} deliberately failed", self.tag).into());
        }
        Ok(())
    }
}

impl Component for Recorder {
    fn pre_synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> HookResult {
        self.record(Phase::PreSynthesize)
    }

    fn synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> HookResult {
        self.record(Phase::Synthesize)
    }

    fn post_synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> HookResult {
        self.record(Phase::PostSynthesize)
    }
}

fn bare_repo(id: &str) -> Repository {
    Repository::new(RepositoryOptions {
        id: id.to_string(),
        variant: PlatformVariant::None,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn given_repository_with_two_units_when_synthesizing_then_phase_order_holds() {
    testing::init_test_setup();
    // Arrange
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let repo = bare_repo("ws");
    let p1 = repo.project("p1").unwrap();
    let p2 = repo.project("p2").unwrap();
    repo.add_component(Recorder::new(&log, "R")).unwrap();
    p1.add_component(Recorder::new(&log, "P1")).unwrap();
    p2.add_component(Recorder::new(&log, "P2")).unwrap();

    // Act
    let out = TempDir::new().unwrap();
    repo.synth(out.path()).unwrap();

    // Assert: repository first in pre, units in attachment order; the
    // post phase bubbles up, repository last. Each phase is a barrier.
    let entries = log.borrow();
    assert_eq!(
        *entries,
        vec![
            "pre-synthesize:R",
            "pre-synthesize:P1",
            "pre-synthesize:P2",
            "synthesize:R",
            "synthesize:P1",
            "synthesize:P2",
            "post-synthesize:P1",
            "post-synthesize:P2",
            "post-synthesize:R",
        ]
    );
}

#[test]
fn given_failing_synthesize_hook_when_synthesizing_then_no_post_hook_runs() {
    testing::init_test_setup();
    // Arrange
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let repo = bare_repo("ws");
    let p1 = repo.project("p1").unwrap();
    let p2 = repo.project("p2").unwrap();
    p1.add_component(Recorder::failing(&log, "P1", Phase::Synthesize))
        .unwrap();
    p2.add_component(Recorder::new(&log, "P2")).unwrap();

    // Act
    let out = TempDir::new().unwrap();
    let err = repo.synth(out.path()).unwrap_err();

    // Assert: the error names the failing node and the phase
    match &err {
        SynthesisError::Hook { node, phase, .. } => {
            assert_eq!(node, "ws/p1");
            assert_eq!(*phase, Phase::Synthesize);
        }
        other => panic!("expected hook error, got {other:?}"),
    }
    assert!(err.to_string().contains("synthesize"));
    assert!(err.to_string().contains("ws/p1"));

    // Assert: nothing after the failure ran — no later sibling in the
    // same phase, no post phase anywhere
    let entries = log.borrow();
    assert!(entries.iter().all(|e| !e.starts_with("post-synthesize")));
    assert!(!entries.contains(&"synthesize:P2".to_string()));
    // the barrier still completed the pre phase for everyone
    assert!(entries.contains(&"pre-synthesize:P2".to_string()));
}

#[test]
fn given_failing_pre_hook_when_synthesizing_then_no_synthesize_hook_runs() {
    testing::init_test_setup();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let repo = bare_repo("ws");
    let p1 = repo.project("p1").unwrap();
    p1.add_component(Recorder::failing(&log, "P1", Phase::PreSynthesize))
        .unwrap();

    let out = TempDir::new().unwrap();
    let err = repo.synth(out.path()).unwrap_err();

    assert!(err.to_string().contains("pre-synthesize"));
    let entries = log.borrow();
    assert_eq!(*entries, vec!["pre-synthesize:P1"]);
}

#[test]
fn given_nested_units_when_synthesizing_then_deepest_post_runs_first() {
    testing::init_test_setup();
    use rsproj::{Construct, Project, ProjectOptions};

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let repo = bare_repo("ws");
    let outer = repo.project("outer").unwrap();
    let inner = Project::new(
        "inner",
        ProjectOptions {
            parent: Some(outer.node_ref()),
            ..Default::default()
        },
    )
    .unwrap();
    repo.add_component(Recorder::new(&log, "R")).unwrap();
    outer.add_component(Recorder::new(&log, "outer")).unwrap();
    inner.add_component(Recorder::new(&log, "inner")).unwrap();

    let out = TempDir::new().unwrap();
    repo.synth(out.path()).unwrap();

    let entries = log.borrow();
    let post: Vec<&String> = entries
        .iter()
        .filter(|e| e.starts_with("post-synthesize"))
        .collect();
    assert_eq!(
        post,
        vec!["post-synthesize:inner", "post-synthesize:outer", "post-synthesize:R"]
    );
}
