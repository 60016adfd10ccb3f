//! Three-phase synthesis orchestration.
//!
//! Execution is single-threaded and synchronous: each phase is a full
//! sequential traversal of the tree and a hard barrier — every node's
//! hook for a phase completes before any node begins the next phase.
//! Later phases depend on side effects of earlier ones across unrelated
//! subtrees, so there is no parallelism to exploit here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error::{SynthResult, SynthesisError};
use crate::domain::component::{resolve_target, ComponentCell, Phase, SynthContext};
use crate::domain::node::Construct;
use crate::domain::repository::Repository;
use crate::infrastructure::traits::FileSystem;
use crate::util::path::workspace_display;

/// Snapshot of one node taken at freeze time: the traversal plan stays
/// valid for the whole run because the tree cannot change under it.
struct NodePlan {
    node_path: String,
    node_dir: PathBuf,
    components: Vec<ComponentCell>,
}

/// Drives the `pre-synthesize` / `synthesize` / `post-synthesize`
/// lifecycle over a whole tree, exactly once.
pub struct Synthesizer {
    fs: Arc<dyn FileSystem>,
    out_root: PathBuf,
}

impl Synthesizer {
    pub fn new(fs: Arc<dyn FileSystem>, out_root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            out_root: out_root.into(),
        }
    }

    /// Freeze the tree, reject re-synthesis, check declared outputs for
    /// collisions, then run the three phases. The first hook failure
    /// aborts the current and all remaining phases; output already
    /// written stays on disk (no rollback).
    #[instrument(skip(self, repo), fields(root = %repo.path()))]
    pub fn run(&self, repo: &Repository) -> SynthResult<()> {
        let nref = repo.node_ref();

        let (pre_plan, post_plan, projects) = {
            let mut core = nref.core.borrow_mut();
            let root = core
                .root()
                .expect("a tree always has a root");
            if core.frozen() {
                return Err(SynthesisError::AlreadySynthesized {
                    root: core.path_of(root),
                });
            }
            core.freeze();

            let core = &*core;
            let snapshot = |indices: Vec<generational_arena::Index>| -> Vec<NodePlan> {
                indices
                    .into_iter()
                    .map(|idx| {
                        let node = core.node(idx);
                        NodePlan {
                            node_path: core.path_of(idx),
                            node_dir: node.outdir.clone(),
                            components: node.components.clone(),
                        }
                    })
                    .collect()
            };
            let pre = snapshot(core.iter().map(|(idx, _)| idx).collect());
            let post = snapshot(core.iter_postorder().map(|(idx, _)| idx).collect());
            let projects: Vec<String> = core
                .projects_under(root)
                .into_iter()
                .map(|idx| core.path_of(idx))
                .collect();
            (pre, post, projects)
        };

        let mut registry = self.check_declared_outputs(&pre_plan)?;

        self.run_phase(Phase::PreSynthesize, &pre_plan, &mut registry, &projects)?;
        self.run_phase(Phase::Synthesize, &pre_plan, &mut registry, &projects)?;
        self.run_phase(Phase::PostSynthesize, &post_plan, &mut registry, &projects)?;
        Ok(())
    }

    /// Eager collision detection over statically declared output paths.
    /// Fails before any hook runs, so nothing is written on collision.
    /// The returned registry seeds the write-time ownership checks.
    fn check_declared_outputs(
        &self,
        plan: &[NodePlan],
    ) -> SynthResult<BTreeMap<PathBuf, String>> {
        let mut registry: BTreeMap<PathBuf, String> = BTreeMap::new();
        for node in plan {
            for component in &node.components {
                for declared in component.borrow().outputs() {
                    let target = resolve_target(&self.out_root, &node.node_dir, &declared);
                    match registry.get(&target) {
                        Some(owner) if owner != &node.node_path => {
                            return Err(SynthesisError::OutputCollision {
                                path: workspace_display(&self.out_root, &target),
                                first: owner.clone(),
                                second: node.node_path.clone(),
                            });
                        }
                        _ => {
                            registry.insert(target, node.node_path.clone());
                        }
                    }
                }
            }
        }
        Ok(registry)
    }

    fn run_phase(
        &self,
        phase: Phase,
        plan: &[NodePlan],
        registry: &mut BTreeMap<PathBuf, String>,
        projects: &[String],
    ) -> SynthResult<()> {
        debug!(%phase, nodes = plan.len(), "running phase");
        for node in plan {
            for component in &node.components {
                let mut ctx = SynthContext::new(
                    self.fs.as_ref(),
                    &self.out_root,
                    &node.node_dir,
                    &node.node_path,
                    phase,
                    registry,
                    projects,
                );
                let result = {
                    let mut component = component.borrow_mut();
                    match phase {
                        Phase::PreSynthesize => component.pre_synthesize(&mut ctx),
                        Phase::Synthesize => component.synthesize(&mut ctx),
                        Phase::PostSynthesize => component.post_synthesize(&mut ctx),
                    }
                };
                result.map_err(|source| SynthesisError::Hook {
                    node: node.node_path.clone(),
                    phase,
                    source,
                })?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("out_root", &self.out_root)
            .finish()
    }
}
