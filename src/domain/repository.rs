//! Repository: the tree root representing the whole workspace.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error::SynthResult;
use crate::application::synthesizer::Synthesizer;
use crate::domain::component::Component;
use crate::domain::error::DomainResult;
use crate::domain::node::{Construct, NodeRef};
use crate::domain::project::{Project, ProjectOptions};
use crate::domain::tree::{validate_id, NodeKind, TreeCore};
use crate::domain::variant::{self, PlatformVariant};
use crate::infrastructure::traits::RealFileSystem;

/// Options for [`Repository::new`].
#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    /// Root node id, also the first segment of every node path.
    pub id: String,
    /// Platform specialization, fixed for the repository's lifetime.
    pub variant: PlatformVariant,
    /// Workspace-relative directory repository-level components write
    /// under. Usually empty (the workspace root itself).
    pub outdir: PathBuf,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            id: "workspace".to_string(),
            variant: PlatformVariant::GitHub(Default::default()),
            outdir: PathBuf::new(),
        }
    }
}

/// Root handle of a construct tree. Cloning is cheap and clones compare
/// equal exactly when they refer to the same node of the same tree.
#[derive(Clone, PartialEq, Eq)]
pub struct Repository {
    node: NodeRef,
}

impl Repository {
    /// Create a new tree with this repository as its root and compose
    /// the variant's fixed component bundle onto it.
    #[instrument(skip(options), fields(id = %options.id, variant = options.variant.label()))]
    pub fn new(options: RepositoryOptions) -> DomainResult<Repository> {
        validate_id(&options.id)?;
        let core = Rc::new(RefCell::new(TreeCore::new()));
        let index = core
            .borrow_mut()
            .insert_root(options.id, options.variant, options.outdir);
        let repo = Repository {
            node: NodeRef::new(core, index),
        };
        variant::compose(&repo)?;
        Ok(repo)
    }

    /// Nearest repository ancestor of `node` (a repository resolves to
    /// itself). The result is memoized on the queried node, so a second
    /// call returns the identical repository without re-walking.
    pub fn of(node: &impl Construct) -> DomainResult<Repository> {
        let nref = node.node_ref();
        let index = nref.core.borrow().resolve_repository(nref.index)?;
        Ok(Repository {
            node: NodeRef::new(nref.core, index),
        })
    }

    pub fn id(&self) -> String {
        self.node.id()
    }

    pub fn path(&self) -> String {
        self.node.path()
    }

    /// The platform variant composed onto this repository.
    pub fn variant(&self) -> PlatformVariant {
        match &self.node.core.borrow().node(self.node.index).kind {
            NodeKind::Repository(variant) => variant.clone(),
            // the handle is only ever built over a repository node
            NodeKind::Project => unreachable!("repository handle over a project node"),
        }
    }

    /// Ordered descendant projects, not crossing a nested repository.
    pub fn projects(&self) -> Vec<Project> {
        let indices = self.node.core.borrow().projects_under(self.node.index);
        indices
            .into_iter()
            .map(|index| Project::from_node(NodeRef::new(Rc::clone(&self.node.core), index)))
            .collect()
    }

    /// Attach a project directly under this repository.
    pub fn project(&self, id: impl Into<String>) -> DomainResult<Project> {
        self.project_with(id, ProjectOptions::default())
    }

    /// Attach a project under this repository with explicit options.
    pub fn project_with(
        &self,
        id: impl Into<String>,
        mut options: ProjectOptions,
    ) -> DomainResult<Project> {
        options.parent = Some(self.node_ref());
        Project::new(id, options)
    }

    /// Attach a repository-level component.
    pub fn add_component<C: Component + 'static>(&self, component: C) -> DomainResult<Rc<RefCell<C>>> {
        self.node.add_component(component)
    }

    /// Run the full three-phase synthesis lifecycle against the real
    /// filesystem, writing under `out_root`. Freezes the tree; a second
    /// run on the same tree is rejected.
    pub fn synth(&self, out_root: impl AsRef<Path>) -> SynthResult<()> {
        debug!(root = %self.path(), "synth");
        Synthesizer::new(Arc::new(RealFileSystem), out_root.as_ref()).run(self)
    }
}

impl Construct for Repository {
    fn node_ref(&self) -> NodeRef {
        self.node.clone()
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Repository({})", self.path())
    }
}
