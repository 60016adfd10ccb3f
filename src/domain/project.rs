//! Project: a buildable unit attached under a repository.
//!
//! Historically units were constructed standalone, before the repository
//! concept existed above them. That call pattern still works: a unit
//! built without a parent gets a default repository spliced in above it
//! at construction time (auto-wrap), before anything else touches the
//! node, so downstream code always sees a fully attached unit.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::debug;

use crate::domain::component::Component;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Construct, NodeRef};
use crate::domain::repository::{Repository, RepositoryOptions};
use crate::domain::tree::{validate_id, NodeKind};

/// Options for [`Project::new`].
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    /// Node to attach under: a repository, or another project for
    /// nested units. `None` relies on auto-wrap.
    pub parent: Option<NodeRef>,
    /// Directory the unit's components write under, relative to the
    /// parent's directory. Defaults to the unit id. An absolute path
    /// escapes the workspace output root entirely.
    pub outdir: Option<PathBuf>,
    /// Splice in a default repository when no parent is given. On by
    /// default; with this off a parentless unit fails construction.
    pub auto_wrap: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            parent: None,
            outdir: None,
            auto_wrap: true,
        }
    }
}

/// Handle to a unit node. Cloning is cheap; clones compare equal exactly
/// when they refer to the same node of the same tree.
#[derive(Clone, PartialEq, Eq)]
pub struct Project {
    node: NodeRef,
}

impl Project {
    /// Construct a unit and attach it. With no parent and auto-wrap
    /// enabled, a default repository is created first and the unit is
    /// attached under it instead of being left parentless.
    pub fn new(id: impl Into<String>, options: ProjectOptions) -> DomainResult<Project> {
        let id = id.into();
        validate_id(&id)?;

        let parent = match options.parent {
            Some(parent) => parent,
            None if options.auto_wrap => {
                debug!(unit = %id, "no repository ancestor, wrapping in a default one");
                Repository::new(RepositoryOptions::default())?.node_ref()
            }
            None => return Err(DomainError::NoRepository { node: id }),
        };

        let outdir = {
            let core = parent.core.borrow();
            let parent_dir = core.node(parent.index).outdir.clone();
            parent_dir.join(options.outdir.unwrap_or_else(|| PathBuf::from(&id)))
        };

        let index = parent
            .core
            .borrow_mut()
            .insert_child(parent.index, id, NodeKind::Project, outdir)?;
        Ok(Project {
            node: NodeRef::new(parent.core, index),
        })
    }

    pub(crate) fn from_node(node: NodeRef) -> Self {
        Self { node }
    }

    pub fn id(&self) -> String {
        self.node.id()
    }

    pub fn path(&self) -> String {
        self.node.path()
    }

    /// Attach a component to this unit.
    pub fn add_component<C: Component + 'static>(&self, component: C) -> DomainResult<Rc<RefCell<C>>> {
        self.node.add_component(component)
    }
}

impl Construct for Project {
    fn node_ref(&self) -> NodeRef {
        self.node.clone()
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Project({})", self.path())
    }
}
