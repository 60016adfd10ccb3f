//! Arena-based construct tree core.
//!
//! Every `Repository` and `Project` handle shares one `TreeCore` behind
//! `Rc<RefCell<..>>`; nodes are stored in a generational arena and refer
//! to each other by `Index`. The tree is append-only: nodes attach exactly
//! once at construction and are never removed or reparented. Once
//! synthesis starts the core is frozen and every further attach fails.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::OnceLock;

use generational_arena::{Arena, Index};
use regex::Regex;

use crate::domain::component::ComponentCell;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::variant::PlatformVariant;

/// Shared handle to a tree core.
pub(crate) type SharedTree = Rc<RefCell<TreeCore>>;

/// What a node in the construct tree represents.
#[derive(Clone)]
pub(crate) enum NodeKind {
    /// Workspace root (or a nested sub-workspace boundary).
    Repository(PlatformVariant),
    /// Buildable unit.
    Project,
}

/// Tree node: identity, parent link, ordered children, attached behavior.
pub(crate) struct ConstructNode {
    /// Unique among siblings, not globally
    pub id: String,
    pub parent: Option<Index>,
    /// Insertion order is lifecycle order
    pub children: Vec<Index>,
    pub kind: NodeKind,
    /// Workspace-relative directory this node's components write under
    pub outdir: PathBuf,
    /// Ordered component list, drained never, executed per phase
    pub components: Vec<ComponentCell>,
    /// Memoized nearest-repository slot. Populated lazily by ancestor
    /// resolution on the queried node only; valid for the whole tree
    /// lifetime because the tree is immutable after construction.
    pub repo_cache: Cell<Option<Index>>,
}

impl ConstructNode {
    pub fn is_repository(&self) -> bool {
        matches!(self.kind, NodeKind::Repository(_))
    }

    pub fn is_project(&self) -> bool {
        matches!(self.kind, NodeKind::Project)
    }
}

/// Arena storage plus the root index and the freeze flag.
pub(crate) struct TreeCore {
    arena: Arena<ConstructNode>,
    root: Option<Index>,
    frozen: bool,
}

impl TreeCore {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            frozen: false,
        }
    }

    /// Insert the root node. Called exactly once per tree, by
    /// `Repository::new`.
    pub fn insert_root(&mut self, id: String, variant: PlatformVariant, outdir: PathBuf) -> Index {
        debug_assert!(self.root.is_none(), "tree already has a root");
        let node = ConstructNode {
            id,
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Repository(variant),
            outdir,
            components: Vec::new(),
            repo_cache: Cell::new(None),
        };
        let idx = self.arena.insert(node);
        self.root = Some(idx);
        idx
    }

    /// Attach a new child node under `parent`. Enforces the freeze flag
    /// and sibling-unique ids.
    pub fn insert_child(
        &mut self,
        parent: Index,
        id: String,
        kind: NodeKind,
        outdir: PathBuf,
    ) -> DomainResult<Index> {
        if self.frozen {
            return Err(DomainError::TreeFrozen {
                node: format!("{}/{}", self.path_of(parent), id),
            });
        }
        let siblings = &self.node(parent).children;
        if siblings
            .iter()
            .any(|&c| self.node(c).id == id)
        {
            return Err(DomainError::DuplicateChildId {
                parent: self.path_of(parent),
                id,
            });
        }
        let node = ConstructNode {
            id,
            parent: Some(parent),
            children: Vec::new(),
            kind,
            outdir,
            components: Vec::new(),
            repo_cache: Cell::new(None),
        };
        let idx = self.arena.insert(node);
        self.arena[parent].children.push(idx);
        Ok(idx)
    }

    pub fn attach_component(&mut self, idx: Index, component: ComponentCell) -> DomainResult<()> {
        if self.frozen {
            return Err(DomainError::TreeFrozen {
                node: self.path_of(idx),
            });
        }
        self.arena[idx].components.push(component);
        Ok(())
    }

    pub fn node(&self, idx: Index) -> &ConstructNode {
        &self.arena[idx]
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Slash-joined id chain from the root, e.g. `workspace/api`.
    pub fn path_of(&self, idx: Index) -> String {
        let mut segments = Vec::new();
        let mut cur = Some(idx);
        while let Some(i) = cur {
            let node = self.node(i);
            segments.push(node.id.clone());
            cur = node.parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Nearest repository ancestor of `idx` (the node itself counts),
    /// memoized on the queried node. Lazy parent-pointer walk, O(depth)
    /// on the first call, O(1) afterwards.
    pub fn resolve_repository(&self, idx: Index) -> DomainResult<Index> {
        if let Some(hit) = self.node(idx).repo_cache.get() {
            return Ok(hit);
        }
        let mut cur = Some(idx);
        while let Some(i) = cur {
            let node = self.node(i);
            if node.is_repository() {
                // Cache on the queried node, not on intermediate ancestors.
                self.node(idx).repo_cache.set(Some(i));
                return Ok(i);
            }
            cur = node.parent;
        }
        Err(DomainError::NoRepository {
            node: self.path_of(idx),
        })
    }

    /// Ordered descendant projects of `start`, depth-first, not crossing
    /// a nested repository boundary.
    pub fn projects_under(&self, start: Index) -> Vec<Index> {
        let mut found = Vec::new();
        let mut stack: Vec<Index> = self.node(start).children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            let node = self.node(idx);
            if node.is_repository() {
                continue;
            }
            if node.is_project() {
                found.push(idx);
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        found
    }

    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }
}

/// Lazy preorder traversal: parent before children, children in
/// insertion order. Finite and non-restartable; no node appears twice.
pub(crate) struct PreOrderIter<'a> {
    core: &'a TreeCore,
    stack: Vec<Index>,
}

impl<'a> PreOrderIter<'a> {
    fn new(core: &'a TreeCore) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = core.root() {
            stack.push(root);
        }
        Self { core, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (Index, &'a ConstructNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = self.core.node(idx);
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((idx, node))
    }
}

/// Lazy postorder traversal: children (in insertion order) before their
/// parent, so the deepest subtrees surface first and the root comes last.
pub(crate) struct PostOrderIter<'a> {
    core: &'a TreeCore,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIter<'a> {
    fn new(core: &'a TreeCore) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = core.root() {
            stack.push((root, false));
        }
        Self { core, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = (Index, &'a ConstructNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, visited)) = self.stack.pop() {
            let node = self.core.node(idx);
            if visited {
                return Some((idx, node));
            }
            self.stack.push((idx, true));
            for &child in node.children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Validate a node id: sibling-unique ids must also be usable as path
/// segments, so the charset is restricted up front.
pub(crate) fn validate_id(id: &str) -> DomainResult<()> {
    static ID_RE: OnceLock<Regex> = OnceLock::new();
    let re = ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());
    if re.is_match(id) {
        Ok(())
    } else {
        Err(DomainError::InvalidId {
            id: id.to_string(),
            reason: "must start alphanumeric and contain only [A-Za-z0-9._-]".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_core() -> (TreeCore, Index, Index, Index) {
        let mut core = TreeCore::new();
        let root = core.insert_root(
            "ws".to_string(),
            PlatformVariant::None,
            PathBuf::new(),
        );
        let a = core
            .insert_child(root, "a".to_string(), NodeKind::Project, PathBuf::from("a"))
            .unwrap();
        let b = core
            .insert_child(root, "b".to_string(), NodeKind::Project, PathBuf::from("b"))
            .unwrap();
        (core, root, a, b)
    }

    #[test]
    fn preorder_visits_parent_before_children_in_insertion_order() {
        let (core, root, a, b) = sample_core();
        let order: Vec<Index> = core.iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec![root, a, b]);
    }

    #[test]
    fn postorder_visits_children_before_parent() {
        let (core, root, a, b) = sample_core();
        let order: Vec<Index> = core.iter_postorder().map(|(i, _)| i).collect();
        assert_eq!(order, vec![a, b, root]);
    }

    #[test]
    fn resolve_repository_caches_on_queried_node_only() {
        let (core, root, a, _) = sample_core();
        let found = core.resolve_repository(a).unwrap();
        assert_eq!(found, root);
        assert_eq!(core.node(a).repo_cache.get(), Some(root));
        // ancestors keep an empty slot, only the queried node memoizes
        assert_eq!(core.node(root).repo_cache.get(), None);
    }

    #[test]
    fn resolve_repository_errors_without_repository_ancestor() {
        // Build a core whose root is not a repository: only reachable
        // through the crate-private API, the public surface auto-wraps.
        let mut core = TreeCore::new();
        let lone = core.arena.insert(ConstructNode {
            id: "orphan".to_string(),
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Project,
            outdir: PathBuf::new(),
            components: Vec::new(),
            repo_cache: Cell::new(None),
        });
        let err = core.resolve_repository(lone).unwrap_err();
        assert!(matches!(err, DomainError::NoRepository { .. }));
        assert!(err.to_string().contains("orphan"));
    }

    #[test]
    fn duplicate_sibling_id_is_rejected() {
        let (mut core, root, _, _) = sample_core();
        let err = core
            .insert_child(root, "a".to_string(), NodeKind::Project, PathBuf::from("a"))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateChildId { .. }));
    }

    #[test]
    fn same_id_under_different_parents_is_fine() {
        let (mut core, _, a, b) = sample_core();
        core.insert_child(a, "x".to_string(), NodeKind::Project, PathBuf::from("a/x"))
            .unwrap();
        core.insert_child(b, "x".to_string(), NodeKind::Project, PathBuf::from("b/x"))
            .unwrap();
    }

    #[test]
    fn frozen_core_rejects_attach() {
        let (mut core, root, _, _) = sample_core();
        core.freeze();
        let err = core
            .insert_child(root, "late".to_string(), NodeKind::Project, PathBuf::from("late"))
            .unwrap_err();
        assert!(matches!(err, DomainError::TreeFrozen { .. }));
    }

    #[test]
    fn projects_under_stops_at_nested_repository() {
        let (mut core, root, a, _) = sample_core();
        let nested = core
            .insert_child(
                root,
                "sub".to_string(),
                NodeKind::Repository(PlatformVariant::None),
                PathBuf::from("sub"),
            )
            .unwrap();
        core.insert_child(nested, "hidden".to_string(), NodeKind::Project, PathBuf::from("sub/hidden"))
            .unwrap();
        let under_a = core
            .insert_child(a, "inner".to_string(), NodeKind::Project, PathBuf::from("a/inner"))
            .unwrap();

        let projects = core.projects_under(root);
        assert_eq!(projects.len(), 3);
        assert!(projects.contains(&a));
        assert!(projects.contains(&under_a));
        assert!(!projects.iter().any(|&i| core.node(i).id == "hidden"));
    }

    #[test]
    fn id_validation() {
        assert!(validate_id("api").is_ok());
        assert!(validate_id("api-v2.1_x").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("a/b").is_err());
        assert!(validate_id(".hidden").is_err());
    }
}
