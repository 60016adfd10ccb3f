//! Node handles: cheap clonable references into a shared tree core.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use generational_arena::Index;

use crate::domain::component::Component;
use crate::domain::error::DomainResult;
use crate::domain::tree::SharedTree;

/// Reference to one node of a construct tree. Equality is identity: same
/// shared core, same arena index.
#[derive(Clone)]
pub struct NodeRef {
    pub(crate) core: SharedTree,
    pub(crate) index: Index,
}

impl NodeRef {
    pub(crate) fn new(core: SharedTree, index: Index) -> Self {
        Self { core, index }
    }

    /// Node id, unique among siblings.
    pub fn id(&self) -> String {
        self.core.borrow().node(self.index).id.clone()
    }

    /// Slash-joined id chain from the root, e.g. `workspace/api`.
    pub fn path(&self) -> String {
        self.core.borrow().path_of(self.index)
    }

    pub fn is_repository(&self) -> bool {
        self.core.borrow().node(self.index).is_repository()
    }

    pub fn is_project(&self) -> bool {
        self.core.borrow().node(self.index).is_project()
    }

    /// Child nodes in attachment order.
    pub fn children(&self) -> Vec<NodeRef> {
        self.core
            .borrow()
            .node(self.index)
            .children
            .iter()
            .map(|&child| NodeRef::new(Rc::clone(&self.core), child))
            .collect()
    }

    /// Attach a component to this node. Returns a shared handle so the
    /// caller can keep configuring the component after attachment.
    /// Rejected once the tree is frozen.
    pub fn add_component<C: Component + 'static>(&self, component: C) -> DomainResult<Rc<RefCell<C>>> {
        let cell = Rc::new(RefCell::new(component));
        let erased: Rc<RefCell<dyn Component>> = cell.clone();
        self.core
            .borrow_mut()
            .attach_component(self.index, erased)?;
        Ok(cell)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core) && self.index == other.index
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({})", self.path())
    }
}

/// Anything that is (or wraps) a node of a construct tree.
pub trait Construct {
    fn node_ref(&self) -> NodeRef;
}

impl Construct for NodeRef {
    fn node_ref(&self) -> NodeRef {
        self.clone()
    }
}
