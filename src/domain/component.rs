//! Component lifecycle contract and the synthesis context.
//!
//! A component is an attachable behavior unit with no identity beyond its
//! owning node. It implements zero or more lifecycle hooks; each hook is a
//! side-effecting operation that may read the tree (through handles it
//! retained at construction) but never mutates structure — the freeze flag
//! rejects any attach once synthesis has started.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::trace;

use crate::infrastructure::traits::FileSystem;
use crate::util::path::{normalize_lexical, workspace_display};

/// Boxed error returned by component hooks; the orchestrator wraps it
/// with the failing node's path and the phase.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for lifecycle hooks.
pub type HookResult = Result<(), HookError>;

/// Shared, interior-mutable component slot as stored on a node.
pub(crate) type ComponentCell = Rc<RefCell<dyn Component>>;

/// The three synthesis phases, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreSynthesize,
    Synthesize,
    PostSynthesize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::PreSynthesize => "pre-synthesize",
            Phase::Synthesize => "synthesize",
            Phase::PostSynthesize => "post-synthesize",
        };
        write!(f, "{}", name)
    }
}

/// Attachable behavior unit driven through the synthesis lifecycle.
///
/// All hooks default to no-ops so implementors override only what they
/// need. `outputs` declares target paths (relative to the owning node's
/// output directory, or absolute) so collisions can be rejected before
/// any file is written.
pub trait Component {
    /// Output paths this component will write, when statically known.
    fn outputs(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    /// Runs before any artifact is emitted anywhere in the tree.
    fn pre_synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> HookResult {
        Ok(())
    }

    /// Emits this component's artifacts.
    fn synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> HookResult {
        Ok(())
    }

    /// Runs after every node finished `synthesize`; repository-level
    /// components see the complete unit output here.
    fn post_synthesize(&mut self, _ctx: &mut SynthContext<'_>) -> HookResult {
        Ok(())
    }
}

/// Failure while emitting a file through [`SynthContext::write_file`].
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("output collision on '{path}': already written by '{first}', rewritten by '{second}'")]
    Collision {
        path: String,
        first: String,
        second: String,
    },

    #[error("cannot write '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Per-node, per-phase view handed to every hook.
///
/// All writes funnel through here so the path registry can reject two
/// nodes targeting the same resolved output file.
pub struct SynthContext<'a> {
    fs: &'a dyn FileSystem,
    out_root: &'a Path,
    node_dir: &'a Path,
    node_path: &'a str,
    phase: Phase,
    /// Resolved target path -> owning node path
    registry: &'a mut BTreeMap<PathBuf, String>,
    /// Paths of every project in the tree, in lifecycle order
    projects: &'a [String],
}

impl<'a> SynthContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        fs: &'a dyn FileSystem,
        out_root: &'a Path,
        node_dir: &'a Path,
        node_path: &'a str,
        phase: Phase,
        registry: &'a mut BTreeMap<PathBuf, String>,
        projects: &'a [String],
    ) -> Self {
        Self {
            fs,
            out_root,
            node_dir,
            node_path,
            phase,
            registry,
            projects,
        }
    }

    /// Slash-joined tree path of the node this component is attached to.
    pub fn node_path(&self) -> &str {
        self.node_path
    }

    /// Phase currently being driven.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Absolute output directory of the owning node.
    pub fn out_dir(&self) -> PathBuf {
        normalize_lexical(&self.out_root.join(self.node_dir))
    }

    /// Tree paths of all projects in the workspace, in lifecycle order.
    /// Stable for the whole run: the tree is frozen before phase one.
    pub fn projects(&self) -> &[String] {
        self.projects
    }

    /// Resolve a hook-supplied path against the owning node's output
    /// directory. Absolute paths pass through; everything is lexically
    /// normalized so equal targets compare equal in the registry.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve_target(self.out_root, self.node_dir, path.as_ref())
    }

    /// Content of a previously existing file at `path`, if any. Used by
    /// components that merge into files they do not fully own.
    pub fn read_existing(&self, path: impl AsRef<Path>) -> Option<String> {
        let target = self.resolve(path);
        if self.fs.exists(&target) {
            self.fs.read_to_string(&target).ok()
        } else {
            None
        }
    }

    /// Write `content` to `path`. The first node to claim a resolved
    /// target owns it for the rest of the run; a different node writing
    /// the same target fails, a node rewriting its own target is fine.
    pub fn write_file(&mut self, path: impl AsRef<Path>, content: &str) -> Result<(), WriteError> {
        let target = self.resolve(path);
        let display_path = workspace_display(self.out_root, &target);
        if let Some(owner) = self.registry.get(&target) {
            if owner != self.node_path {
                return Err(WriteError::Collision {
                    path: display_path,
                    first: owner.clone(),
                    second: self.node_path.to_string(),
                });
            }
        }
        trace!(node = self.node_path, path = %display_path, "write");
        self.fs
            .ensure_parent(&target)
            .and_then(|_| self.fs.write(&target, content))
            .map_err(|source| WriteError::Io {
                path: display_path,
                source,
            })?;
        self.registry
            .insert(target, self.node_path.to_string());
        Ok(())
    }
}

/// Resolve `path` against `out_root`/`node_dir`: absolute paths pass
/// through, relative ones land under the node's output directory, and
/// everything is lexically normalized so equal targets compare equal.
pub(crate) fn resolve_target(out_root: &Path, node_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexical(path)
    } else {
        normalize_lexical(&out_root.join(node_dir).join(path))
    }
}
