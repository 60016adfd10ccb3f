//! Repository-level aggregation over the unit list.

use std::path::PathBuf;

use itertools::Itertools;

use crate::domain::component::{Component, HookResult, SynthContext};

/// Writes an index of every project path in the workspace. Runs in the
/// post phase so the unit list is final and all unit output exists when
/// the index is written.
pub struct ProjectIndex {
    file_name: String,
}

impl Default for ProjectIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::with_name("PROJECTS")
    }

    pub fn with_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Component for ProjectIndex {
    fn outputs(&self) -> Vec<PathBuf> {
        vec![PathBuf::from(&self.file_name)]
    }

    fn post_synthesize(&mut self, ctx: &mut SynthContext<'_>) -> HookResult {
        let mut content = ctx.projects().iter().join("\n");
        content.push('\n');
        ctx.write_file(&self.file_name, &content)?;
        Ok(())
    }
}
