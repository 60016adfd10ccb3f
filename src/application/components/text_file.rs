//! Plain declarative text file.

use std::path::{Path, PathBuf};

use crate::domain::component::{Component, HookResult, SynthContext};

/// Writes a fixed text file relative to its owning node's directory.
/// The target path is declared up front, so collisions with any other
/// node are rejected before synthesis writes anything.
#[derive(Debug)]
pub struct TextFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl TextFile {
    pub fn new(path: impl AsRef<Path>, content: impl AsRef<str>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lines: content.as_ref().lines().map(str::to_string).collect(),
        }
    }

    /// Append one line to the file body.
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

impl Component for TextFile {
    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.path.clone()]
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> HookResult {
        let mut content = self.lines.join("\n");
        content.push('\n');
        ctx.write_file(&self.path, &content)?;
        Ok(())
    }
}
