//! Managed ignore-file component.
//!
//! Owns a marker-delimited section of the ignore file and leaves
//! everything outside the markers alone, so hand-maintained entries
//! survive re-synthesis.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::domain::component::{Component, HookResult, SynthContext};

const START_MARKER: &str = "# rsproj-managed start";
const END_MARKER: &str = "# rsproj-managed end";

/// Ignore file with a managed pattern section. Patterns are kept sorted
/// and de-duplicated; a `!`-prefixed pattern retracts a previous one.
pub struct IgnoreFile {
    file_name: String,
    patterns: BTreeSet<String>,
}

impl Default for IgnoreFile {
    fn default() -> Self {
        Self::new()
    }
}

impl IgnoreFile {
    /// A managed `.gitignore`.
    pub fn new() -> Self {
        Self::with_name(".gitignore")
    }

    /// A managed ignore file with a custom name (e.g. `.dockerignore`).
    pub fn with_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            patterns: BTreeSet::new(),
        }
    }

    /// Add one pattern. `!pattern` removes the corresponding entry.
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if let Some(negated) = pattern.strip_prefix('!') {
            self.patterns.remove(negated);
        } else {
            self.patterns.insert(pattern);
        }
    }

    pub fn add_patterns(&mut self, patterns: impl IntoIterator<Item = String>) {
        for pattern in patterns {
            self.add_pattern(pattern);
        }
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|s| s.as_str())
    }

    fn render_managed(&self) -> String {
        if self.patterns.is_empty() {
            return String::new();
        }
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let lines: Vec<&str> = self.patterns.iter().map(|s| s.as_str()).collect();
        format!(
            "{}\n# Updated: {}\n{}\n{}\n",
            START_MARKER,
            timestamp,
            lines.join("\n"),
            END_MARKER
        )
    }

    /// Remove the managed section from existing content, keeping
    /// everything else verbatim.
    fn remove_managed_section(content: &str) -> String {
        let mut result = String::new();
        let mut in_managed = false;

        for line in content.lines() {
            if line.trim() == START_MARKER {
                in_managed = true;
                continue;
            }
            if line.trim() == END_MARKER {
                in_managed = false;
                continue;
            }
            if !in_managed {
                result.push_str(line);
                result.push('\n');
            }
        }

        result
    }
}

impl Component for IgnoreFile {
    fn outputs(&self) -> Vec<PathBuf> {
        vec![PathBuf::from(&self.file_name)]
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> HookResult {
        let existing = ctx.read_existing(&self.file_name).unwrap_or_default();
        let kept = Self::remove_managed_section(&existing);
        let managed = self.render_managed();

        let content = if kept.trim().is_empty() {
            managed
        } else if managed.is_empty() {
            kept
        } else {
            format!("{}\n\n{}", kept.trim_end(), managed)
        };

        ctx.write_file(&self.file_name, content.trim_start())?;
        Ok(())
    }
}
