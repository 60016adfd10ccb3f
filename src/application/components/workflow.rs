//! CI engine components: one per platform, with genuinely disjoint
//! configuration surfaces. The emitted pipelines are deliberately
//! minimal skeletons; ecosystem-specific job content comes from
//! collaborators outside this crate.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::domain::component::{Component, HookResult, SynthContext};

const GENERATED_HEADER: &str = "# Generated by rsproj. Do not edit by hand.";

/// GitHub Actions workflow under `.github/workflows/`.
pub struct GithubWorkflow {
    name: String,
}

impl GithubWorkflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn file_path(&self) -> PathBuf {
        PathBuf::from(format!(".github/workflows/{}.yml", self.name))
    }
}

impl Component for GithubWorkflow {
    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.file_path()]
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> HookResult {
        let content = format!(
            "{header}\nname: {name}\non:\n  push:\n    branches: [main]\n  pull_request: {{}}\njobs:\n  {name}:\n    runs-on: ubuntu-latest\n    steps:\n      - uses: actions/checkout@v4\n",
            header = GENERATED_HEADER,
            name = self.name,
        );
        ctx.write_file(self.file_path(), &content)?;
        Ok(())
    }
}

/// GitLab CI pipeline at the repository root.
pub struct GitlabCi {
    stages: Vec<String>,
}

impl GitlabCi {
    pub fn new(stages: Vec<String>) -> Self {
        Self { stages }
    }

    fn file_path(&self) -> PathBuf {
        PathBuf::from(".gitlab-ci.yml")
    }
}

impl Component for GitlabCi {
    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.file_path()]
    }

    fn synthesize(&mut self, ctx: &mut SynthContext<'_>) -> HookResult {
        let mut content = format!("{}\nstages:\n", GENERATED_HEADER);
        for stage in &self.stages {
            writeln!(content, "  - {}", stage)?;
        }
        for stage in &self.stages {
            writeln!(content, "\n{stage}:\n  stage: {stage}\n  script:\n    - echo {stage}")?;
        }
        ctx.write_file(self.file_path(), &content)?;
        Ok(())
    }
}
