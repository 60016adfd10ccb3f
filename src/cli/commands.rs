//! Command dispatch: manifest loading, tree construction, synthesis.

use std::path::{Path, PathBuf};

use clap::CommandFactory;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::error::SynthesisError;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{Settings, WorkspaceManifest, MANIFEST_FILE};
use crate::domain::node::{Construct, NodeRef};
use crate::domain::project::ProjectOptions;
use crate::domain::repository::{Repository, RepositoryOptions};
use crate::infrastructure::error::InfraError;

use crate::application::components::TextFile;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let workspace_dir = resolve_workspace_dir(cli)?;
    match &cli.command {
        Some(Commands::Synth { out, manifest }) => {
            synth(&workspace_dir, out.as_deref(), manifest.as_deref())
        }
        Some(Commands::Tree { manifest }) => tree(&workspace_dir, manifest.as_deref()),
        Some(Commands::Projects { manifest }) => projects(&workspace_dir, manifest.as_deref()),
        Some(Commands::Init { force }) => init(&workspace_dir, *force),
        Some(Commands::Config) => show_config(),
        Some(Commands::Completion { shell }) => completion(*shell),
        None => Ok(()),
    }
}

fn resolve_workspace_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.workspace_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("resolve current directory", e))),
    }
}

fn manifest_path(workspace_dir: &Path, overridden: Option<&Path>) -> PathBuf {
    overridden
        .map(Path::to_path_buf)
        .unwrap_or_else(|| workspace_dir.join(MANIFEST_FILE))
}

fn load_manifest(workspace_dir: &Path, overridden: Option<&Path>) -> CliResult<WorkspaceManifest> {
    let path = manifest_path(workspace_dir, overridden);
    debug!(manifest = %path.display(), "loading manifest");
    Ok(WorkspaceManifest::load(&path)?)
}

/// Build the construct tree a manifest describes. The settings supply
/// the platform variant when the manifest omits one.
pub fn build_workspace(manifest: &WorkspaceManifest, settings: &Settings) -> CliResult<Repository> {
    let variant = manifest.variant.unwrap_or(settings.default_variant);
    let repo = Repository::new(RepositoryOptions {
        id: manifest.name.clone(),
        variant: variant.to_variant(),
        ..Default::default()
    })?;
    for entry in &manifest.projects {
        let project = repo.project_with(
            entry.name.as_str(),
            ProjectOptions {
                outdir: entry.outdir.clone(),
                ..Default::default()
            },
        )?;
        for file in &entry.files {
            project.add_component(TextFile::new(&file.path, &file.text))?;
        }
    }
    Ok(repo)
}

#[instrument(skip_all)]
fn synth(workspace_dir: &Path, out: Option<&Path>, manifest: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load()?;
    let manifest = load_manifest(workspace_dir, manifest)?;
    let repo = build_workspace(&manifest, &settings)?;

    let out_root = {
        let chosen = out.map(Path::to_path_buf).unwrap_or(settings.out_dir);
        if chosen.is_absolute() {
            chosen
        } else {
            workspace_dir.join(chosen)
        }
    };

    repo.synth(&out_root)?;
    output::success(&format!(
        "synthesized '{}' into {}",
        repo.id(),
        out_root.display()
    ));
    Ok(())
}

fn render_node(node: &NodeRef) -> Tree<String> {
    let label = if node.is_repository() {
        format!("{} (repository)", node.id())
    } else {
        node.id()
    };
    Tree::new(label).with_leaves(node.children().iter().map(render_node))
}

fn tree(workspace_dir: &Path, manifest: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load()?;
    let manifest = load_manifest(workspace_dir, manifest)?;
    let repo = build_workspace(&manifest, &settings)?;
    let root_label = format!("{} ({})", repo.id(), repo.variant().label());
    let rendered = Tree::new(root_label)
        .with_leaves(repo.node_ref().children().iter().map(render_node));
    output::info(&rendered);
    Ok(())
}

fn projects(workspace_dir: &Path, manifest: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load()?;
    let manifest = load_manifest(workspace_dir, manifest)?;
    let repo = build_workspace(&manifest, &settings)?;
    for project in repo.projects() {
        output::info(&project.path());
    }
    Ok(())
}

fn init(workspace_dir: &Path, force: bool) -> CliResult<()> {
    let path = workspace_dir.join(MANIFEST_FILE);
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let content = toml::to_string_pretty(&WorkspaceManifest::starter()).map_err(|e| {
        CliError::from(SynthesisError::Config {
            message: e.to_string(),
        })
    })?;
    std::fs::write(&path, content)
        .map_err(|e| CliError::Infra(InfraError::io(format!("write {}", path.display()), e)))?;
    output::action("created", &path.display());
    Ok(())
}

fn show_config() -> CliResult<()> {
    let settings = Settings::load()?;
    let rendered = toml::to_string_pretty(&settings).map_err(|e| {
        CliError::from(SynthesisError::Config {
            message: e.to_string(),
        })
    })?;
    output::header("settings");
    output::info(&rendered);
    Ok(())
}

fn completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
