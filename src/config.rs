//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsproj/rsproj.toml`
//! 3. Environment variables: `RSPROJ_*` prefix
//!
//! Separately from settings, the workspace manifest (`rsproj.toml` in the
//! workspace directory) declares the tree the CLI builds: workspace name,
//! platform variant, and the projects with their declared files.

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::error::{SynthResult, SynthesisError};
use crate::domain::variant::{GitHubOptions, GitLabOptions, GitOptions, PlatformVariant};

/// Manifest file name looked up in the workspace directory.
pub const MANIFEST_FILE: &str = "rsproj.toml";

fn config_err(e: impl std::fmt::Display) -> SynthesisError {
    SynthesisError::Config {
        message: e.to_string(),
    }
}

/// Platform variant as named in configuration files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VariantName {
    None,
    Git,
    Github,
    Gitlab,
}

impl VariantName {
    /// Materialize the variant with its default options.
    pub fn to_variant(self) -> PlatformVariant {
        match self {
            VariantName::None => PlatformVariant::None,
            VariantName::Git => PlatformVariant::Git(GitOptions::default()),
            VariantName::Github => PlatformVariant::GitHub(GitHubOptions::default()),
            VariantName::Gitlab => PlatformVariant::GitLab(GitLabOptions::default()),
        }
    }
}

/// Behavioral settings, layered defaults → global file → env.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Output root for synthesis (default: the workspace directory)
    pub out_dir: PathBuf,
    /// Variant applied when a manifest does not name one
    pub default_variant: VariantName,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            default_variant: VariantName::Github,
        }
    }
}

/// Raw settings for overlay parsing: every field optional so "not
/// specified" is distinguishable from an explicit value.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    out_dir: Option<PathBuf>,
    default_variant: Option<VariantName>,
}

/// Get the XDG config directory for rsproj.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsproj").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsproj.toml"))
}

fn load_raw_settings(path: &Path) -> SynthResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| SynthesisError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SynthesisError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            out_dir: overlay.out_dir.clone().unwrap_or_else(|| self.out_dir.clone()),
            default_variant: overlay.default_variant.unwrap_or(self.default_variant),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.out_dir.to_string_lossy().as_ref());
        self.out_dir = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence (see module docs).
    pub fn load() -> SynthResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Apply `RSPROJ_*` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> SynthResult<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("RSPROJ"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("out_dir") {
            settings.out_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("default_variant") {
            settings.default_variant = match val.to_lowercase().as_str() {
                "none" => VariantName::None,
                "git" => VariantName::Git,
                "github" => VariantName::Github,
                "gitlab" => VariantName::Gitlab,
                other => {
                    return Err(SynthesisError::Config {
                        message: format!("unknown variant '{}'", other),
                    })
                }
            };
        }
        Ok(settings)
    }
}

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~`, via the shellexpand crate.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Declared file inside a project entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the project's output directory
    pub path: PathBuf,
    /// Full file body
    pub text: String,
}

/// One unit in the workspace manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    /// Output directory override, relative to the workspace root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdir: Option<PathBuf>,
    #[serde(default, rename = "file", skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileEntry>,
}

/// Declarative workspace definition (`rsproj.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkspaceManifest {
    pub name: String,
    /// Platform variant; falls back to `Settings::default_variant` when
    /// omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantName>,
    #[serde(rename = "project")]
    pub projects: Vec<ProjectEntry>,
}

impl Default for WorkspaceManifest {
    fn default() -> Self {
        Self {
            name: "workspace".to_string(),
            variant: None,
            projects: Vec::new(),
        }
    }
}

impl WorkspaceManifest {
    /// Parse a manifest file.
    pub fn load(path: &Path) -> SynthResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SynthesisError::Config {
            message: format!("read {}: {}", path.display(), e),
        })?;
        toml::from_str(&content).map_err(|e| SynthesisError::Config {
            message: format!("parse {}: {}", path.display(), e),
        })
    }

    /// Starter manifest written by `rsproj init`.
    pub fn starter() -> Self {
        Self {
            name: "workspace".to_string(),
            variant: Some(VariantName::Github),
            projects: vec![ProjectEntry {
                name: "app".to_string(),
                outdir: None,
                files: vec![FileEntry {
                    path: PathBuf::from("README.md"),
                    text: "# app\n".to_string(),
                }],
            }],
        }
    }
}
