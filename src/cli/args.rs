//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Declarative workspace synthesizer: construct trees, platform variants,
/// and generated repository config files
#[derive(Parser, Debug)]
#[command(name = "rsproj")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Workspace directory (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub workspace_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the construct tree from the manifest and synthesize it
    Synth {
        /// Output root (default: settings out_dir, resolved against the
        /// workspace directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Manifest file (default: rsproj.toml in the workspace directory)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Show the construct tree
    Tree {
        /// Manifest file (default: rsproj.toml in the workspace directory)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// List project paths
    Projects {
        /// Manifest file (default: rsproj.toml in the workspace directory)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Write a starter manifest
    Init {
        /// Overwrite an existing manifest
        #[arg(short, long)]
        force: bool,
    },

    /// Show merged settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
