//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// depsync - keep source dependencies pinned to exact revisions
#[derive(Parser, Debug)]
#[command(name = "depsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Bring every declared dependency to its pinned revision
    ///
    /// Examples:
    ///   depsync sync                       # manifest in current directory
    ///   depsync sync --root modules        # checkouts under modules/
    ///   depsync sync --jobs 4              # process four at a time
    ///   depsync sync --force               # replace conflicting content
    Sync {
        /// Path to the dependency manifest
        #[arg(short, long, default_value = "depsync.toml")]
        manifest: PathBuf,

        /// Workspace root the dependency directories live under
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Replace conflicting content and discard local modifications
        #[arg(long)]
        force: bool,

        /// Number of dependencies to process in parallel
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,

        /// Output results as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },

    /// Report each dependency's state without fetching anything
    Check {
        /// Path to the dependency manifest
        #[arg(short, long, default_value = "depsync.toml")]
        manifest: PathBuf,

        /// Workspace root the dependency directories live under
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Output results as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },
}
