//! Argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Resolve and load scene bundles
#[derive(Parser, Debug)]
#[command(name = "scenery")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Loader configuration file (TOML), else `$SCENERY_CONFIG`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve references against a scene
    Resolve {
        /// Scene URL or file path
        scene: String,

        /// Directory references are relative to (defaults to the scene's)
        #[arg(short, long)]
        base: Option<String>,

        /// References to resolve
        #[arg(required = true)]
        references: Vec<String>,
    },

    /// Fetch and parse a scene, printing it as JSON
    Load {
        /// Scene URL or file path
        scene: String,
    },
}
