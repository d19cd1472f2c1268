//! CLI argument definitions using clap
//!
//! Built-in commands only; proxy commands are added at runtime by [`crate::cli::proxy`].

use clap::{ArgAction, Parser, Subcommand};

/// Platform.sh CLI commands under one roof
#[derive(Parser, Debug)]
#[command(name = "cloudproxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List cloud commands (main ones unless --all)
    List {
        /// Show every command, not just the main ones
        #[arg(short, long)]
        all: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init,

    /// Show config paths
    Path,
}
