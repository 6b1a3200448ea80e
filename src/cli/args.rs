//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::DuplicatePolicy;

/// Forensic STR analysis: match registered profiles against two unknown DNA sequences
#[derive(Parser, Debug)]
#[command(name = "forensic")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short = 'c', long = "config", global = true, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Duplicate name policy: reject, overwrite, insert-right
    #[arg(long, global = true)]
    pub duplicates: Option<DuplicatePolicy>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flag matching profiles, report, and remove the rest
    Analyze {
        /// Case file (default: case_file setting)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Keep profiles that are not of interest
        #[arg(long)]
        no_cleanup: bool,
    },

    /// Show the registry as a tree
    Tree {
        /// Case file (default: case_file setting)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Run the matching pass first and mark profiles of interest with *
        #[arg(long)]
        flag: bool,
    },

    /// List profiles not of interest in level order
    Unmarked {
        /// Case file (default: case_file setting)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Count profiles of interest and not of interest
    Count {
        /// Case file (default: case_file setting)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Remove profiles by name ("Last, First") and show the resulting tree
    Remove {
        /// Case file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Names to remove, in order
        #[arg(required = true)]
        names: Vec<String>,
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
    /// Show effective settings as TOML
    Show,
    /// Show the global config file location
    Path,
    /// Print a commented config template
    Template,
}
