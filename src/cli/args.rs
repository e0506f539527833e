//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Grow decision/leaf trees from build scripts and inspect them with visitors
#[derive(Parser, Debug)]
#[command(name = "treeforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Local config file, layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a build script and print the resulting tree
    Run {
        /// Build script (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,

        /// Visitor report to print after the tree
        #[arg(long, value_enum, default_value_t = VisitKind::None)]
        visit: VisitKind,

        /// Do not print the tree
        #[arg(long)]
        no_tree: bool,
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

    /// Print config template
    Template,

    /// Show config paths
    Path,
}

/// Which visitors to run over the built tree.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    None,
    /// Mocked depth per node
    Depth,
    /// Running leaf count
    Leaves,
    /// Both reports
    All,
}

impl VisitKind {
    pub fn depth(self) -> bool {
        matches!(self, VisitKind::Depth | VisitKind::All)
    }

    pub fn leaves(self) -> bool {
        matches!(self, VisitKind::Leaves | VisitKind::All)
    }
}
