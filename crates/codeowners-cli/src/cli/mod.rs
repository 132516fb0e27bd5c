//! Command-line arguments.

pub mod config;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use codeowners_syntax_core::inspect::InspectionKind;
use std::path::PathBuf;

/// Inspect and edit GitHub CODEOWNERS files.
#[derive(Debug, Parser)]
#[command(name = "codeowners-syntax", version, about, long_about = None)]
pub struct Args {
    /// Path to the repository root.
    #[arg(
        short = 'r',
        long,
        env = "REPOSITORY_PATH",
        default_value = ".",
        global = true
    )]
    pub repository_path: PathBuf,

    /// Path to the CODEOWNERS file, relative to the repository root.
    ///
    /// Searched for in `.github/`, the root and `docs/` when omitted.
    #[arg(short = 'f', long, env = "CODEOWNERS_FILE", global = true)]
    pub codeowners_file: Option<PathBuf>,

    /// Write machine-readable JSON to stdout and disable logging.
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// The available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the syntax tree.
    Tree,

    /// Print the token stream.
    Tokens,

    /// Show which rule owns each path.
    Owners {
        /// Repository-relative paths to resolve.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Run inspections and report findings.
    Inspect(InspectArgs),

    /// Append rules to the CODEOWNERS file.
    Append(AppendArgs),

    /// Find the CODEOWNERS file, creating an empty one if there is none.
    Init {
        /// Directory to create the file in (defaults to `.github/` under the
        /// repository root).
        dir: Option<PathBuf>,
    },
}

/// Arguments of `inspect`.
#[derive(Debug, Clone, clap::Args)]
pub struct InspectArgs {
    /// Inspections to run, comma separated (all when omitted).
    #[arg(long, env = "CHECKS", value_delimiter = ',')]
    pub checks: Vec<InspectionKind>,

    /// Lowest severity that makes the command fail.
    #[arg(long, env = "CHECK_FAILURE_LEVEL", default_value = "warning")]
    pub check_failure_level: FailureLevel,

    /// Owners skipped by the owner inspections, comma separated.
    #[arg(long, env = "IGNORED_OWNERS", value_delimiter = ',')]
    pub ignored_owners: Vec<String>,

    /// Do not report entries without owners.
    #[arg(long, env = "ALLOW_UNOWNED_ENTRIES")]
    pub allow_unowned_entries: bool,
}

/// Arguments of `append`.
#[derive(Debug, Clone, clap::Args)]
pub struct AppendArgs {
    /// Rules to append, one argument per block.
    #[arg(required = true)]
    pub lines: Vec<String>,

    /// Skip rule lines already present in the file.
    #[arg(long)]
    pub ignore_duplicates: bool,

    /// Drop blank and comment lines.
    #[arg(long)]
    pub ignore_comments: bool,

    /// Insert before this 1-based line instead of at the end.
    #[arg(long, value_name = "LINE")]
    pub insert_at_line: Option<usize>,

    /// Print the result instead of writing the file.
    #[arg(long)]
    pub dry_run: bool,
}

/// Lowest finding severity that fails `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum FailureLevel {
    /// Any finding fails (exit code 3).
    #[default]
    Warning,
    /// Only errors fail.
    Error,
}
