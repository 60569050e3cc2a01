//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the sprig tool: issue
//! search, branch creation, portfolio decomposition, and the swimlane
//! surface.

mod branch;
mod search;
mod subtasks;
mod swimlane;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use directories::BaseDirs;

pub use branch::BranchArgs;
pub use search::SearchArgs;
pub use subtasks::SubtasksArgs;
pub use swimlane::SwimlaneArgs;

/// Top-level CLI command for the sprig tool
#[derive(Parser)]
#[command(name = "sprig")]
#[command(display_name = "🌱 Sprig")]
#[command(about = "A tracker workflow assistant")]
#[command(
  long_about = "Sprig automates routine tracker chores: searching issues, creating git\n\
        branches tied to issues, and bulk-creating subtasks from a portfolio's\n\
        decomposition table."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the sprig tool
#[derive(Subcommand)]
pub enum Commands {
  /// Search tracker issues
  #[command(long_about = "Search tracker issues with a structured filter.\n\n\
            Filters compose into a single query: scope, project types, statuses\n\
            (prefix with '!' to exclude; alias tokens expand to status groups),\n\
            free text, title, and development team.")]
  #[command(alias = "s")]
  Search(SearchArgs),

  /// Create a git branch for a tracker issue
  #[command(long_about = "Create a git branch named after a tracker issue.\n\n\
            Interactively pick one of your unfinished issues, sync the base branch,\n\
            create (or switch to) a branch named after the issue key, and move the\n\
            issue to In Progress when it is still Open.")]
  #[command(alias = "br")]
  Branch(BranchArgs),

  /// Create subtasks from a portfolio's decomposition table
  #[command(long_about = "Create subtasks from the decomposition table of a portfolio.\n\n\
            The table is read from the portfolio description, one subtask is created\n\
            per row, and the shirt-size/story-point totals are written back to the\n\
            portfolio.")]
  #[command(alias = "sub")]
  Subtasks(SubtasksArgs),

  /// Create a board swimlane for a portfolio (not implemented)
  Swimlane(SwimlaneArgs),
}

/// Dispatch a parsed CLI invocation to its command handler
pub fn handle_cli(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Search(args) => search::handle_search_command(args),
    Commands::Branch(args) => branch::handle_branch_command(args),
    Commands::Subtasks(args) => subtasks::handle_subtasks_command(args),
    Commands::Swimlane(args) => swimlane::handle_swimlane_command(args),
  }
}

/// The user's home directory, for configuration and credential lookup
pub(crate) fn home_dir() -> Result<PathBuf> {
  let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
  Ok(base_dirs.home_dir().to_path_buf())
}
