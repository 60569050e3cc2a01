//! # Swimlane Command
//!
//! CLI surface for swimlane creation. The workflow itself is not implemented
//! yet; the command validates its input and reports that.

use anyhow::Result;
use clap::Parser;
use sprig_core::output::print_warning;
use sprig_core::portfolio::normalize_portfolio_key;

/// Default JQL pattern for a portfolio swimlane; `{}` is replaced with the
/// portfolio key.
pub const DEFAULT_SWIMLANE_JQL: &str = "issue in linkedIssues(\"{}\") or parent in linkedIssues(\"{}\")";

/// Arguments for the swimlane command
#[derive(Parser, Debug)]
pub struct SwimlaneArgs {
  /// Portfolio id: a key, a bare issue number, or a permalink
  #[arg(value_name = "PORTFOLIO")]
  pub portfolio: String,

  /// Board to place the swimlane on
  #[arg(short = 'b', long = "board")]
  pub board: Option<String>,

  /// JQL pattern for the swimlane; use {} for pasting the portfolio key
  #[arg(short = 'j', long = "jql", default_value = DEFAULT_SWIMLANE_JQL)]
  pub jql: String,

  /// Swimlane position on the board
  #[arg(short = 'p', long = "position", default_value_t = 0)]
  pub position: u32,
}

/// Handle the swimlane command
pub fn handle_swimlane_command(args: SwimlaneArgs) -> Result<()> {
  let _portfolio_key = normalize_portfolio_key(&args.portfolio)?;
  print_warning("Swimlane creation is not implemented yet");
  Ok(())
}
