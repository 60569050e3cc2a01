//! # Search Command
//!
//! Executes a structured issue search and renders the result listing.

use anyhow::Result;
use clap::Parser;
use sprig_core::config::Config;
use sprig_core::output::truncate_chars;
use sprig_jira::jql::SearchFilter;
use sprig_jira::models::JiraIssue;
use sprig_jira::{JiraClient, auth};
use tokio::runtime::Runtime;

use crate::cli::home_dir;
use crate::consts::{DEFAULT_SUMMARY_LENGTH, status_icon};

/// Arguments for the search command
#[derive(Parser, Debug)]
pub struct SearchArgs {
  /// Maximum number of issues to return
  #[arg(value_name = "LIMIT", default_value_t = 10)]
  pub limit: u64,

  /// Index of the first issue to return
  #[arg(short = 'o', long = "offset", default_value_t = 0)]
  pub offset: u64,

  /// Project types to search
  #[arg(short = 't', long = "types", num_args = 1..)]
  pub types: Vec<String>,

  /// Development teams to filter by; a bare flag uses the configured team
  #[arg(long = "devteam", alias = "dt", num_args = 0.., value_name = "TEAM")]
  pub devteam: Option<Vec<String>>,

  /// Statuses to include; prefix with '!' to exclude, aliases expand to
  /// status groups
  #[arg(long = "statuses", alias = "st", num_args = 1.., value_name = "STATUS")]
  pub statuses: Vec<String>,

  /// Free-text term matched against issue text and labels
  #[arg(short = 's', long = "search")]
  pub search: Option<String>,

  /// Title pattern matched against the issue summary
  #[arg(long = "title", alias = "ti")]
  pub title: Option<String>,

  /// Restrict to own issues; optionally name the scope fields
  #[arg(short = 'm', long = "my", num_args = 0.., value_name = "FIELD")]
  pub my: Option<Vec<String>>,

  /// Trim each output line to this many characters
  #[arg(long = "trim", alias = "tr", value_name = "CHARS")]
  pub trim: Option<usize>,

  /// Suppress all listing output
  #[arg(long = "silent", alias = "si")]
  pub silent: bool,
}

/// Handle the search command
pub fn handle_search_command(args: SearchArgs) -> Result<()> {
  let config = Config::load()?;
  let home = home_dir()?;
  let (rt, client) = auth::create_runtime_and_client(&home, &config)?;

  run_search(&rt, &client, &config, &args)?;
  Ok(())
}

/// Execute a search and, unless silenced, print the listing.
fn run_search(rt: &Runtime, client: &JiraClient, config: &Config, args: &SearchArgs) -> Result<Vec<JiraIssue>> {
  let filter = build_filter(args, config);
  let user = rt.block_on(client.current_user())?;
  let jql = filter.build(&user.name);

  if !args.silent {
    println!("query: {jql}");
  }

  let results = rt.block_on(client.search_issues(&jql, args.offset, args.limit))?;
  if !args.silent {
    render_issues(&results.issues, config, args.trim);
  }

  Ok(results.issues)
}

fn build_filter(args: &SearchArgs, config: &Config) -> SearchFilter {
  let teams = match &args.devteam {
    None => vec![],
    Some(teams) if teams.is_empty() => config.team().map(str::to_string).into_iter().collect(),
    Some(teams) => teams.clone(),
  };

  SearchFilter {
    my: args.my.clone(),
    types: args.types.clone(),
    statuses: args.statuses.clone(),
    search: args.search.clone(),
    title: args.title.clone(),
    teams,
  }
}

fn render_issues(issues: &[JiraIssue], config: &Config, trim: Option<usize>) {
  let link_width = issues
    .iter()
    .map(|issue| config.browse_url(&issue.key).len())
    .max()
    .unwrap_or(0);
  let status_width = issues
    .iter()
    .map(|issue| issue.fields.status.name.len())
    .max()
    .unwrap_or(0);

  for issue in issues {
    let icon = status_icon(&issue.fields.status.name);
    let status = &issue.fields.status.name;
    let link = config.browse_url(&issue.key);
    let summary = truncate_chars(&issue.fields.summary, DEFAULT_SUMMARY_LENGTH);

    let line = format!("{icon} {status:<status_width$} {link:<link_width$} {summary}");
    let line = match trim {
      Some(chars) => truncate_chars(&line, chars),
      None => line,
    };
    println!("{line}");
  }
}
