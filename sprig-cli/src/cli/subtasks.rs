//! # Subtasks Command
//!
//! Bulk-creates subtasks from the decomposition table embedded in a
//! portfolio's description, aggregates their shirt sizes into a story-point
//! total, and writes the totals back onto the portfolio.

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use sprig_core::config::Config;
use sprig_core::decomposition::{DecompositionRow, DecompositionTable, TaskKind, sanitize};
use sprig_core::output::{print_info, print_success, print_warning};
use sprig_core::portfolio::normalize_portfolio_key;
use sprig_core::shirts::{ShirtAggregate, StoryPoints};
use sprig_jira::models::{JiraIssue, NewIssue};
use sprig_jira::{JiraClient, auth};
use tokio::runtime::Runtime;

use crate::cli::home_dir;
use crate::consts::{
  AUTOTEST_PROJECT, PORTFOLIO_LINK_TYPE, PRODUCT_PROJECT, SHIRT_FIELD, SHIRT_SUMMARY_FIELD, STORY_POINT_FIELD,
  SUBTASK_ISSUE_TYPE,
};

/// Arguments for the subtasks command
#[derive(Parser, Debug)]
pub struct SubtasksArgs {
  /// Portfolio id: a key, a bare issue number, or a permalink
  #[arg(value_name = "PORTFOLIO")]
  pub portfolio: String,

  /// Don't check whether tasks already exist before creating them
  #[arg(short = 's', long = "skip-check")]
  pub skip_check: bool,

  /// Don't create a swimlane for the portfolio
  #[arg(long = "no-swimlane", alias = "nsl")]
  pub no_swimlane: bool,

  /// Board id for the swimlane
  #[arg(short = 'b', long = "board")]
  pub board: Option<String>,

  /// Swimlane position on the board
  #[arg(short = 'p', long = "position", default_value_t = 0)]
  pub position: u32,

  /// Compute and print everything without calling any mutating API
  #[arg(long = "dryrun")]
  pub dryrun: bool,
}

/// Handle the subtasks command
pub fn handle_subtasks_command(args: SubtasksArgs) -> Result<()> {
  let config = Config::load()?;
  let home = home_dir()?;
  let (rt, client) = auth::create_runtime_and_client(&home, &config)?;

  run_subtasks(&rt, &client, &config, &args)?;
  Ok(())
}

/// Outcome of one subtask run.
#[derive(Debug, Default)]
pub(crate) struct SubtasksReport {
  pub created: Vec<String>,
  pub skipped: usize,
  pub story_points: StoryPoints,
  pub shirt_summary: String,
}

struct SubtaskContext<'a> {
  rt: &'a Runtime,
  client: &'a JiraClient,
  config: &'a Config,
  args: &'a SubtasksArgs,
  portfolio_key: String,
  /// Sanitized summaries of issues already linked to the portfolio.
  linked_titles: HashMap<String, String>,
}

pub(crate) fn run_subtasks(
  rt: &Runtime,
  client: &JiraClient,
  config: &Config,
  args: &SubtasksArgs,
) -> Result<SubtasksReport> {
  let portfolio_key = normalize_portfolio_key(&args.portfolio)?;

  print_info(&format!(
    "Looking for the decomposition table in {portfolio_key}. This may take a few seconds..."
  ));
  let portfolio = rt.block_on(client.get_issue(&portfolio_key))?;
  let description = portfolio.fields.description.clone().unwrap_or_default();
  let table =
    DecompositionTable::from_description(&description).with_context(|| format!("Cannot create subtasks for {portfolio_key}"))?;
  print_info(&format!("Decomposition table with {} rows found", table.len()));

  let ctx = SubtaskContext {
    rt,
    client,
    config,
    args,
    linked_titles: linked_task_titles(&portfolio),
    portfolio_key,
  };

  let mut aggregate = ShirtAggregate::new();
  let mut report = SubtasksReport::default();
  for row in table.rows() {
    process_row(&ctx, row, &mut aggregate, &mut report)?;
  }

  let mut fields = serde_json::Map::new();
  let total = aggregate.total();
  if !total.is_zero() {
    print_info(&format!("Adding story points to portfolio: {total} SP"));
    fields.insert(STORY_POINT_FIELD.to_string(), json!(total.as_f64()));
  }
  let summary = aggregate.summary();
  if !summary.is_empty() {
    print_info(&format!("Adding shirts to portfolio: {summary}"));
    fields.insert(SHIRT_SUMMARY_FIELD.to_string(), json!(summary));
    fields.insert(
      "description".to_string(),
      json!(format!("{description}\r\n{summary} = {total} SP")),
    );
  }

  if !ctx.args.no_swimlane && ctx.args.board.is_some() {
    print_warning("Swimlane creation is not implemented yet; skipping");
  }

  if ctx.args.dryrun {
    println!(
      "Fields for portfolio update: {}",
      serde_json::to_string_pretty(&fields)?
    );
  } else if !fields.is_empty() {
    rt.block_on(client.update_issue_fields(&ctx.portfolio_key, &fields))?;
  }

  report.story_points = total;
  report.shirt_summary = summary;
  Ok(report)
}

fn process_row(
  ctx: &SubtaskContext<'_>,
  row: DecompositionRow<'_>,
  aggregate: &mut ShirtAggregate,
  report: &mut SubtasksReport,
) -> Result<()> {
  let Some(title) = row.title().map(str::trim).filter(|title| !title.is_empty()) else {
    print_warning("Skipping a row without a task title");
    return Ok(());
  };

  // Shirts count toward the totals even for rows that already exist.
  let shirt = row.shirt().map(str::trim).filter(|shirt| !shirt.is_empty());
  let recognized = match shirt {
    Some(shirt) => aggregate.record(shirt, ctx.config.shirt_mapping()),
    None => false,
  };
  if !recognized {
    print_warning(&format!(
      "Unknown shirt size on task \"{title}\". The shirt summary may be incomplete"
    ));
  }

  if !ctx.args.skip_check && ctx.linked_titles.contains_key(&sanitize(title)) {
    print_info(&format!("Skipping task \"{title}\", it already exists"));
    report.skipped += 1;
    return Ok(());
  }

  let kind = TaskKind::from_title(title);
  let project = match kind {
    TaskKind::Product => PRODUCT_PROJECT,
    TaskKind::Autotest => AUTOTEST_PROJECT,
  };

  let mut new_issue = NewIssue::new(project, SUBTASK_ISSUE_TYPE, title);
  new_issue.description = row.description().map(str::to_string);
  if let Some(shirt) = shirt {
    new_issue
      .custom_fields
      .insert(SHIRT_FIELD.to_string(), json!(shirt.to_uppercase()));
  }

  if ctx.args.dryrun {
    print_info(&format!("[dryrun] Would create {} task \"{title}\"", kind.key()));
    return Ok(());
  }

  let created = ctx.rt.block_on(ctx.client.create_issue(&new_issue))?;
  ctx
    .rt
    .block_on(ctx.client.link_issues(PORTFOLIO_LINK_TYPE, &ctx.portfolio_key, &created.key))?;
  print_success(&format!(
    "Task \"{title}\" created - {}",
    ctx.config.browse_url(&created.key)
  ));
  report.created.push(created.key);

  Ok(())
}

/// Sanitized summary → key of every issue already linked outward from the
/// portfolio. Uses the same sanitization as row titles so both sides
/// normalize identically.
fn linked_task_titles(portfolio: &JiraIssue) -> HashMap<String, String> {
  portfolio
    .fields
    .issue_links
    .iter()
    .filter_map(|link| link.outward_issue.as_ref())
    .map(|linked| (sanitize(&linked.fields.summary), linked.key.clone()))
    .collect()
}
