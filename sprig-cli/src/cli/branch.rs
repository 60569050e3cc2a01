//! # Branch Command
//!
//! Creates a git branch named after a tracker issue: interactive issue
//! selection, base-branch sync with an interactive fallback, and the
//! Open → In Progress transition.

use std::io;

use anyhow::Result;
use clap::Parser;
use dialoguer::Confirm;
use git2::Repository;
use sprig_core::config::Config;
use sprig_core::git;
use sprig_core::output::{print_error, print_info, print_success, print_warning};
use sprig_jira::jql::SearchFilter;
use sprig_jira::models::JiraIssue;
use sprig_jira::{JiraClient, auth};
use tokio::runtime::Runtime;

use crate::cli::home_dir;
use crate::consts::{BASE_BRANCH, BRANCH_PAGE_SIZE, IN_PROGRESS_TRANSITION_ID, OPEN_STATUS, PRODUCT_PROJECT};
use crate::pager::{IssuePager, select_issue};

/// Arguments for the branch command
#[derive(Parser, Debug)]
pub struct BranchArgs {
  /// Issue title pattern; without a value the repository name is used
  #[arg(short = 't', long = "title", num_args = 0..=1, value_name = "TITLE")]
  pub title: Option<Option<String>>,

  /// Offer issues in all statuses, finished ones included
  #[arg(short = 'a', long = "all")]
  pub all: bool,
}

/// Handle the branch command
pub fn handle_branch_command(args: BranchArgs) -> Result<()> {
  let Some(repo_path) = git::detect_repository() else {
    print_error("You have to be inside a git repository");
    return Ok(());
  };
  let repo = git::open_repository(&repo_path)?;

  let config = Config::load()?;
  let home = home_dir()?;
  let (rt, client) = auth::create_runtime_and_client(&home, &config)?;

  let filter = unfinished_issue_filter(&args, &repo)?;
  let jql = filter.build(config.user());
  let mut pager = IssuePager::new(&rt, &client, jql, BRANCH_PAGE_SIZE);

  let stdin = io::stdin();
  let mut input = stdin.lock();
  let mut out = io::stdout();
  let Some(issue) = select_issue(&mut pager, &mut input, &mut out, config.host())? else {
    print_warning("No issue selected");
    return Ok(());
  };

  create_branch_for_issue(&rt, &client, &repo, &issue, || {
    let answer = Confirm::new()
      .with_prompt("Create the new branch on the current HEAD?")
      .default(true)
      .interact()?;
    Ok(answer)
  })
}

/// Filter for the selection listing: unfinished product issues, optionally
/// narrowed by a title pattern.
fn unfinished_issue_filter(args: &BranchArgs, repo: &Repository) -> Result<SearchFilter> {
  let title = match &args.title {
    Some(Some(title)) => Some(title.clone()),
    // Repo name usually matches the issue titles of its project.
    _ => Some(git::repository_name(repo)?),
  };

  let statuses = if args.all {
    vec![]
  } else {
    vec!["!finished".to_string()]
  };

  Ok(SearchFilter {
    types: vec![PRODUCT_PROJECT.to_string()],
    statuses,
    title,
    ..Default::default()
  })
}

/// Create or switch to the branch named after the selected issue.
///
/// `confirm_branch_from_head` is consulted when the base-branch sync fails;
/// a negative answer aborts the workflow.
fn create_branch_for_issue<F>(
  rt: &Runtime,
  client: &JiraClient,
  repo: &Repository,
  issue: &JiraIssue,
  confirm_branch_from_head: F,
) -> Result<()>
where
  F: FnOnce() -> Result<bool>,
{
  let branch_name = issue.key.as_str();

  if git::branch_exists(repo, branch_name) {
    print_info(&format!("Switching to existing branch {branch_name}"));
    if let Err(error) = git::checkout_branch(repo, branch_name) {
      print_error(&format!(
        "Can't checkout existing branch {branch_name}. Is the working tree clean? ({error})"
      ));
    }
    return Ok(());
  }

  print_info(&format!("Syncing {BASE_BRANCH} with origin"));
  if let Err(error) = git::sync_base_branch(repo, BASE_BRANCH) {
    print_warning(&format!(
      "Error while pulling {BASE_BRANCH}: {error}. Is the working tree clean?"
    ));
    if !confirm_branch_from_head()? {
      return Ok(());
    }
  }

  print_info(&format!("Creating branch {branch_name}"));
  git::create_branch_from_head(repo, branch_name)?;

  if issue.fields.status.name.eq_ignore_ascii_case(OPEN_STATUS) {
    print_info("Updating issue status to 'In Progress'");
    rt.block_on(client.transition_issue(&issue.key, IN_PROGRESS_TRANSITION_ID))?;
    print_success("Issue status updated");
  }

  Ok(())
}
