//! # Issue Pager
//!
//! An explicit pager over search-result pages with a resumable cursor, plus
//! the selection loop the branch workflow presents to the user. The loop
//! reads from an injected `BufRead` so tests can drive it with canned input.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use sprig_core::output::truncate_chars;
use sprig_jira::models::JiraIssue;
use sprig_jira::JiraClient;
use tokio::runtime::Runtime;

use crate::consts::{DEFAULT_SUMMARY_LENGTH, max_status_width, status_icon};

/// Pages through the results of one JQL query, remembering how far it got.
pub struct IssuePager<'a> {
  runtime: &'a Runtime,
  client: &'a JiraClient,
  jql: String,
  page_size: u64,
  offset: u64,
}

impl<'a> IssuePager<'a> {
  pub fn new(runtime: &'a Runtime, client: &'a JiraClient, jql: String, page_size: u64) -> Self {
    Self {
      runtime,
      client,
      jql,
      page_size,
      offset: 0,
    }
  }

  /// Fetch the next page, advancing the cursor by the number of issues
  /// returned.
  pub fn next_page(&mut self) -> Result<Vec<JiraIssue>> {
    let results = self
      .runtime
      .block_on(self.client.search_issues(&self.jql, self.offset, self.page_size))?;
    self.offset += results.issues.len() as u64;
    Ok(results.issues)
  }

  /// How many issues have been fetched so far.
  pub fn offset(&self) -> u64 {
    self.offset
  }
}

/// Present pages of issues and let the user pick one by number.
///
/// Empty input fetches another page; a number selects the issue with that
/// index across all pages shown so far. Returns `None` when the input ends
/// before a selection is made.
pub fn select_issue<R: BufRead, W: Write>(
  pager: &mut IssuePager<'_>,
  input: &mut R,
  out: &mut W,
  host: &str,
) -> Result<Option<JiraIssue>> {
  let mut issues: Vec<JiraIssue> = Vec::new();

  loop {
    let page = pager.next_page()?;
    if page.is_empty() {
      writeln!(out, "No more issues")?;
    } else {
      print_issue_page(out, issues.len(), &page, host)?;
    }
    issues.extend(page);

    loop {
      writeln!(out, "Type an issue number to branch from it, or press Enter for more issues")?;

      let mut line = String::new();
      let read = input.read_line(&mut line).context("Failed to read selection")?;
      if read == 0 {
        return Ok(None);
      }

      let line = line.trim();
      if line.is_empty() {
        break;
      }
      match line.parse::<usize>() {
        Ok(index) if index < issues.len() => return Ok(Some(issues.swap_remove(index))),
        Ok(_) => writeln!(out, "No issue with that number in the list")?,
        Err(_) => writeln!(out, "Unknown option. Try again")?,
      }
    }
  }
}

fn print_issue_page<W: Write>(out: &mut W, start_index: usize, page: &[JiraIssue], host: &str) -> Result<()> {
  let status_width = max_status_width();
  let summary_width = page
    .iter()
    .map(|issue| issue.fields.summary.chars().count().min(DEFAULT_SUMMARY_LENGTH))
    .max()
    .unwrap_or(0);

  for (position, issue) in page.iter().enumerate() {
    let index = format!("{})", start_index + position);
    let icon = status_icon(&issue.fields.status.name);
    let status = &issue.fields.status.name;
    let summary = truncate_chars(&issue.fields.summary, DEFAULT_SUMMARY_LENGTH);
    writeln!(
      out,
      "{index:<3} {icon} {status:<status_width$} {summary:<summary_width$} {host}/browse/{key}",
      key = issue.key,
    )?;
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use serde_json::json;
  use sprig_jira::models::JiraAuth;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  fn page_body(start_at: u64, total: u64, issues: serde_json::Value) -> serde_json::Value {
    json!({
        "startAt": start_at,
        "maxResults": 5,
        "total": total,
        "issues": issues,
    })
  }

  fn issue_body(key: &str, summary: &str, status: &str) -> serde_json::Value {
    json!({
        "id": key,
        "key": key,
        "fields": { "summary": summary, "status": { "name": status } }
    })
  }

  fn start_mock_server(rt: &Runtime) -> MockServer {
    rt.block_on(MockServer::start())
  }

  #[test]
  fn test_select_issue_by_number_on_first_page() -> Result<()> {
    let rt = Runtime::new()?;
    let server = start_mock_server(&rt);

    rt.block_on(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("startAt", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
          0,
          2,
          json!([issue_body("HH-1", "First", "Open"), issue_body("HH-2", "Second", "Open")]),
        )))
        .mount(&server),
    );

    let client = JiraClient::new(
      &server.uri(),
      JiraAuth {
        username: "u".to_string(),
        api_token: "t".to_string(),
      },
    );
    let mut pager = IssuePager::new(&rt, &client, "ORDER BY created DESC".to_string(), 5);

    let mut input = Cursor::new(b"1\n".to_vec());
    let mut out = Vec::new();
    let selected = select_issue(&mut pager, &mut input, &mut out, "https://tracker.example.com")?;

    assert_eq!(selected.unwrap().key, "HH-2");

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("0)"));
    assert!(printed.contains("https://tracker.example.com/browse/HH-1"));

    Ok(())
  }

  #[test]
  fn test_empty_input_fetches_next_page() -> Result<()> {
    let rt = Runtime::new()?;
    let server = start_mock_server(&rt);

    rt.block_on(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("startAt", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
          0,
          6,
          json!([
            issue_body("HH-1", "First", "Open"),
            issue_body("HH-2", "Second", "Open"),
            issue_body("HH-3", "Third", "Open"),
            issue_body("HH-4", "Fourth", "Open"),
            issue_body("HH-5", "Fifth", "Open")
          ]),
        )))
        .mount(&server),
    );
    rt.block_on(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("startAt", "5"))
        .respond_with(
          ResponseTemplate::new(200)
            .set_body_json(page_body(5, 6, json!([issue_body("HH-6", "Sixth", "Need Review")]))),
        )
        .mount(&server),
    );

    let client = JiraClient::new(
      &server.uri(),
      JiraAuth {
        username: "u".to_string(),
        api_token: "t".to_string(),
      },
    );
    let mut pager = IssuePager::new(&rt, &client, "ORDER BY created DESC".to_string(), 5);

    // Ask for more issues once, then select the sixth by absolute index.
    let mut input = Cursor::new(b"\n5\n".to_vec());
    let mut out = Vec::new();
    let selected = select_issue(&mut pager, &mut input, &mut out, "https://tracker.example.com")?;

    assert_eq!(selected.unwrap().key, "HH-6");
    assert_eq!(pager.offset(), 6);

    Ok(())
  }

  #[test]
  fn test_invalid_input_reprompts_and_eof_aborts() -> Result<()> {
    let rt = Runtime::new()?;
    let server = start_mock_server(&rt);

    rt.block_on(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(
          ResponseTemplate::new(200).set_body_json(page_body(0, 1, json!([issue_body("HH-1", "Only", "Open")]))),
        )
        .mount(&server),
    );

    let client = JiraClient::new(
      &server.uri(),
      JiraAuth {
        username: "u".to_string(),
        api_token: "t".to_string(),
      },
    );
    let mut pager = IssuePager::new(&rt, &client, "ORDER BY created DESC".to_string(), 5);

    // Nonsense, an out-of-range number, then end of input.
    let mut input = Cursor::new(b"what\n7\n".to_vec());
    let mut out = Vec::new();
    let selected = select_issue(&mut pager, &mut input, &mut out, "https://tracker.example.com")?;

    assert!(selected.is_none());
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Unknown option"));
    assert!(printed.contains("No issue with that number"));

    Ok(())
  }
}
