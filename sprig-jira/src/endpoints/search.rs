//! # Search Endpoint
//!
//! JQL search execution with offset/limit pagination.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::debug;

use crate::client::JiraClient;
use crate::models::SearchResults;

impl JiraClient {
  /// Execute a JQL query, returning one page of results
  pub async fn search_issues(&self, jql: &str, start_at: u64, max_results: u64) -> Result<SearchResults> {
    let url = format!("{}/rest/api/2/search", self.base_url);
    debug!(jql, start_at, max_results, "executing tracker search");

    let start_at = start_at.to_string();
    let max_results = max_results.to_string();
    let response = self
      .client
      .get(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .query(&[
        ("jql", jql),
        ("startAt", start_at.as_str()),
        ("maxResults", max_results.as_str()),
      ])
      .send()
      .await
      .context("Failed to execute search")?;

    match response.status() {
      StatusCode::OK => {
        let results = response
          .json::<SearchResults>()
          .await
          .context("Failed to parse search results")?;
        Ok(results)
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your tracker credentials."
      )),
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Search rejected, the query may be malformed: {}",
        response.text().await.unwrap_or_default()
      )),
      _ => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        response.status(),
        response.text().await.unwrap_or_default()
      )),
    }
  }
}
