//! # Issue Endpoints
//!
//! Endpoint implementations for fetching, creating, and updating issues.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;

use crate::client::JiraClient;
use crate::models::{CreatedIssue, JiraIssue, NewIssue};

impl JiraClient {
  /// Get an issue by key
  pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue> {
    let url = format!("{}/rest/api/2/issue/{}", self.base_url, issue_key);

    let response = self
      .client
      .get(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .send()
      .await
      .context("Failed to fetch issue")?;

    match response.status() {
      StatusCode::OK => {
        let issue = response.json::<JiraIssue>().await.context("Failed to parse issue")?;
        Ok(issue)
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your tracker credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Issue {} not found", issue_key)),
      _ => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        response.status(),
        response.text().await.unwrap_or_default()
      )),
    }
  }

  /// Create an issue
  pub async fn create_issue(&self, new_issue: &NewIssue) -> Result<CreatedIssue> {
    let url = format!("{}/rest/api/2/issue", self.base_url);

    let mut fields = serde_json::Map::new();
    fields.insert("project".to_string(), json!({ "key": new_issue.project }));
    fields.insert("issuetype".to_string(), json!({ "name": new_issue.issue_type }));
    fields.insert("summary".to_string(), json!(new_issue.summary));
    if let Some(description) = &new_issue.description {
      fields.insert("description".to_string(), json!(description));
    }
    for (field, value) in &new_issue.custom_fields {
      fields.insert(field.clone(), value.clone());
    }

    let response = self
      .client
      .post(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .json(&json!({ "fields": fields }))
      .send()
      .await
      .context("Failed to create issue")?;

    match response.status() {
      StatusCode::CREATED | StatusCode::OK => {
        let created = response
          .json::<CreatedIssue>()
          .await
          .context("Failed to parse created issue")?;
        Ok(created)
      }
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your tracker credentials."
      )),
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Issue creation rejected: {}",
        response.text().await.unwrap_or_default()
      )),
      _ => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        response.status(),
        response.text().await.unwrap_or_default()
      )),
    }
  }

  /// Update fields of an existing issue
  pub async fn update_issue_fields(&self, issue_key: &str, fields: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
    let url = format!("{}/rest/api/2/issue/{}", self.base_url, issue_key);

    let response = self
      .client
      .put(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .json(&json!({ "fields": fields }))
      .send()
      .await
      .context("Failed to update issue")?;

    match response.status() {
      StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your tracker credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Issue {} not found", issue_key)),
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Issue update rejected: {}",
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
