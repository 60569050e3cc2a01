//! # Issue Link Endpoint
//!
//! Creates links between issues, used to attach new subtasks to their
//! portfolio.

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;

use crate::client::JiraClient;

impl JiraClient {
  /// Link two issues. The outward side is the linked issue as seen from the
  /// inward issue's link list.
  pub async fn link_issues(&self, link_type: &str, inward_key: &str, outward_key: &str) -> Result<()> {
    let url = format!("{}/rest/api/2/issueLink", self.base_url);

    let payload = json!({
        "type": { "name": link_type },
        "inwardIssue": { "key": inward_key },
        "outwardIssue": { "key": outward_key },
    });

    let response = self
      .client
      .post(&url)
      .basic_auth(&self.auth.username, Some(&self.auth.api_token))
      .json(&payload)
      .send()
      .await
      .context("Failed to link issues")?;

    match response.status() {
      StatusCode::CREATED | StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your tracker credentials."
      )),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!(
        "Cannot link {} to {}: issue or link type not found",
        outward_key,
        inward_key
      )),
      _ => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        response.status(),
        response.text().await.unwrap_or_default()
      )),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{basic_auth, body_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::client::JiraClient;
  use crate::models::JiraAuth;

  #[tokio::test]
  async fn test_link_issues() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = JiraClient::new(
      &mock_server.uri(),
      JiraAuth {
        username: "test_user".to_string(),
        api_token: "test_token".to_string(),
      },
    );

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issueLink"))
      .and(basic_auth("test_user", "test_token"))
      .and(body_json(json!({
          "type": { "name": "Inclusion" },
          "inwardIssue": { "key": "PORTFOLIO-1" },
          "outwardIssue": { "key": "HH-42" },
      })))
      .respond_with(ResponseTemplate::new(201))
      .mount(&mock_server)
      .await;

    client.link_issues("Inclusion", "PORTFOLIO-1", "HH-42").await?;

    Ok(())
  }
}
