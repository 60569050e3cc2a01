use serde::{Deserialize, Serialize};

/// Represents tracker authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

/// Represents a tracker issue
#[derive(Debug, Deserialize)]
pub struct JiraIssue {
  #[allow(dead_code)]
  pub id: String,
  pub key: String,
  pub fields: JiraIssueFields,
}

/// Represents tracker issue fields
#[derive(Debug, Deserialize)]
pub struct JiraIssueFields {
  pub summary: String,
  #[serde(default)]
  pub description: Option<String>,
  pub status: JiraIssueStatus,
  #[serde(default, rename = "issuelinks")]
  pub issue_links: Vec<JiraIssueLink>,
}

/// Represents a tracker issue status
#[derive(Debug, Deserialize)]
pub struct JiraIssueStatus {
  #[allow(dead_code)]
  pub id: Option<String>,
  pub name: String,
}

/// Represents one entry of an issue's link list
#[derive(Debug, Deserialize)]
pub struct JiraIssueLink {
  #[serde(default, rename = "outwardIssue")]
  pub outward_issue: Option<LinkedIssue>,
}

/// Represents the abbreviated issue embedded in a link entry
#[derive(Debug, Deserialize)]
pub struct LinkedIssue {
  pub key: String,
  pub fields: LinkedIssueFields,
}

/// Represents the fields of a linked issue
#[derive(Debug, Deserialize)]
pub struct LinkedIssueFields {
  pub summary: String,
}

/// Represents the currently authenticated tracker user
#[derive(Debug, Deserialize)]
pub struct JiraUser {
  pub name: String,
  #[serde(rename = "displayName")]
  pub display_name: String,
  #[serde(default, rename = "emailAddress")]
  pub email_address: Option<String>,
}

/// Represents one page of JQL search results
#[derive(Debug, Deserialize)]
pub struct SearchResults {
  #[serde(rename = "startAt")]
  pub start_at: u64,
  #[serde(rename = "maxResults")]
  pub max_results: u64,
  pub total: u64,
  pub issues: Vec<JiraIssue>,
}

/// Represents the tracker's response to issue creation
#[derive(Debug, Deserialize)]
pub struct CreatedIssue {
  pub id: String,
  pub key: String,
  #[serde(rename = "self")]
  pub self_url: String,
}

/// Request payload for creating an issue
#[derive(Debug, Clone)]
pub struct NewIssue {
  pub project: String,
  pub issue_type: String,
  pub summary: String,
  pub description: Option<String>,
  /// Custom fields merged verbatim into the creation payload.
  pub custom_fields: serde_json::Map<String, serde_json::Value>,
}

impl NewIssue {
  pub fn new(project: &str, issue_type: &str, summary: &str) -> Self {
    Self {
      project: project.to_string(),
      issue_type: issue_type.to_string(),
      summary: summary.to_string(),
      description: None,
      custom_fields: serde_json::Map::new(),
    }
  }
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
  pub transition: TransitionId,
}

/// Represents a transition ID for the request
#[derive(Debug, Serialize)]
pub struct TransitionId {
  pub id: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_jira_issue_deserialization() {
    let json = json!({
        "id": "10000",
        "key": "HH-123",
        "fields": {
            "summary": "Test issue",
            "description": "This is a test issue",
            "status": {
                "name": "In Progress"
            }
        }
    });

    let issue: JiraIssue = serde_json::from_value(json).unwrap();

    assert_eq!(issue.id, "10000");
    assert_eq!(issue.key, "HH-123");
    assert_eq!(issue.fields.summary, "Test issue");
    assert_eq!(issue.fields.description, Some("This is a test issue".to_string()));
    assert_eq!(issue.fields.status.name, "In Progress");
    assert!(issue.fields.issue_links.is_empty());
  }

  #[test]
  fn test_issue_links_deserialization() {
    let json = json!({
        "id": "10000",
        "key": "PORTFOLIO-1",
        "fields": {
            "summary": "Portfolio",
            "status": { "name": "Open" },
            "issuelinks": [
                {
                    "outwardIssue": {
                        "key": "HH-2",
                        "fields": { "summary": "Task A" }
                    }
                },
                {
                    "inwardIssue": {
                        "key": "HH-3",
                        "fields": { "summary": "Unrelated inward link" }
                    }
                }
            ]
        }
    });

    let issue: JiraIssue = serde_json::from_value(json).unwrap();
    let outward: Vec<_> = issue
      .fields
      .issue_links
      .iter()
      .filter_map(|link| link.outward_issue.as_ref())
      .collect();

    assert_eq!(outward.len(), 1);
    assert_eq!(outward[0].key, "HH-2");
    assert_eq!(outward[0].fields.summary, "Task A");
  }

  #[test]
  fn test_search_results_deserialization() {
    let json = json!({
        "startAt": 0,
        "maxResults": 10,
        "total": 1,
        "issues": [{
            "id": "1",
            "key": "HH-1",
            "fields": { "summary": "Only hit", "status": { "name": "Open" } }
        }]
    });

    let results: SearchResults = serde_json::from_value(json).unwrap();
    assert_eq!(results.total, 1);
    assert_eq!(results.issues[0].key, "HH-1");
  }

  #[test]
  fn test_transition_request_serialization() {
    let request = TransitionRequest {
      transition: TransitionId { id: "4".to_string() },
    };

    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(
      json,
      json!({
          "transition": {
              "id": "4"
          }
      })
    );
  }
}
