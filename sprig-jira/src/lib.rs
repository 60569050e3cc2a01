//! # Tracker API Client
//!
//! REST API integration for the issue tracker: issue lookup, JQL search,
//! issue creation and linking, field updates, and status transitions, plus
//! the JQL query builder used by the search workflow.

pub mod auth;
mod client;
mod endpoints;
pub mod jql;
pub mod models;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
// Re-export models
pub use jql::SearchFilter;
pub use models::{
  CreatedIssue, JiraAuth, JiraIssue, JiraIssueFields, JiraIssueStatus, JiraUser, NewIssue, SearchResults,
  TransitionId, TransitionRequest,
};
