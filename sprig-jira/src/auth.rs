//! Authentication helpers for the tracker client.
//!
//! Centralizes credential lookup and runtime construction so every command
//! handler builds its client the same way: the configured account name plus
//! the secret resolved from the credential store.

use std::path::Path;

use anyhow::{Context, Result};
use sprig_core::config::Config;
use sprig_core::creds::lookup_credentials;
use tokio::runtime::Runtime;

use crate::{JiraClient, create_jira_client};

/// Creates an authenticated tracker client for the configured host.
pub fn create_client_from_config(home: &Path, config: &Config) -> Result<JiraClient> {
  let credentials = lookup_credentials(home, config.host()).context("Failed to get tracker credentials")?;

  create_jira_client(config.host(), config.user(), &credentials.password)
}

/// Creates a tokio runtime and an authenticated tracker client.
pub fn create_runtime_and_client(home: &Path, config: &Config) -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = create_client_from_config(home, config)?;
  Ok((rt, client))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_create_client_from_config() {
    let home = TempDir::new().unwrap();
    fs::write(
      home.path().join(".netrc"),
      "machine tracker.example.com login dev password hunter2\n",
    )
    .unwrap();

    let config = Config::from_json(r#"{"host": "https://tracker.example.com", "user": "dev"}"#).unwrap();
    let client = create_client_from_config(home.path(), &config).unwrap();
    assert_eq!(client.base_url(), "https://tracker.example.com");
  }

  #[test]
  fn test_missing_credentials_fail() {
    let home = TempDir::new().unwrap();
    let config = Config::from_json(r#"{"host": "https://tracker.example.com", "user": "dev"}"#).unwrap();

    assert!(create_client_from_config(home.path(), &config).is_err());
  }
}
