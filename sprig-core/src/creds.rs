//! # Credential Lookup
//!
//! Resolves the tracker account secret from the user's `.netrc` file, keyed
//! by the configured tracker host with a fixed service-name fallback. The
//! file is treated as read-only at runtime.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Fallback machine name consulted when the host has no `.netrc` entry.
pub const SERVICE_MACHINE: &str = "sprig";

/// Credentials for the tracker account
#[derive(Debug, Clone)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Path of the `.netrc` file under the given home directory.
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Reduce a host URL to the bare machine name used in `.netrc` entries:
/// scheme, port and path are stripped.
pub fn normalize_host(host: &str) -> String {
  let host = host
    .trim()
    .trim_start_matches("https://")
    .trim_start_matches("http://");
  let host = host.split('/').next().unwrap_or(host);
  host.split(':').next().unwrap_or(host).to_string()
}

/// Find credentials for one machine in a `.netrc` file.
///
/// Both the single-line and the multi-line entry layout are accepted; an
/// entry missing `login` or `password` is treated as absent.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = fs::read_to_string(path).context("Failed to read .netrc file")?;

  let mut tokens = content.split_whitespace();
  let mut machine: Option<String> = None;
  let mut username: Option<String> = None;
  let mut password: Option<String> = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        if machine.as_deref() == Some(target_machine)
          && let (Some(username), Some(password)) = (&username, &password)
        {
          return Ok(Some(Credentials {
            username: username.clone(),
            password: password.clone(),
          }));
        }
        machine = tokens.next().map(str::to_string);
        username = None;
        password = None;
      }
      "login" => username = tokens.next().map(str::to_string),
      "password" => password = tokens.next().map(str::to_string),
      _ => {}
    }
  }

  if machine.as_deref() == Some(target_machine)
    && let (Some(username), Some(password)) = (username, password)
  {
    return Ok(Some(Credentials { username, password }));
  }

  Ok(None)
}

/// Retrieve tracker credentials for the configured host.
///
/// The normalized host is looked up first, then the fixed
/// [`SERVICE_MACHINE`] entry.
pub fn lookup_credentials(home: &Path, host: &str) -> Result<Credentials> {
  let netrc_path = get_netrc_path(home);
  let machine = normalize_host(host);

  if netrc_path.exists() {
    if let Some(creds) = parse_netrc_file(&netrc_path, &machine)? {
      return Ok(creds);
    }
    if let Some(creds) = parse_netrc_file(&netrc_path, SERVICE_MACHINE)? {
      return Ok(creds);
    }
  }

  Err(anyhow::anyhow!(
    "Tracker credentials not found in .netrc. Please add credentials for machine '{machine}' or '{SERVICE_MACHINE}'."
  ))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  fn write_netrc(home: &Path, content: &str) {
    fs::write(get_netrc_path(home), content).unwrap();
  }

  #[test]
  fn test_normalize_host() {
    assert_eq!(normalize_host("https://tracker.example.com"), "tracker.example.com");
    assert_eq!(normalize_host("http://tracker.example.com/"), "tracker.example.com");
    assert_eq!(normalize_host("tracker.example.com:8443/jira"), "tracker.example.com");
    assert_eq!(normalize_host("  tracker.example.com  "), "tracker.example.com");
  }

  #[test]
  fn test_lookup_by_host_machine() {
    let home = TempDir::new().unwrap();
    write_netrc(
      home.path(),
      "machine tracker.example.com\n  login dev\n  password hunter2\n",
    );

    let creds = lookup_credentials(home.path(), "https://tracker.example.com").unwrap();
    assert_eq!(creds.username, "dev");
    assert_eq!(creds.password, "hunter2");
  }

  #[test]
  fn test_lookup_falls_back_to_service_machine() {
    let home = TempDir::new().unwrap();
    write_netrc(home.path(), "machine sprig login dev password hunter2\n");

    let creds = lookup_credentials(home.path(), "https://tracker.example.com").unwrap();
    assert_eq!(creds.username, "dev");
    assert_eq!(creds.password, "hunter2");
  }

  #[test]
  fn test_lookup_prefers_host_over_fallback() {
    let home = TempDir::new().unwrap();
    write_netrc(
      home.path(),
      "machine sprig login fallback password f\nmachine tracker.example.com login dev password d\n",
    );

    let creds = lookup_credentials(home.path(), "tracker.example.com").unwrap();
    assert_eq!(creds.username, "dev");
  }

  #[test]
  fn test_missing_credentials_error_names_both_machines() {
    let home = TempDir::new().unwrap();
    write_netrc(home.path(), "machine elsewhere.example.com login x password y\n");

    let error = lookup_credentials(home.path(), "tracker.example.com")
      .unwrap_err()
      .to_string();
    assert!(error.contains("tracker.example.com"));
    assert!(error.contains(SERVICE_MACHINE));
  }

  #[test]
  fn test_incomplete_entry_is_skipped() {
    let home = TempDir::new().unwrap();
    write_netrc(home.path(), "machine tracker.example.com\n  login dev\n");

    assert!(lookup_credentials(home.path(), "tracker.example.com").is_err());
  }
}
