//! # Configuration Management
//!
//! Loads the per-user settings file and exposes it as a typed, immutable
//! [`Config`]. The file is plain JSON at a fixed path in the home directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

use crate::shirts::{StoryPoints, default_shirt_mapping};

/// File name of the per-user settings file, resolved against the home
/// directory.
pub const CONFIG_FILE_NAME: &str = ".sprig_config";

#[derive(Debug, Deserialize)]
struct RawConfig {
  host: String,
  user: String,
  #[serde(default)]
  team: Option<String>,
  #[serde(default)]
  shirts: BTreeMap<String, String>,
}

/// Per-user settings, loaded once per invocation and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Config {
  host: String,
  user: String,
  team: Option<String>,
  shirts: BTreeMap<String, StoryPoints>,
}

impl Config {
  /// Load the configuration from the fixed per-user path.
  pub fn load() -> Result<Self> {
    let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
    Self::from_path(&config_path(base_dirs.home_dir()))
  }

  /// Load the configuration from an explicit file path.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read configuration from {}", path.display()))?;
    Self::from_json(&content)
  }

  /// Parse a configuration document.
  ///
  /// User-supplied shirt values overlay the built-in table; sizes the user
  /// does not mention keep their defaults.
  pub fn from_json(content: &str) -> Result<Self> {
    let raw: RawConfig = serde_json::from_str(content).context("Failed to parse configuration")?;

    let mut shirts = default_shirt_mapping();
    for (label, value) in &raw.shirts {
      let points: StoryPoints = value
        .parse()
        .with_context(|| format!("Invalid story-point value '{value}' for shirt '{label}'"))?;
      shirts.insert(label.trim().to_uppercase(), points);
    }

    Ok(Self {
      host: raw.host.trim_end_matches('/').to_string(),
      user: raw.user,
      team: raw.team,
      shirts,
    })
  }

  /// Tracker base URL, without a trailing slash.
  pub fn host(&self) -> &str {
    &self.host
  }

  /// Tracker account name.
  pub fn user(&self) -> &str {
    &self.user
  }

  /// Optional development-team filter applied by default searches.
  pub fn team(&self) -> Option<&str> {
    self.team.as_deref()
  }

  /// Shirt-size to story-point mapping (defaults overlaid with user values).
  pub fn shirt_mapping(&self) -> &BTreeMap<String, StoryPoints> {
    &self.shirts
  }

  /// Permalink for an issue key.
  pub fn browse_url(&self, issue_key: &str) -> String {
    format!("{}/browse/{}", self.host, issue_key)
  }
}

/// Path of the settings file under the given home directory.
pub fn config_path(home: &Path) -> PathBuf {
  home.join(CONFIG_FILE_NAME)
}
