//! Git repository management for testing
//!
//! Creates temporary git repositories, optionally switching the current
//! working directory into them for the duration of a test.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::Result;
use git2::{Repository, Signature};
use tempfile::TempDir;

/// A test guard that creates a temporary git repository and optionally
/// changes the current working directory to that repository. The original
/// working directory is restored when the guard is dropped.
pub struct GitRepoTestGuard {
  /// The temporary directory containing the git repository
  pub temp_dir: TempDir,
  /// The git repository
  pub repo: Repository,
  /// The original working directory, if changed
  original_dir: Option<PathBuf>,
}

impl GitRepoTestGuard {
  /// Create a new test git repository without changing the current working
  /// directory
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let repo = Repository::init(temp_dir.path()).expect("Failed to initialize git repository");

    let mut config = repo.config().expect("Failed to get repository config");
    config
      .set_str("user.name", "Sprig Test User")
      .expect("Failed to set user.name");
    config
      .set_str("user.email", "sprig-test@example.com")
      .expect("Failed to set user.email");

    Self {
      temp_dir,
      repo,
      original_dir: None,
    }
  }

  /// Create a new test git repository and change the current working
  /// directory to it
  pub fn new_and_change_dir() -> Self {
    let mut guard = Self::new();
    guard.change_dir();
    guard
  }

  /// Get the path to the git repository
  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Change the current working directory to the git repository
  pub fn change_dir(&mut self) {
    if self.original_dir.is_some() {
      return;
    }

    let original_dir = env::current_dir().expect("Failed to get current directory");
    env::set_current_dir(self.temp_dir.path()).expect("Failed to change current directory");
    self.original_dir = Some(original_dir);
  }

  /// Restore the original working directory if it was changed
  pub fn restore_dir(&mut self) {
    if let Some(original_dir) = self.original_dir.take() {
      env::set_current_dir(original_dir).expect("Failed to restore original directory");
    }
  }
}

impl Default for GitRepoTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for GitRepoTestGuard {
  fn drop(&mut self) {
    self.restore_dir();
  }
}

/// Helper function to create a commit in a repository
pub fn create_commit(repo: &Repository, file_name: &str, content: &str, message: &str) -> Result<()> {
  let repo_path = repo
    .workdir()
    .ok_or_else(|| anyhow::anyhow!("Repository has no working directory"))?;
  fs::write(repo_path.join(file_name), content)?;

  let mut index = repo.index()?;
  index.add_path(Path::new(file_name))?;
  index.write()?;

  let tree_id = index.write_tree()?;
  let tree = repo.find_tree(tree_id)?;
  let signature = Signature::now("Sprig Test User", "sprig-test@example.com")?;

  let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
  match parent {
    Some(parent) => {
      repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;
    }
    None => {
      repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])?;
    }
  }

  Ok(())
}
