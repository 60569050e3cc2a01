//! # Git Operations
//!
//! Repository detection and the branch operations the branch workflow needs:
//! branch lookup (local and remote-tracked), safe checkout, base-branch
//! fast-forward sync, and branch creation from HEAD.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::build::CheckoutBuilder;
use git2::{BranchType, FetchOptions, Repository};

/// Detect if the current directory or any parent directory is a Git
/// repository.
pub fn detect_repository() -> Option<PathBuf> {
  let current_dir = env::current_dir().ok()?;
  detect_repository_from_path(&current_dir)
}

/// Detect if the given path or any parent directory is a Git repository.
pub fn detect_repository_from_path<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
  match Repository::discover(path.as_ref()) {
    Ok(repo) => repo.workdir().map(|workdir| workdir.to_path_buf()),
    Err(_) => None,
  }
}

/// Open the repository at the given working directory.
pub fn open_repository<P: AsRef<Path>>(path: P) -> Result<Repository> {
  Repository::open(path.as_ref()).context("Failed to open Git repository")
}

/// Base name of the repository working directory, used as the default
/// title-search pattern.
pub fn repository_name(repo: &Repository) -> Result<String> {
  let workdir = repo
    .workdir()
    .ok_or_else(|| anyhow::anyhow!("Repository has no working directory"))?;

  workdir
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .ok_or_else(|| anyhow::anyhow!("Failed to determine repository name"))
}

/// Check whether a branch exists locally or as an `origin/`-tracked remote
/// branch.
pub fn branch_exists(repo: &Repository, branch_name: &str) -> bool {
  repo.find_branch(branch_name, BranchType::Local).is_ok()
    || repo.find_branch(&format!("origin/{branch_name}"), BranchType::Remote).is_ok()
}

/// Checkout a branch by name.
///
/// When only the remote-tracked branch exists, a local tracking branch is
/// created first. The checkout is the safe kind: local modifications that
/// would be overwritten make it fail rather than lose work.
pub fn checkout_branch(repo: &Repository, branch_name: &str) -> Result<()> {
  if repo.find_branch(branch_name, BranchType::Local).is_err() {
    let remote_branch_name = format!("origin/{branch_name}");
    let remote_branch = repo
      .find_branch(&remote_branch_name, BranchType::Remote)
      .with_context(|| format!("Branch '{branch_name}' not found"))?;

    let commit = remote_branch
      .get()
      .peel_to_commit()
      .with_context(|| format!("Failed to resolve commit for '{remote_branch_name}'"))?;

    let mut local_branch = repo
      .branch(branch_name, &commit, false)
      .with_context(|| format!("Failed to create local branch '{branch_name}' from origin"))?;
    local_branch
      .set_upstream(Some(&remote_branch_name))
      .with_context(|| format!("Failed to set upstream for '{branch_name}'"))?;
  }

  let branch = repo
    .find_branch(branch_name, BranchType::Local)
    .with_context(|| format!("Branch '{branch_name}' not found"))?;

  let target = branch
    .get()
    .target()
    .ok_or_else(|| anyhow::anyhow!("Branch '{branch_name}' has no target commit"))?;

  let object = repo.find_object(target, None)?;
  let mut builder = CheckoutBuilder::new();
  repo
    .checkout_tree(&object, Some(&mut builder))
    .with_context(|| format!("Failed to checkout branch '{branch_name}'"))?;

  repo
    .set_head(&format!("refs/heads/{branch_name}"))
    .with_context(|| format!("Failed to set HEAD to branch '{branch_name}'"))?;

  Ok(())
}

/// Fetch the base branch from origin, check it out and fast-forward it to
/// `origin/<base>`.
///
/// Anything that prevents a clean fast-forward (diverged history, dirty
/// working tree, missing remote) surfaces as an error so the caller can fall
/// back to branching from the current HEAD.
pub fn sync_base_branch(repo: &Repository, base_branch: &str) -> Result<()> {
  let mut remote = repo.find_remote("origin").context("Remote 'origin' not found")?;
  let mut fetch_options = FetchOptions::new();
  let refspec = format!("refs/heads/{base_branch}:refs/remotes/origin/{base_branch}");
  remote
    .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)
    .with_context(|| format!("Failed to fetch '{base_branch}' from origin"))?;

  checkout_branch(repo, base_branch)?;

  let upstream = repo
    .find_branch(&format!("origin/{base_branch}"), BranchType::Remote)
    .with_context(|| format!("Remote branch 'origin/{base_branch}' not found"))?;
  let annotated = repo.reference_to_annotated_commit(upstream.get())?;

  let (analysis, _) = repo.merge_analysis(&[&annotated])?;
  if analysis.is_up_to_date() {
    return Ok(());
  }
  if !analysis.is_fast_forward() {
    return Err(anyhow::anyhow!(
      "Branch '{base_branch}' cannot be fast-forwarded to 'origin/{base_branch}'"
    ));
  }

  // The working tree moves first: a safe checkout against the current HEAD
  // refuses to clobber local modifications, so the ref is only advanced once
  // the tree is known clean.
  let target = repo.find_object(annotated.id(), None)?;
  repo
    .checkout_tree(&target, Some(&mut CheckoutBuilder::new()))
    .with_context(|| format!("Failed to update working tree for '{base_branch}'"))?;

  let mut reference = repo.find_reference(&format!("refs/heads/{base_branch}"))?;
  reference.set_target(annotated.id(), "fast-forward")?;
  repo.set_head(&format!("refs/heads/{base_branch}"))?;

  Ok(())
}

/// Create a branch at the current HEAD and switch to it.
pub fn create_branch_from_head(repo: &Repository, branch_name: &str) -> Result<()> {
  let head_commit = repo
    .head()
    .context("Failed to resolve HEAD")?
    .peel_to_commit()
    .context("Failed to resolve HEAD commit")?;

  repo
    .branch(branch_name, &head_commit, false)
    .with_context(|| format!("Failed to create branch '{branch_name}'"))?;

  checkout_branch(repo, branch_name)
}

#[cfg(test)]
mod tests {
  use sprig_test_utils::{GitRepoTestGuard, create_commit};
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_detect_repository() {
    let temp_dir = TempDir::new().unwrap();
    assert!(detect_repository_from_path(temp_dir.path()).is_none());

    Repository::init(temp_dir.path()).unwrap();
    let detected = detect_repository_from_path(temp_dir.path()).unwrap();
    assert_eq!(
      std::fs::canonicalize(detected).unwrap(),
      std::fs::canonicalize(temp_dir.path()).unwrap()
    );
  }

  #[test]
  fn test_repository_name_is_workdir_basename() {
    let guard = GitRepoTestGuard::new();
    let name = repository_name(&guard.repo).unwrap();
    let expected = guard.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(name, expected);
  }

  #[test]
  fn test_branch_exists_local_and_remote() {
    let guard = GitRepoTestGuard::new();
    create_commit(&guard.repo, "a.txt", "a", "initial commit").unwrap();

    assert!(!branch_exists(&guard.repo, "HH-123"));

    let head_commit = guard.repo.head().unwrap().peel_to_commit().unwrap();
    guard.repo.branch("HH-123", &head_commit, false).unwrap();
    assert!(branch_exists(&guard.repo, "HH-123"));

    // A remote-tracked ref alone also counts.
    guard
      .repo
      .reference("refs/remotes/origin/HH-456", head_commit.id(), true, "test remote ref")
      .unwrap();
    assert!(branch_exists(&guard.repo, "HH-456"));
  }

  #[test]
  fn test_create_branch_from_head_switches_to_it() {
    let guard = GitRepoTestGuard::new();
    create_commit(&guard.repo, "a.txt", "a", "initial commit").unwrap();

    create_branch_from_head(&guard.repo, "HH-123").unwrap();
    assert_eq!(guard.repo.head().unwrap().shorthand(), Some("HH-123"));
  }

  #[test]
  fn test_checkout_branch_creates_local_tracking_branch() {
    let guard = GitRepoTestGuard::new();
    create_commit(&guard.repo, "a.txt", "a", "initial commit").unwrap();
    let head_commit = guard.repo.head().unwrap().peel_to_commit().unwrap();

    guard.repo.remote("origin", "https://example.com/repo.git").unwrap();
    guard
      .repo
      .reference("refs/remotes/origin/HH-789", head_commit.id(), true, "test remote ref")
      .unwrap();

    checkout_branch(&guard.repo, "HH-789").unwrap();

    assert_eq!(guard.repo.head().unwrap().shorthand(), Some("HH-789"));
    let local = guard.repo.find_branch("HH-789", BranchType::Local).unwrap();
    assert_eq!(local.upstream().unwrap().name().unwrap(), Some("origin/HH-789"));
  }

  #[test]
  fn test_sync_base_branch_fast_forwards() {
    // Upstream repository with one commit.
    let upstream = GitRepoTestGuard::new();
    create_commit(&upstream.repo, "a.txt", "a", "initial commit").unwrap();
    let base = upstream.repo.head().unwrap().shorthand().unwrap().to_string();

    // Local clone, then the upstream moves ahead.
    let clone_dir = TempDir::new().unwrap();
    let clone = Repository::clone(&upstream.path().to_string_lossy(), clone_dir.path()).unwrap();
    create_commit(&upstream.repo, "b.txt", "b", "second commit").unwrap();

    sync_base_branch(&clone, &base).unwrap();

    let upstream_tip = upstream.repo.head().unwrap().target().unwrap();
    assert_eq!(clone.head().unwrap().target().unwrap(), upstream_tip);
    assert_eq!(clone.head().unwrap().shorthand(), Some(base.as_str()));
  }

  #[test]
  fn test_sync_base_branch_fails_without_origin() {
    let guard = GitRepoTestGuard::new();
    create_commit(&guard.repo, "a.txt", "a", "initial commit").unwrap();

    let result = sync_base_branch(&guard.repo, "master");
    assert!(result.is_err());
  }
}
