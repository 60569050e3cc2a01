//! Test utilities shared across the sprig workspace
//!
//! Provides temporary git repositories and commit helpers for tests that
//! exercise the branch workflow.
//!
//! The dead_code lint is disabled for this crate because test utilities may
//! not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod git;

pub use git::{GitRepoTestGuard, create_commit};
