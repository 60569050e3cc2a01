//! # Sprig Core Library
//!
//! Core library for the sprig workspace providing the typed per-user
//! configuration, credential lookup, git operations for the branch workflow,
//! decomposition-table parsing, and shirt-size arithmetic.

pub mod config;
pub mod creds;
pub mod decomposition;
pub mod git;
pub mod output;
pub mod portfolio;
pub mod shirts;

// Re-export main types for the CLI and client crates
pub use config::Config;
pub use creds::Credentials;
pub use decomposition::{DecompositionError, DecompositionTable, TaskKind, sanitize};
pub use output::{print_error, print_info, print_success, print_warning};
pub use shirts::{SHIRT_ORDER, ShirtAggregate, StoryPoints};
