//! # Portfolio Identifiers
//!
//! Normalizes the portfolio argument of the subtask workflow. Users paste
//! whatever they have at hand: a full key, a bare issue number, or a browse
//! permalink; all of them resolve to the canonical `PORTFOLIO-<n>` key.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Project key of portfolio issues.
pub const PORTFOLIO_PROJECT: &str = "PORTFOLIO";

static KEY_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([A-Za-z]{2,})-(\d+)$").expect("Failed to compile portfolio key regex"));

/// Errors that can occur while normalizing a portfolio identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortfolioIdError {
  #[error("'{0}' is not a portfolio key, issue number or permalink")]
  InvalidFormat(String),
}

/// Normalize a portfolio identifier to a canonical issue key.
///
/// Accepts `PORTFOLIO-123` (any case), a bare number (`123`), or a browse
/// URL whose last path segment is the key.
pub fn normalize_portfolio_key(input: &str) -> Result<String, PortfolioIdError> {
  let input = input.trim().trim_end_matches('/');

  let candidate = match input.rsplit_once('/') {
    Some((_, segment)) if input.contains("://") || input.contains("/browse/") => segment,
    _ => input,
  };

  if candidate.chars().all(|c| c.is_ascii_digit()) && !candidate.is_empty() {
    return Ok(format!("{PORTFOLIO_PROJECT}-{candidate}"));
  }

  if let Some(captures) = KEY_PATTERN.captures(candidate) {
    let project = captures
      .get(1)
      .map(|m| m.as_str().to_uppercase())
      .unwrap_or_default();
    let number = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    return Ok(format!("{project}-{number}"));
  }

  Err(PortfolioIdError::InvalidFormat(input.to_string()))
}
