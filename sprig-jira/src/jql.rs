//! # JQL Query Builder
//!
//! Translates a structured set of filter options into a JQL predicate
//! string. One clause per active filter dimension, AND-joined in a fixed
//! order, always suffixed with the descending-by-creation-date directive.

use std::collections::BTreeSet;

/// Alias tokens that expand to a group of literal status names.
pub const STATUS_ALIASES: [(&str, &[&str]); 2] = [
  ("finished", &["Closed", "Fixed", "Merged To RC", "Released", "Resolved"]),
  ("active", &["In Progress", "Need Review", "Open", "Reopened"]),
];

/// Scope fields used when `my` is requested without explicit fields.
const DEFAULT_SCOPE_FIELDS: [&str; 2] = ["assignee", "reporter"];

/// Ordering directive appended to every query.
const ORDER_SUFFIX: &str = "ORDER BY created DESC";

/// A structured search filter, translated to JQL by [`SearchFilter::build`].
///
/// Statuses prefixed with `!` are exclusions; both lists accept alias tokens
/// from [`STATUS_ALIASES`].
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
  /// `None` — no scope clause; `Some(vec![])` — default assignee-or-reporter
  /// scope; explicit fields otherwise.
  pub my: Option<Vec<String>>,
  pub types: Vec<String>,
  pub statuses: Vec<String>,
  pub search: Option<String>,
  pub title: Option<String>,
  pub teams: Vec<String>,
}

impl SearchFilter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build the JQL string for the given current user.
  pub fn build(&self, user: &str) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(fields) = &self.my {
      let fields: Vec<&str> = if fields.is_empty() {
        DEFAULT_SCOPE_FIELDS.to_vec()
      } else {
        fields.iter().map(String::as_str).collect()
      };
      let scope = fields
        .iter()
        .map(|field| format!("{field} = {user}"))
        .collect::<Vec<_>>()
        .join(" or ");
      clauses.push(format!("({scope})"));
    }

    if !self.types.is_empty() {
      clauses.push(format!("project in ({})", quote_list(self.types.iter().map(String::as_str))));
    }

    let included = expand_aliases(
      self
        .statuses
        .iter()
        .map(String::as_str)
        .filter(|status| !status.starts_with('!')),
    );
    if !included.is_empty() {
      clauses.push(format!(
        "status in ({})",
        quote_list(included.iter().map(String::as_str))
      ));
    }

    let excluded = expand_aliases(
      self
        .statuses
        .iter()
        .filter_map(|status| status.strip_prefix('!')),
    );
    if !excluded.is_empty() {
      clauses.push(format!(
        "status not in ({})",
        quote_list(excluded.iter().map(String::as_str))
      ));
    }

    if let Some(search) = &self.search {
      clauses.push(format!("(text ~ {search} or labels = {search})"));
    }

    if let Some(title) = &self.title {
      clauses.push(format!("(summary ~ \"{title}\")"));
    }

    if !self.teams.is_empty() {
      clauses.push(format!(
        "\"Development Team\" in ({})",
        quote_list(self.teams.iter().map(String::as_str))
      ));
    }

    let predicate = clauses.join(" and ");
    format!("{predicate} {ORDER_SUFFIX}").trim().to_string()
  }
}

/// Expand alias tokens and deduplicate; the result iterates in sorted order
/// so built queries are deterministic.
fn expand_aliases<'a>(statuses: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
  let mut expanded = BTreeSet::new();
  for status in statuses {
    match STATUS_ALIASES.iter().find(|(alias, _)| *alias == status) {
      Some((_, members)) => expanded.extend(members.iter().map(|member| (*member).to_string())),
      None => {
        expanded.insert(status.to_string());
      }
    }
  }
  expanded
}

fn quote_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
  items.map(|item| format!("\"{item}\"")).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_filter_yields_only_ordering_directive() {
    let filter = SearchFilter::new();
    assert_eq!(filter.build("dev"), "ORDER BY created DESC");
  }

  #[test]
  fn test_my_scope_defaults_to_assignee_or_reporter() {
    let filter = SearchFilter {
      my: Some(vec![]),
      ..Default::default()
    };
    assert_eq!(
      filter.build("dev"),
      "(assignee = dev or reporter = dev) ORDER BY created DESC"
    );
  }

  #[test]
  fn test_single_scope_field_collapses_to_one_test() {
    let filter = SearchFilter {
      my: Some(vec!["assignee".to_string()]),
      ..Default::default()
    };
    assert_eq!(filter.build("dev"), "(assignee = dev) ORDER BY created DESC");
  }

  #[test]
  fn test_all_dimensions_join_in_fixed_order() {
    let filter = SearchFilter {
      my: Some(vec![]),
      types: vec!["HH".to_string(), "PORTFOLIO".to_string()],
      statuses: vec!["Open".to_string(), "!Closed".to_string()],
      search: Some("payments".to_string()),
      title: Some("checkout".to_string()),
      teams: vec!["search".to_string()],
    };

    assert_eq!(
      filter.build("dev"),
      "(assignee = dev or reporter = dev) \
       and project in (\"HH\",\"PORTFOLIO\") \
       and status in (\"Open\") \
       and status not in (\"Closed\") \
       and (text ~ payments or labels = payments) \
       and (summary ~ \"checkout\") \
       and \"Development Team\" in (\"search\") \
       ORDER BY created DESC"
    );
  }

  #[test]
  fn test_alias_expansion_in_inclusion() {
    let filter = SearchFilter {
      statuses: vec!["finished".to_string()],
      ..Default::default()
    };

    let query = filter.build("dev");
    assert_eq!(
      query,
      "status in (\"Closed\",\"Fixed\",\"Merged To RC\",\"Released\",\"Resolved\") ORDER BY created DESC"
    );
    assert!(!query.contains("finished"));
  }

  #[test]
  fn test_alias_expansion_in_exclusion() {
    let filter = SearchFilter {
      statuses: vec!["!finished".to_string()],
      ..Default::default()
    };

    let query = filter.build("dev");
    assert_eq!(
      query,
      "status not in (\"Closed\",\"Fixed\",\"Merged To RC\",\"Released\",\"Resolved\") ORDER BY created DESC"
    );
    assert!(!query.contains("finished"));
  }

  #[test]
  fn test_alias_members_merge_with_literals() {
    let filter = SearchFilter {
      statuses: vec!["active".to_string(), "Blocked".to_string(), "!Closed".to_string()],
      ..Default::default()
    };

    assert_eq!(
      filter.build("dev"),
      "status in (\"Blocked\",\"In Progress\",\"Need Review\",\"Open\",\"Reopened\") \
       and status not in (\"Closed\") \
       ORDER BY created DESC"
    );
  }

  #[test]
  fn test_every_alias_expands_to_its_member_set() {
    for (alias, members) in STATUS_ALIASES {
      let filter = SearchFilter {
        statuses: vec![alias.to_string()],
        ..Default::default()
      };
      let query = filter.build("dev");
      assert!(!query.contains(alias), "alias token leaked into query: {query}");
      for member in members {
        assert!(query.contains(member), "missing '{member}' in: {query}");
      }
    }
  }
}
