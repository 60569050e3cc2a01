//! # Decomposition Tables
//!
//! Locates the decomposition table embedded in a portfolio description and
//! exposes its rows for the subtask workflow. Descriptions arrive in tracker
//! wiki markup; tables are rewritten to pipe tables and extracted with
//! pulldown-cmark.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Header label of the subtask-title column.
pub const TITLE_HEADER: &str = "задача";

/// Header label of the shirt-size column.
pub const SHIRT_HEADER: &str = "оценка";

/// Header label of the optional description column.
pub const DESCRIPTION_HEADER: &str = "описание";

static NON_ALPHANUMERIC: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^a-zA-Zа-яА-Я0-9]").expect("Failed to compile sanitization regex"));

static BRACKET_PREFIX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("Failed to compile bracket-prefix regex"));

/// Strip everything but Latin letters, Cyrillic letters and digits, then
/// lowercase. Idempotent; used for header cells and for row-title matching
/// against linked issues so both sides normalize identically.
pub fn sanitize(text: &str) -> String {
  NON_ALPHANUMERIC.replace_all(text, "").to_lowercase()
}

/// Extract the first `[...]`-delimited prefix from a task title.
pub fn task_prefix(title: &str) -> Option<&str> {
  BRACKET_PREFIX
    .captures(title)
    .and_then(|captures| captures.get(1))
    .map(|prefix| prefix.as_str())
}

/// Sanitized prefixes that mark a row as an autotest task.
const AUTOTEST_PREFIXES: [&str; 5] = ["hhautotests", "at", "autotests", "autotest", "hhautotest"];

/// The kind of subtask a decomposition row produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
  /// A regular product task.
  Product,
  /// An autotest task, recognized by its bracketed title prefix.
  Autotest,
}

impl TaskKind {
  /// Classify a row by its title's bracketed prefix.
  pub fn from_title(title: &str) -> TaskKind {
    match task_prefix(title) {
      Some(prefix) if AUTOTEST_PREFIXES.contains(&sanitize(prefix).as_str()) => TaskKind::Autotest,
      _ => TaskKind::Product,
    }
  }

  /// Short key used in task-type reporting.
  pub fn key(self) -> &'static str {
    match self {
      TaskKind::Product => "hh",
      TaskKind::Autotest => "at",
    }
  }
}

/// A markdown table as raw header and row cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownTable {
  pub header: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

/// Rewrite tracker wiki tables (`||h||h||` headers, `|c|c|` rows) into
/// markdown pipe tables so pulldown-cmark can pick them up. Lines that are
/// already markdown pass through untouched.
pub fn wiki_tables_to_markdown(text: &str) -> String {
  let mut lines: Vec<String> = Vec::new();
  for line in text.lines() {
    match split_wiki_header(line.trim()) {
      Some(cells) => {
        // Tables cannot interrupt a paragraph, so a converted header needs a
        // blank line in front of it.
        if lines.last().is_some_and(|previous| !previous.is_empty()) {
          lines.push(String::new());
        }
        lines.push(format!("| {} |", cells.join(" | ")));
        lines.push(format!("|{}|", " --- |".repeat(cells.len()).trim_end_matches('|')));
      }
      None => lines.push(line.to_string()),
    }
  }
  lines.join("\n")
}

fn split_wiki_header(line: &str) -> Option<Vec<String>> {
  let interior = line.strip_prefix("||")?.strip_suffix("||")?;
  if interior.is_empty() {
    return None;
  }
  Some(interior.split("||").map(|cell| cell.trim().to_string()).collect())
}

/// Extract every pipe table from a markdown document.
pub fn extract_tables(markdown: &str) -> Vec<MarkdownTable> {
  let mut options = Options::empty();
  options.insert(Options::ENABLE_TABLES);
  let parser = Parser::new_ext(markdown, options);

  let mut tables = Vec::new();
  let mut current: Option<MarkdownTable> = None;
  let mut row: Vec<String> = Vec::new();
  let mut cell = String::new();
  let mut in_cell = false;

  for event in parser {
    match event {
      Event::Start(Tag::Table(_)) => {
        current = Some(MarkdownTable {
          header: Vec::new(),
          rows: Vec::new(),
        });
      }
      Event::End(TagEnd::TableHead) => {
        if let Some(table) = current.as_mut() {
          table.header = std::mem::take(&mut row);
        }
      }
      Event::End(TagEnd::TableRow) => {
        if let Some(table) = current.as_mut() {
          table.rows.push(std::mem::take(&mut row));
        }
      }
      Event::Start(Tag::TableCell) => {
        in_cell = true;
        cell.clear();
      }
      Event::End(TagEnd::TableCell) => {
        in_cell = false;
        row.push(cell.trim().to_string());
      }
      Event::Text(text) | Event::Code(text) if in_cell => cell.push_str(&text),
      Event::End(TagEnd::Table) => {
        if let Some(table) = current.take() {
          tables.push(table);
        }
      }
      _ => {}
    }
  }

  tables
}

/// Errors from decomposition-table discovery
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecompositionError {
  #[error("no decomposition table found in the portfolio description")]
  TableNotFound,
}

/// The decomposition table of one portfolio: the first table in its
/// description whose sanitized header contains both [`TITLE_HEADER`] and
/// [`SHIRT_HEADER`]. Other tables are skipped.
#[derive(Debug)]
pub struct DecompositionTable {
  header: Vec<String>,
  rows: Vec<Vec<String>>,
}

impl DecompositionTable {
  /// Locate the decomposition table in a portfolio description.
  pub fn from_description(description: &str) -> Result<Self, DecompositionError> {
    let markdown = wiki_tables_to_markdown(description);
    let tables = extract_tables(&markdown);
    debug!(tables = tables.len(), "tables found in portfolio description");

    for table in tables {
      let header: Vec<String> = table.header.iter().map(|cell| sanitize(cell)).collect();
      if header.iter().any(|h| h == TITLE_HEADER) && header.iter().any(|h| h == SHIRT_HEADER) {
        debug!(header = ?table.header, "decomposition table selected");
        return Ok(Self {
          header,
          rows: table.rows,
        });
      }
      debug!(header = ?table.header, "skipping table without decomposition headers");
    }

    Err(DecompositionError::TableNotFound)
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  /// Iterate over the table rows in document order.
  pub fn rows(&self) -> impl Iterator<Item = DecompositionRow<'_>> {
    self.rows.iter().map(|cells| DecompositionRow {
      header: &self.header,
      cells,
    })
  }
}

/// One row of a decomposition table, addressed by sanitized header label.
#[derive(Debug, Clone, Copy)]
pub struct DecompositionRow<'a> {
  header: &'a [String],
  cells: &'a [String],
}

impl<'a> DecompositionRow<'a> {
  /// The cell under the given sanitized header label, if the row has one.
  pub fn cell(&self, header: &str) -> Option<&'a str> {
    let index = self.header.iter().position(|h| h == header)?;
    self.cells.get(index).map(String::as_str)
  }

  pub fn title(&self) -> Option<&'a str> {
    self.cell(TITLE_HEADER)
  }

  pub fn shirt(&self) -> Option<&'a str> {
    self.cell(SHIRT_HEADER)
  }

  pub fn description(&self) -> Option<&'a str> {
    self.cell(DESCRIPTION_HEADER).filter(|cell| !cell.is_empty())
  }
}
