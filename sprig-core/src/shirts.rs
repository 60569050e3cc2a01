//! # Shirt-Size Estimates
//!
//! Shirt-size labels, their story-point values, and the per-run aggregate
//! accumulated by the subtask workflow.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use thiserror::Error;

/// Canonical ascending order of shirt sizes, used when rendering summaries.
pub const SHIRT_ORDER: [&str; 8] = ["0", "XS", "S", "S+", "M", "L", "XL", "XXL"];

/// Built-in shirt-size to story-point table, overridable per user.
const DEFAULT_SHIRT_MAPPING: [(&str, &str); 8] = [
  ("0", "0.1"),
  ("XS", "0.4"),
  ("S", "1"),
  ("S+", "1"),
  ("M", "2.5"),
  ("L", "4"),
  ("XL", "4"),
  ("XXL", "4"),
];

/// Errors that can occur when parsing a story-point value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryPointsError {
  #[error("invalid story-point value: '{0}'")]
  Invalid(String),
}

/// An exact story-point value with up to two decimal places.
///
/// Stored as hundredths so that repeated addition of values like `0.1` stays
/// exact instead of drifting the way binary floating point would.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct StoryPoints(i64);

impl StoryPoints {
  pub const ZERO: StoryPoints = StoryPoints(0);

  /// Whether this value is exactly zero.
  pub fn is_zero(self) -> bool {
    self.0 == 0
  }

  /// The value as a float, for JSON payloads that expect a number.
  pub fn as_f64(self) -> f64 {
    self.0 as f64 / 100.0
  }
}

impl FromStr for StoryPoints {
  type Err = StoryPointsError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    let invalid = || StoryPointsError::Invalid(s.to_string());

    let (whole, fraction) = match trimmed.split_once('.') {
      Some((whole, fraction)) => (whole, fraction),
      None => (trimmed, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }
    if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let hundredths = match fraction.len() {
      0 => 0,
      1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
      _ => fraction.parse::<i64>().map_err(|_| invalid())?,
    };

    Ok(StoryPoints(whole * 100 + hundredths))
  }
}

impl fmt::Display for StoryPoints {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let whole = self.0 / 100;
    let hundredths = self.0 % 100;
    if hundredths == 0 {
      write!(f, "{whole}")
    } else if hundredths % 10 == 0 {
      write!(f, "{whole}.{}", hundredths / 10)
    } else {
      write!(f, "{whole}.{hundredths:02}")
    }
  }
}

impl Add for StoryPoints {
  type Output = StoryPoints;

  fn add(self, rhs: StoryPoints) -> StoryPoints {
    StoryPoints(self.0 + rhs.0)
  }
}

impl AddAssign for StoryPoints {
  fn add_assign(&mut self, rhs: StoryPoints) {
    self.0 += rhs.0;
  }
}

impl Sum for StoryPoints {
  fn sum<I: Iterator<Item = StoryPoints>>(iter: I) -> StoryPoints {
    iter.fold(StoryPoints::ZERO, Add::add)
  }
}

/// The built-in shirt mapping as an owned table.
pub fn default_shirt_mapping() -> BTreeMap<String, StoryPoints> {
  DEFAULT_SHIRT_MAPPING
    .iter()
    .map(|(label, value)| {
      let points = value
        .parse()
        .expect("built-in shirt mapping contains valid story-point values");
      ((*label).to_string(), points)
    })
    .collect()
}

/// Per-run tally of shirt labels and the story-point total they map to.
///
/// Accumulated while walking decomposition rows, flushed to the parent issue
/// at the end of the run, then discarded.
#[derive(Debug, Default)]
pub struct ShirtAggregate {
  counts: HashMap<String, u32>,
  total: StoryPoints,
}

impl ShirtAggregate {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record one occurrence of a shirt label.
  ///
  /// The label is trimmed and uppercased before lookup. Returns `false` when
  /// the label is not present in the mapping; the aggregate is left untouched
  /// in that case.
  pub fn record(&mut self, label: &str, mapping: &BTreeMap<String, StoryPoints>) -> bool {
    let label = label.trim().to_uppercase();
    match mapping.get(&label) {
      Some(points) => {
        *self.counts.entry(label).or_insert(0) += 1;
        self.total += *points;
        true
      }
      None => false,
    }
  }

  /// The running story-point total.
  pub fn total(&self) -> StoryPoints {
    self.total
  }

  /// How many times the given label was recorded.
  pub fn count(&self, label: &str) -> u32 {
    self.counts.get(label).copied().unwrap_or(0)
  }

  /// Whether nothing was recorded.
  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  /// Render the tally as `"<count> - <size>"` pairs joined by `", "`, in the
  /// canonical [`SHIRT_ORDER`], skipping sizes with zero count.
  pub fn summary(&self) -> String {
    let mut result = String::new();
    for shirt in SHIRT_ORDER {
      let count = self.count(shirt);
      if count != 0 {
        if !result.is_empty() {
          result.push_str(", ");
        }
        result.push_str(&format!("{count} - {shirt}"));
      }
    }
    result
  }
}
