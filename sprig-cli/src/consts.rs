//! Constants shared across sprig commands.

/// Maximum number of summary characters shown in listings.
pub const DEFAULT_SUMMARY_LENGTH: usize = 80;

/// Status-to-icon mapping used in listings.
pub const STATUS_ICONS: [(&str, &str); 9] = [
  ("Open", "📂"),
  ("In Progress", "🔧"),
  ("Need Review", "👀"),
  ("Reopened", "♻️"),
  ("Resolved", "✅"),
  ("Fixed", "✅"),
  ("Merged To RC", "🔀"),
  ("Released", "🚀"),
  ("Closed", "🔒"),
];

/// Icon shown for statuses missing from [`STATUS_ICONS`].
pub const UNKNOWN_STATUS_ICON: &str = "❔";

/// Icon for a status label, falling back to [`UNKNOWN_STATUS_ICON`].
pub fn status_icon(status: &str) -> &'static str {
  STATUS_ICONS
    .iter()
    .find(|(name, _)| *name == status)
    .map(|(_, icon)| *icon)
    .unwrap_or(UNKNOWN_STATUS_ICON)
}

/// Width of the longest status name in [`STATUS_ICONS`], for column padding.
pub fn max_status_width() -> usize {
  STATUS_ICONS.iter().map(|(name, _)| name.len()).max().unwrap_or(0)
}

/// Status label whose issues are moved to work after branching.
pub const OPEN_STATUS: &str = "open";

/// Fixed transition id from Open to In Progress.
pub const IN_PROGRESS_TRANSITION_ID: &str = "4";

/// Base branch synced before a task branch is created.
pub const BASE_BRANCH: &str = "master";

/// Page size of the interactive issue pager.
pub const BRANCH_PAGE_SIZE: u64 = 5;

/// Project searched by the branch workflow and used for product subtasks.
pub const PRODUCT_PROJECT: &str = "HH";

/// Project receiving autotest subtasks.
pub const AUTOTEST_PROJECT: &str = "AT";

/// Issue type of created subtasks.
pub const SUBTASK_ISSUE_TYPE: &str = "Task";

/// Link type attaching subtasks to their portfolio.
pub const PORTFOLIO_LINK_TYPE: &str = "Inclusion";

/// Custom field holding a subtask's shirt size.
pub const SHIRT_FIELD: &str = "customfield_23911";

/// Custom field holding the portfolio's story-point total.
pub const STORY_POINT_FIELD: &str = "customfield_11212";

/// Custom field holding the portfolio's shirt summary.
pub const SHIRT_SUMMARY_FIELD: &str = "customfield_23613";
