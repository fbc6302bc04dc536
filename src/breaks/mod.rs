//! Break classification for HTML start tags.
//!
//! Given the `style`/`class` attribute text of one start tag, decides whether
//! the tag declares a page break before and/or after itself, and whether a
//! co-located avoidance declaration cancels it. Matching is pattern-based
//! only: the CSS grammar is never parsed, so any literal occurrence of an
//! indicator counts.


use regex::{RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Direction of a requested break relative to the declaring tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakDirection {
    Before,
    After,
}

/// Outcome of classifying one start tag's attribute text.
///
/// The two directions are independent: a tag may request a boundary both
/// immediately before and immediately after its own markup, and avoidance is
/// evaluated per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BreakDecision {
    pub before: bool,
    pub after: bool,
}

impl BreakDecision {
    /// True when neither direction requests a boundary.
    pub fn is_no_break(&self) -> bool {
        !self.before && !self.after
    }
}

/// Break-before indicators.
const BREAK_BEFORE_PATTERNS: &[&str] = &[
    r"page-break-before\s*:\s*always",
    r"break-before\s*:\s*page",
    r"break-before\s*:\s*always",
];

/// Break-after indicators.
const BREAK_AFTER_PATTERNS: &[&str] = &[
    r"page-break-after\s*:\s*always",
    r"break-after\s*:\s*page",
    r"break-after\s*:\s*always",
];

/// Avoidance declarations that suppress both directions.
const AVOID_INSIDE_PATTERNS: &[&str] = &[
    r"page-break-inside\s*:\s*avoid",
    r"break-inside\s*:\s*avoid",
];

/// Avoidance declarations that suppress the before direction only.
const AVOID_BEFORE_PATTERNS: &[&str] = &[
    r"page-break-before\s*:\s*avoid",
    r"break-before\s*:\s*avoid",
];

/// Avoidance declarations that suppress the after direction only.
const AVOID_AFTER_PATTERNS: &[&str] = &[
    r"page-break-after\s*:\s*avoid",
    r"break-after\s*:\s*avoid",
];

fn compile(patterns: &[&str]) -> RegexSet {
    RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .expect("valid break patterns")
}

static BREAK_BEFORE: LazyLock<RegexSet> = LazyLock::new(|| compile(BREAK_BEFORE_PATTERNS));
static BREAK_AFTER: LazyLock<RegexSet> = LazyLock::new(|| compile(BREAK_AFTER_PATTERNS));
static AVOID_INSIDE: LazyLock<RegexSet> = LazyLock::new(|| compile(AVOID_INSIDE_PATTERNS));
static AVOID_BEFORE: LazyLock<RegexSet> = LazyLock::new(|| compile(AVOID_BEFORE_PATTERNS));
static AVOID_AFTER: LazyLock<RegexSet> = LazyLock::new(|| compile(AVOID_AFTER_PATTERNS));

/// Classify the attribute text of one start tag.
///
/// `attrs` is the concatenated `style` and `class` values of the tag.
/// Matching is case-insensitive and tolerates arbitrary whitespace around
/// the `:`, including none.
pub fn classify(attrs: &str) -> BreakDecision {
    if attrs.is_empty() {
        return BreakDecision::default();
    }

    let avoid_inside = AVOID_INSIDE.is_match(attrs);

    BreakDecision {
        before: BREAK_BEFORE.is_match(attrs) && !avoid_inside && !AVOID_BEFORE.is_match(attrs),
        after: BREAK_AFTER.is_match(attrs) && !avoid_inside && !AVOID_AFTER.is_match(attrs),
    }
}
