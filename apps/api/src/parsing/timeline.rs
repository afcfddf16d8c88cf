//! Timeline parsing — `YYYY-MM-DD: action` lines into sorted plan items.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Date token, an optional run of `:` and whitespace, then the action.
// The date is matched by shape only; calendar validity is not checked here.
static PLAN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})[:\s]*(.*)$").expect("plan pattern is valid")
});

/// One dated entry in a student's admissions timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: Uuid,
    /// `YYYY-MM-DD`; empty only for a manually added blank row.
    pub date: String,
    pub action: String,
}

impl PlanItem {
    pub fn new(date: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date.into(),
            action: action.into(),
        }
    }

    /// An empty row for the user to fill in.
    pub fn blank() -> Self {
        Self::new("", "")
    }

    /// The date as a real calendar day, if it is one. `2025-02-30` is `None`.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Parses plan text into items sorted by date. Lines without a leading date
/// token, or with nothing after it, are dropped.
pub fn parse_plan(text: &str) -> Vec<PlanItem> {
    let mut items: Vec<PlanItem> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .collect();

    sort_plan_items(&mut items);
    items
}

fn parse_line(line: &str) -> Option<PlanItem> {
    let captures = PLAN_LINE.captures(line)?;
    let date = captures.get(1)?.as_str();
    let action = captures.get(2)?.as_str().trim();
    if action.is_empty() {
        return None;
    }
    Some(PlanItem::new(date, action))
}

/// Ascending by date string; rows with an empty date go last. Stable, so
/// items on the same day keep their relative order.
pub fn sort_plan_items(items: &mut [PlanItem]) {
    items.sort_by(|a, b| match (a.date.is_empty(), b.date.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.date.cmp(&b.date),
    });
}

/// Serializes items back to `date: action` lines. Incomplete rows are omitted.
pub fn format_plan(items: &[PlanItem]) -> String {
    items
        .iter()
        .filter(|item| !item.date.trim().is_empty() && !item.action.trim().is_empty())
        .map(|item| format!("{}: {}", item.date.trim(), item.action.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
