//! Percent extraction — pulls an admission-chance integer out of free-form model text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Used when the model reply carries no usable number.
pub const DEFAULT_FALLBACK_PERCENT: i64 = 70;

// ASCII only: `\d` would also match non-Latin digits.
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,3}").expect("digit pattern is valid"));

/// Reach / Target / Safety bucket derived from a percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanceCategory {
    Reach,
    Target,
    Safety,
}

impl ChanceCategory {
    /// ≥80 → Safety, 50–79 → Target, <50 → Reach.
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            80..=u8::MAX => ChanceCategory::Safety,
            50..=79 => ChanceCategory::Target,
            _ => ChanceCategory::Reach,
        }
    }
}

/// An extracted percent together with its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanceEstimate {
    pub percent: u8,
    pub category: ChanceCategory,
}

impl ChanceEstimate {
    pub fn from_percent(percent: u8) -> Self {
        let percent = percent.min(100);
        Self {
            percent,
            category: ChanceCategory::from_percent(percent),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_percent(extract_percent(text))
    }
}

/// Extracts a percent using the default fallback of 70.
pub fn extract_percent(text: &str) -> u8 {
    extract_percent_or(text, DEFAULT_FALLBACK_PERCENT)
}

/// Extracts the first run of 1–3 ASCII digits from `text` and clamps it into [0, 100].
/// Falls back to `fallback` (also clamped) when no digits are present.
pub fn extract_percent_or(text: &str, fallback: i64) -> u8 {
    let value = DIGIT_RUN
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(fallback);

    value.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_embedded_percent() {
        assert_eq!(extract_percent("82% admission chance"), 82);
    }

    #[test]
    fn test_no_digits_uses_default_fallback() {
        assert_eq!(extract_percent("no numbers here"), 70);
        assert_eq!(extract_percent(""), 70);
    }

    #[test]
    fn test_custom_fallback() {
        assert_eq!(extract_percent_or("unknown", 40), 40);
    }

    #[test]
    fn test_out_of_range_fallback_is_clamped() {
        assert_eq!(extract_percent_or("nothing", -5), 0);
        assert_eq!(extract_percent_or("nothing", 900), 100);
    }

    #[test]
    fn test_values_above_hundred_clamp() {
        assert_eq!(extract_percent("250"), 100);
        // Only the first three digits form the run.
        assert_eq!(extract_percent("1234"), 100);
    }

    #[test]
    fn test_first_run_wins() {
        assert_eq!(extract_percent("Roughly 45, maybe 60 with a strong essay"), 45);
    }

    #[test]
    fn test_minus_sign_is_ignored() {
        assert_eq!(extract_percent("-12"), 12);
    }

    #[test]
    fn test_non_ascii_digits_are_not_matched() {
        // Arabic-Indic digits
        assert_eq!(extract_percent("٨٢"), 70);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(ChanceCategory::from_percent(100), ChanceCategory::Safety);
        assert_eq!(ChanceCategory::from_percent(80), ChanceCategory::Safety);
        assert_eq!(ChanceCategory::from_percent(79), ChanceCategory::Target);
        assert_eq!(ChanceCategory::from_percent(50), ChanceCategory::Target);
        assert_eq!(ChanceCategory::from_percent(49), ChanceCategory::Reach);
        assert_eq!(ChanceCategory::from_percent(0), ChanceCategory::Reach);
    }

    #[test]
    fn test_estimate_clamps_out_of_range_percent() {
        let estimate = ChanceEstimate::from_percent(200);
        assert_eq!(estimate.percent, 100);
        assert_eq!(estimate.category, ChanceCategory::Safety);
    }

    #[test]
    fn test_estimate_serializes_with_category() {
        let estimate = ChanceEstimate::from_text("I'd say 82");
        let json = serde_json::to_value(estimate).unwrap();
        assert_eq!(json["percent"], 82);
        assert_eq!(json["category"], "Safety");
    }
}
