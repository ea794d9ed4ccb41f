use std::collections::BTreeMap;

use serde::Serialize;

/// Home/away value pair for one statistic category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatPair {
    pub home: String,
    pub away: String,
}

/// In-depth statistics scraped from one match detail page.
///
/// `attendance` and `referee` default to `"N/A"` when the summary block is
/// shorter than expected. Category keys are normalized stat labels, e.g.
/// `shots_on_target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedStats {
    pub attendance: String,
    pub referee: String,
    pub categories: BTreeMap<String, StatPair>,
}

impl Default for DetailedStats {
    fn default() -> Self {
        Self {
            attendance: "N/A".to_string(),
            referee: "N/A".to_string(),
            categories: BTreeMap::new(),
        }
    }
}

/// Normalize a stat label into a mapping key: lower-cased, spaces joined
/// with underscores ("Shots on target" -> "shots_on_target").
pub fn normalize_category(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
