//! Completion-progress types.
//!
//! Progress is a mapping from quest id to a normalized status, persisted as a
//! versioned document. Legacy and free-form status strings ("done",
//! "finished", "blocked", ...) normalize through a fixed alias table;
//! anything unrecognized collapses to `None`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current on-disk progress document version.
pub const PROGRESS_VERSION: u32 = 1;

/// Normalized per-quest completion status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    #[default]
    None,
    Completed,
}

impl QuestStatus {
    /// Normalizes a raw status string through the alias table.
    ///
    /// Lower-cases, collapses whitespace and hyphen runs to `_`, then maps
    /// aliases; unrecognized values normalize to `None`.
    pub fn normalize(raw: &str) -> Self {
        let mut cleaned = String::with_capacity(raw.len());
        let mut last_was_sep = false;
        for ch in raw.trim().chars() {
            if ch.is_whitespace() || ch == '-' {
                if !last_was_sep {
                    cleaned.push('_');
                    last_was_sep = true;
                }
            } else {
                cleaned.extend(ch.to_lowercase());
                last_was_sep = false;
            }
        }
        match cleaned.as_str() {
            "completed" | "complete" | "done" | "finished" => QuestStatus::Completed,
            // "none", "not_completed", "not_started", "in_progress", "blocked"
            // and anything unknown all read as not completed.
            _ => QuestStatus::None,
        }
    }

    /// Human-readable label for display collaborators.
    pub fn label(&self) -> &'static str {
        match self {
            QuestStatus::None => "Not completed",
            QuestStatus::Completed => "Completed",
        }
    }
}

/// Versioned progress document, the persistence and export contract.
///
/// Only non-`None` statuses are stored; setting a quest back to `None`
/// removes its entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub statuses: BTreeMap<String, QuestStatus>,
}

impl ProgressRecord {
    /// Builds an export payload for the given statuses, stamped `now`.
    pub fn new(statuses: BTreeMap<String, QuestStatus>, now: DateTime<Utc>) -> Self {
        Self {
            version: PROGRESS_VERSION,
            updated_at: now,
            statuses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(QuestStatus::normalize("completed"), QuestStatus::Completed);
        assert_eq!(QuestStatus::normalize("Complete"), QuestStatus::Completed);
        assert_eq!(QuestStatus::normalize("DONE"), QuestStatus::Completed);
        assert_eq!(QuestStatus::normalize("finished"), QuestStatus::Completed);
        assert_eq!(QuestStatus::normalize("none"), QuestStatus::None);
        assert_eq!(QuestStatus::normalize("not completed"), QuestStatus::None);
        assert_eq!(QuestStatus::normalize("Not-Started"), QuestStatus::None);
        assert_eq!(QuestStatus::normalize("in_progress"), QuestStatus::None);
        assert_eq!(QuestStatus::normalize("blocked"), QuestStatus::None);
    }

    #[test]
    fn test_normalize_unknown_values_fall_back_to_none() {
        assert_eq!(QuestStatus::normalize("gibberish"), QuestStatus::None);
        assert_eq!(QuestStatus::normalize(""), QuestStatus::None);
    }

    #[test]
    fn test_normalize_collapses_separator_runs() {
        assert_eq!(
            QuestStatus::normalize("  not -- started  "),
            QuestStatus::None
        );
        assert_eq!(QuestStatus::normalize(" done "), QuestStatus::Completed);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let mut statuses = BTreeMap::new();
        statuses.insert("Debut".to_string(), QuestStatus::Completed);
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let record = ProgressRecord::new(statuses, now);
        let json = serde_json::to_value(&record).expect("serializable");
        assert_eq!(json["version"], 1);
        assert_eq!(json["updatedAt"], "2024-01-01T00:00:00Z");
        assert_eq!(json["statuses"]["Debut"], "completed");
    }
}
