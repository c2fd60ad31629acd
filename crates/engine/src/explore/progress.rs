//! Completion progress, importance flags, and the derived "available" set.
//!
//! Statuses are the only mutable per-node state this subsystem owns. Every
//! mutation persists through the key/value port and triggers a full rebuild
//! of the availability set; the rebuild is an O(E) pass rather than an
//! incremental patch, so bulk imports that replace the whole map can never
//! leave stale derived state behind.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use questtree_domain::{DomainError, ProgressRecord, QuestStatus};

use crate::graph::QuestGraph;
use crate::infrastructure::{namespaces, KeyValueStore};

/// Per-quest completion tracking backed by collaborator persistence.
pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
    /// Only non-`None` statuses are kept; everything absent reads as `None`.
    statuses: BTreeMap<String, QuestStatus>,
    important: BTreeSet<String>,
    available: HashSet<String>,
}

impl ProgressTracker {
    /// Loads persisted state. Statuses only load when the enabled flag has
    /// been written; malformed stored documents read as empty rather than
    /// fail.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let enabled = store
            .get(namespaces::PROGRESS_ENABLED)
            .is_some_and(|v| v == "true");
        let statuses = if enabled {
            store
                .get(namespaces::PROGRESS)
                .and_then(|raw| parse_statuses(&raw).ok())
                .unwrap_or_default()
        } else {
            BTreeMap::new()
        };
        let important = store
            .get(namespaces::IMPORTANT)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .map(BTreeSet::from_iter)
            .unwrap_or_default();
        Self {
            store,
            statuses,
            important,
            available: HashSet::new(),
        }
    }

    pub fn status(&self, id: &str) -> QuestStatus {
        self.statuses.get(id).copied().unwrap_or_default()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.status(id) == QuestStatus::Completed
    }

    /// Sets a quest's status from a raw status string.
    ///
    /// The raw value normalizes through the alias table; `None` removes the
    /// entry. Persists and rebuilds availability.
    pub fn set_status(&mut self, graph: &QuestGraph, id: &str, raw: &str) -> QuestStatus {
        let normalized = QuestStatus::normalize(raw);
        match normalized {
            QuestStatus::None => {
                self.statuses.remove(id);
            }
            status => {
                self.statuses.insert(id.to_string(), status);
            }
        }
        self.enable_loading();
        self.persist();
        self.refresh_available(graph);
        normalized
    }

    /// Clears all progress.
    pub fn clear(&mut self, graph: &QuestGraph) {
        self.statuses.clear();
        self.persist();
        self.refresh_available(graph);
    }

    /// Replaces progress from imported JSON text.
    ///
    /// Accepts the full versioned record shape or a bare `{id: status}`
    /// mapping; every status normalizes through the alias table. Any parse
    /// failure leaves existing progress untouched - the import is never
    /// partially applied. Returns the number of completed entries applied.
    pub fn import_json(&mut self, graph: &QuestGraph, text: &str) -> Result<usize, DomainError> {
        let statuses = parse_statuses(text)?;
        let applied = statuses.len();
        self.statuses = statuses;
        self.enable_loading();
        self.persist();
        self.refresh_available(graph);
        Ok(applied)
    }

    /// Builds the full export record, stamped `now`.
    pub fn export(&self, now: DateTime<Utc>) -> ProgressRecord {
        ProgressRecord::new(self.statuses.clone(), now)
    }

    /// Serializes the export record as pretty JSON.
    pub fn export_json(&self, now: DateTime<Utc>) -> Result<String, DomainError> {
        serde_json::to_string_pretty(&self.export(now))
            .map_err(|err| DomainError::invalid_import(err.to_string()))
    }

    /// Toggles the important flag for a quest; returns the new state.
    pub fn toggle_important(&mut self, id: &str) -> bool {
        let now_important = if self.important.contains(id) {
            self.important.remove(id);
            false
        } else {
            self.important.insert(id.to_string());
            true
        };
        self.persist_important();
        now_important
    }

    pub fn is_important(&self, id: &str) -> bool {
        self.important.contains(id)
    }

    pub fn important_ids(&self) -> impl Iterator<Item = &str> {
        self.important.iter().map(String::as_str)
    }

    /// Whether a quest is available: a direct successor of a completed quest
    /// that is not itself completed.
    pub fn is_available(&self, id: &str) -> bool {
        self.available.contains(id)
    }

    pub fn available(&self) -> &HashSet<String> {
        &self.available
    }

    /// Rebuilds the availability set from scratch.
    pub fn refresh_available(&mut self, graph: &QuestGraph) {
        let mut next = HashSet::new();
        for &(source, target) in graph.edges() {
            let source_id = &graph.node(source).id;
            let target_id = &graph.node(target).id;
            if self.is_completed(source_id) && !self.is_completed(target_id) {
                next.insert(target_id.clone());
            }
        }
        self.available = next;
    }

    fn enable_loading(&self) {
        self.store.put(namespaces::PROGRESS_ENABLED, "true");
    }

    fn persist(&self) {
        if let Ok(json) = serde_json::to_string(&self.export(Utc::now())) {
            self.store.put(namespaces::PROGRESS, &json);
        }
    }

    fn persist_important(&self) {
        if let Ok(json) = serde_json::to_string(&self.important.iter().collect::<Vec<_>>()) {
            self.store.put(namespaces::IMPORTANT, &json);
        }
    }
}

/// Parses progress JSON in either accepted shape into a normalized map,
/// keeping only non-`None` statuses.
fn parse_statuses(text: &str) -> Result<BTreeMap<String, QuestStatus>, DomainError> {
    let parsed: serde_json::Value = serde_json::from_str(text)
        .map_err(|err| DomainError::invalid_import(format!("not valid JSON: {err}")))?;
    let root = parsed
        .as_object()
        .ok_or_else(|| DomainError::invalid_import("expected a JSON object"))?;
    let statuses = match root.get("statuses") {
        Some(value) => value
            .as_object()
            .ok_or_else(|| DomainError::invalid_import("'statuses' must be an object"))?,
        None => root,
    };

    let mut map = BTreeMap::new();
    for (id, value) in statuses {
        let Some(raw) = value.as_str() else {
            continue;
        };
        let status = QuestStatus::normalize(raw);
        if status != QuestStatus::None {
            map.insert(id.clone(), status);
        }
    }
    Ok(map)
}
