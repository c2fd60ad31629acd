//! Quest entities - rows, merged nodes, and edges.
//!
//! A `QuestRow` is one record as delivered by the scraping collaborator,
//! multi-valued fields still pipe-delimited. A `QuestNode` is the merged,
//! parsed form keyed by quest name. Nodes referenced only through another
//! quest's `previous`/`leads_to` list materialize as stubs (name plus a
//! synthesized URL, everything else empty).

use serde::{Deserialize, Serialize};

use crate::relations::{parse_required_level, split_relations};

/// One raw quest record from the row-oriented input.
///
/// Every field except `name` is optional; multi-valued fields are
/// pipe-delimited strings (`"A | B | C"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestRow {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub given_by: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dialogue: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub objectives: Option<String>,
    #[serde(default)]
    pub rewards: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub leads_to: Option<String>,
}

/// A merged quest node.
///
/// The `id` doubles as the display name and is immutable once created.
/// Attribute merging across multiple rows referencing the same quest is
/// first-non-empty-wins: a later, blanker row never overwrites data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestNode {
    pub id: String,
    pub location: Option<String>,
    pub given_by: Option<String>,
    pub url: Option<String>,
    pub dialogue: Vec<String>,
    pub requirements: Vec<String>,
    pub required_level: Option<u32>,
    pub objectives: Vec<String>,
    pub rewards: Vec<String>,
    pub previous: Vec<String>,
    pub leads_to: Vec<String>,
    /// Column assignment for layered layout, derived by the graph builder.
    pub depth: u32,
}

impl QuestNode {
    /// Creates a stub node for a quest known only by name.
    pub fn stub(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            id: name.into(),
            location: None,
            given_by: None,
            url,
            dialogue: Vec::new(),
            requirements: Vec::new(),
            required_level: None,
            objectives: Vec::new(),
            rewards: Vec::new(),
            previous: Vec::new(),
            leads_to: Vec::new(),
            depth: 0,
        }
    }

    /// Merges a source row into this node, first non-empty value wins.
    pub fn merge_row(&mut self, row: &QuestRow) {
        if self.location.is_none() {
            self.location = non_empty(row.location.as_deref());
        }
        if self.given_by.is_none() {
            self.given_by = non_empty(row.given_by.as_deref());
        }
        if self.url.is_none() {
            self.url = non_empty(row.url.as_deref());
        }
        if self.dialogue.is_empty() {
            self.dialogue = split_relations(row.dialogue.as_deref());
        }
        if self.requirements.is_empty() {
            self.requirements = split_relations(row.requirements.as_deref());
        }
        if self.required_level.is_none() {
            self.required_level = parse_required_level(&self.requirements);
        }
        if self.objectives.is_empty() {
            self.objectives = split_relations(row.objectives.as_deref());
        }
        if self.rewards.is_empty() {
            self.rewards = split_relations(row.rewards.as_deref());
        }
        if self.previous.is_empty() {
            self.previous = split_relations(row.previous.as_deref());
        }
        if self.leads_to.is_empty() {
            self.leads_to = split_relations(row.leads_to.as_deref());
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A directed edge meaning "source unlocks/precedes target".
///
/// The edge set is a mathematical set: duplicate (source, target) pairs
/// collapse to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> QuestRow {
        QuestRow {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_row_first_value_wins() {
        let mut node = QuestNode::stub("Debut", None);
        let mut first = row("Debut");
        first.given_by = Some("Prapor".to_string());
        first.rewards = Some("5,200 EXP | 2 × Salewa".to_string());
        node.merge_row(&first);

        let mut later = row("Debut");
        later.given_by = Some("Therapist".to_string());
        later.location = Some("Customs".to_string());
        node.merge_row(&later);

        // Populated fields are never overwritten; blanks fill in.
        assert_eq!(node.given_by.as_deref(), Some("Prapor"));
        assert_eq!(node.location.as_deref(), Some("Customs"));
        assert_eq!(node.rewards, vec!["5,200 EXP", "2 × Salewa"]);
    }

    #[test]
    fn test_merge_row_blank_strings_stay_none() {
        let mut node = QuestNode::stub("Debut", None);
        let mut blank = row("Debut");
        blank.given_by = Some("   ".to_string());
        node.merge_row(&blank);
        assert_eq!(node.given_by, None);
    }

    #[test]
    fn test_merge_row_derives_required_level() {
        let mut node = QuestNode::stub("Debut", None);
        let mut with_reqs = row("Debut");
        with_reqs.requirements = Some("Must be level 5".to_string());
        node.merge_row(&with_reqs);
        assert_eq!(node.required_level, Some(5));
    }

    #[test]
    fn test_edge_ordering_is_by_source_then_target() {
        let mut edges = vec![Edge::new("B", "A"), Edge::new("A", "Z"), Edge::new("A", "B")];
        edges.sort();
        assert_eq!(edges[0], Edge::new("A", "B"));
        assert_eq!(edges[2], Edge::new("B", "A"));
    }
}
