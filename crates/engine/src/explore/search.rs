//! Multi-mode search.
//!
//! Three independent modes, re-evaluated on every keystroke: quest-name
//! substring, reward items ("N × Item" lines grouped by item), and unlock
//! rewards ("Unlocks <kind> ... [at <place>]" grouped by unlocked item).
//! Matching is case-insensitive substring containment against the parsed
//! item name, never the raw reward string. Results carry the filter's
//! de-emphasis flag instead of being removed by it.

use questtree_domain::{parse_item_reward, parse_unlock, UnlockKind};

use crate::graph::QuestGraph;

use super::filter::FilterState;

/// Cap on name results and on grouped result groups.
const MAX_RESULTS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Name,
    Reward,
    Unlock,
}

/// A quest matched by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameHit {
    pub quest_id: String,
    pub dimmed: bool,
}

/// One quest granting a matched item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub quest_id: String,
    pub count: u32,
    pub kind: Option<UnlockKind>,
    pub place: Option<String>,
    pub dimmed: bool,
}

/// All quests granting one matched item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchGroup {
    pub item: String,
    pub hits: Vec<SearchHit>,
    /// True when every hit in the group is filtered out.
    pub all_dimmed: bool,
}

/// Search results; shape depends on the mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    Names(Vec<NameHit>),
    Groups(Vec<SearchGroup>),
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        match self {
            SearchResults::Names(hits) => hits.is_empty(),
            SearchResults::Groups(groups) => groups.is_empty(),
        }
    }
}

/// Evaluates a search query against the graph.
///
/// An empty (or whitespace) query yields empty results.
pub fn search(
    graph: &QuestGraph,
    filter: &FilterState,
    mode: SearchMode,
    query: &str,
) -> SearchResults {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return match mode {
            SearchMode::Name => SearchResults::Names(Vec::new()),
            _ => SearchResults::Groups(Vec::new()),
        };
    }
    match mode {
        SearchMode::Name => SearchResults::Names(search_names(graph, filter, &term)),
        SearchMode::Reward => SearchResults::Groups(search_grouped(graph, filter, &term, false)),
        SearchMode::Unlock => SearchResults::Groups(search_grouped(graph, filter, &term, true)),
    }
}

fn search_names(graph: &QuestGraph, filter: &FilterState, term: &str) -> Vec<NameHit> {
    graph
        .nodes()
        .iter()
        .filter(|node| node.id.to_lowercase().contains(term))
        .take(MAX_RESULTS)
        .map(|node| NameHit {
            quest_id: node.id.clone(),
            dimmed: !filter.matches(node),
        })
        .collect()
}

struct RawHit {
    item: String,
    quest_id: String,
    count: u32,
    kind: Option<UnlockKind>,
    place: Option<String>,
    dimmed: bool,
}

fn search_grouped(
    graph: &QuestGraph,
    filter: &FilterState,
    term: &str,
    unlocks: bool,
) -> Vec<SearchGroup> {
    let mut raw_hits: Vec<RawHit> = Vec::new();
    for node in graph.nodes() {
        let dimmed = !filter.matches(node);
        for line in &node.rewards {
            let hit = if unlocks {
                parse_unlock(line).map(|u| (u.item, 1, Some(u.kind), u.place))
            } else {
                parse_item_reward(line).map(|(item, count)| (item, count, None, None))
            };
            if let Some((item, count, kind, place)) = hit {
                if item.to_lowercase().contains(term) {
                    raw_hits.push(RawHit {
                        item,
                        quest_id: node.id.clone(),
                        count,
                        kind,
                        place,
                        dimmed,
                    });
                }
            }
        }
    }

    // Group by item, preserving first-seen item order.
    let mut groups: Vec<SearchGroup> = Vec::new();
    for raw in raw_hits {
        let hit = SearchHit {
            quest_id: raw.quest_id,
            count: raw.count,
            kind: raw.kind,
            place: raw.place,
            dimmed: raw.dimmed,
        };
        match groups.iter_mut().find(|g| g.item == raw.item) {
            Some(group) => {
                group.all_dimmed &= hit.dimmed;
                group.hits.push(hit);
            }
            None => groups.push(SearchGroup {
                item: raw.item,
                all_dimmed: hit.dimmed,
                hits: vec![hit],
            }),
        }
    }
    groups.truncate(MAX_RESULTS);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::filter::TextFacet;
    use crate::graph::build_graph;
    use questtree_domain::QuestRow;
    use std::collections::HashMap;

    fn fixture_graph() -> QuestGraph {
        let rows = vec![
            QuestRow {
                name: "Shortage".to_string(),
                given_by: Some("Therapist".to_string()),
                rewards: Some("5 × Salewa | 2,500 EXP".to_string()),
                ..Default::default()
            },
            QuestRow {
                name: "Sanitary Standards".to_string(),
                given_by: Some("Therapist".to_string()),
                rewards: Some("2 × Salewa | Unlocks barter for Salewa at Therapist LL1".to_string()),
                ..Default::default()
            },
            QuestRow {
                name: "Gunsmith".to_string(),
                given_by: Some("Mechanic".to_string()),
                rewards: Some("Unlocks purchase of MP5 at Peacekeeper LL2".to_string()),
                ..Default::default()
            },
        ];
        build_graph(&rows, &HashMap::new())
    }

    #[test]
    fn test_name_mode_substring_case_insensitive() {
        let graph = fixture_graph();
        let results = search(&graph, &FilterState::default(), SearchMode::Name, "SAN");
        let SearchResults::Names(hits) = results else {
            panic!("expected name hits");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].quest_id, "Sanitary Standards");
        assert!(!hits[0].dimmed);
    }

    #[test]
    fn test_empty_query_yields_no_results() {
        let graph = fixture_graph();
        assert!(search(&graph, &FilterState::default(), SearchMode::Name, "  ").is_empty());
        assert!(search(&graph, &FilterState::default(), SearchMode::Reward, "").is_empty());
    }

    #[test]
    fn test_reward_mode_groups_by_item_with_counts() {
        let graph = fixture_graph();
        let results = search(&graph, &FilterState::default(), SearchMode::Reward, "salewa");
        let SearchResults::Groups(groups) = results else {
            panic!("expected groups");
        };
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].item, "Salewa");
        assert_eq!(groups[0].hits.len(), 2);
        assert_eq!(groups[0].hits[0].quest_id, "Shortage");
        assert_eq!(groups[0].hits[0].count, 5);
        assert_eq!(groups[0].hits[1].count, 2);
    }

    #[test]
    fn test_reward_mode_ignores_unlock_lines() {
        let graph = fixture_graph();
        let results = search(&graph, &FilterState::default(), SearchMode::Reward, "mp5");
        assert!(results.is_empty());
    }

    #[test]
    fn test_unlock_mode_carries_kind_and_place() {
        let graph = fixture_graph();
        let results = search(&graph, &FilterState::default(), SearchMode::Unlock, "mp5");
        let SearchResults::Groups(groups) = results else {
            panic!("expected groups");
        };
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].item, "MP5");
        assert_eq!(groups[0].hits[0].kind, Some(UnlockKind::Purchase));
        assert_eq!(groups[0].hits[0].place.as_deref(), Some("Peacekeeper LL2"));
    }

    #[test]
    fn test_results_mirror_filter_dimming() {
        let graph = fixture_graph();
        let mut filter = FilterState::default();
        filter.trader = TextFacet::Is("Mechanic".to_string());
        let results = search(&graph, &filter, SearchMode::Reward, "salewa");
        let SearchResults::Groups(groups) = results else {
            panic!("expected groups");
        };
        // Both Salewa grants come from Therapist quests, all dimmed.
        assert!(groups[0].all_dimmed);
        assert!(groups[0].hits.iter().all(|h| h.dimmed));
    }
}
