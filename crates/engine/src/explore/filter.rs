//! Faceted filtering.
//!
//! The filter predicate is a conjunction over independently-optional facets:
//! trader, location membership, unlock kinds, and an XP-reward range.
//! Filtering is non-destructive - nodes and edges are marked de-emphasized,
//! never removed - and the search result list mirrors the same de-emphasis.

use std::collections::BTreeSet;

use questtree_domain::{parse_xp, split_locations, unlock_kinds, QuestNode, UnlockKind};

use crate::graph::QuestGraph;

/// Lower bound of the XP range control.
pub const XP_SLIDER_MIN: u32 = 0;
/// Upper bound of the XP range control.
pub const XP_SLIDER_MAX: u32 = 100_000;

/// One text facet: match everything, only nodes missing the field, or one
/// specific value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextFacet {
    #[default]
    All,
    Unknown,
    Is(String),
}

/// Active filter facets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub trader: TextFacet,
    pub location: TextFacet,
    /// Disjunction: a node passes when it grants any toggled unlock kind.
    pub unlocks: BTreeSet<UnlockKind>,
    pub xp_min: u32,
    pub xp_max: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            trader: TextFacet::All,
            location: TextFacet::All,
            unlocks: BTreeSet::new(),
            xp_min: XP_SLIDER_MIN,
            xp_max: XP_SLIDER_MAX,
        }
    }
}

impl FilterState {
    /// Whether the XP range has been narrowed from the full slider span.
    pub fn xp_range_active(&self) -> bool {
        self.xp_min > XP_SLIDER_MIN || self.xp_max < XP_SLIDER_MAX
    }

    /// Resets every facet, restoring full visibility.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Conjunction over all active facets.
    pub fn matches(&self, node: &QuestNode) -> bool {
        match &self.trader {
            TextFacet::All => {}
            TextFacet::Unknown => {
                if node.given_by.is_some() {
                    return false;
                }
            }
            TextFacet::Is(trader) => {
                if node.given_by.as_deref() != Some(trader.as_str()) {
                    return false;
                }
            }
        }

        match &self.location {
            TextFacet::All => {}
            TextFacet::Unknown => {
                if !split_locations(node.location.as_deref()).is_empty() {
                    return false;
                }
            }
            TextFacet::Is(location) => {
                let locations = split_locations(node.location.as_deref());
                if !locations.iter().any(|l| l == location) {
                    return false;
                }
            }
        }

        if !self.unlocks.is_empty() {
            let kinds = unlock_kinds(&node.rewards);
            if !self.unlocks.iter().any(|kind| kinds.contains(kind)) {
                return false;
            }
        }

        if self.xp_range_active() {
            match parse_xp(&node.rewards) {
                // No XP line at all fails an active range.
                None => return false,
                Some(xp) => {
                    if xp < self.xp_min || xp > self.xp_max {
                        return false;
                    }
                }
            }
        }

        true
    }
}

/// De-emphasis flags for every node and edge, indexed like the graph.
#[derive(Debug, Clone, Default)]
pub struct FilterView {
    pub node_dimmed: Vec<bool>,
    pub edge_dimmed: Vec<bool>,
}

impl FilterView {
    /// Evaluates the filter over the whole graph. An edge dims when either
    /// endpoint fails the predicate.
    pub fn compute(graph: &QuestGraph, state: &FilterState) -> Self {
        let node_dimmed: Vec<bool> = graph
            .nodes()
            .iter()
            .map(|node| !state.matches(node))
            .collect();
        let edge_dimmed = graph
            .edges()
            .iter()
            .map(|&(source, target)| node_dimmed[source] || node_dimmed[target])
            .collect();
        Self {
            node_dimmed,
            edge_dimmed,
        }
    }
}

/// Distinct facet values offered to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    pub traders: Vec<String>,
    pub locations: Vec<String>,
    /// Offer an "unknown" trader option when any quest lacks a giver.
    pub unknown_trader: bool,
    /// Offer an "unknown" location option when any quest lacks a map.
    pub unknown_location: bool,
}

impl FacetOptions {
    pub fn discover(graph: &QuestGraph) -> Self {
        let mut traders: BTreeSet<String> = BTreeSet::new();
        let mut locations: BTreeSet<String> = BTreeSet::new();
        let mut unknown_trader = false;
        let mut unknown_location = false;
        for node in graph.nodes() {
            match &node.given_by {
                Some(trader) => {
                    traders.insert(trader.clone());
                }
                None => unknown_trader = true,
            }
            let node_locations = split_locations(node.location.as_deref());
            if node_locations.is_empty() {
                unknown_location = true;
            }
            locations.extend(node_locations);
        }
        Self {
            traders: traders.into_iter().collect(),
            locations: locations.into_iter().collect(),
            unknown_trader,
            unknown_location,
        }
    }
}
