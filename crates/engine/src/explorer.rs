//! Engine context.
//!
//! One `Explorer` owns the graph, the layout simulation, progress, filter
//! and search state, and the current selection. It is constructed once and
//! every state change routes through its operations - subsystems never reach
//! for ambient globals, and callers never write positions or statuses
//! directly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use questtree_domain::{bucketize, DomainError, ProgressRecord, QuestNode, QuestStatus,
    RewardBucket, UnlockKind};

use crate::explore::{
    search, FacetOptions, FilterState, FilterView, Highlight, ProgressTracker, SearchMode,
    SearchResults, TextFacet,
};
use crate::graph::QuestGraph;
use crate::infrastructure::KeyValueStore;
use crate::layout::{LayoutConfig, SimPhase, Simulation};

/// Current view center, recentered on focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_x: f32,
    pub center_y: f32,
}

/// Everything the detail panel needs for the selected quest.
pub struct SelectionDetails<'a> {
    pub node: &'a QuestNode,
    pub status: QuestStatus,
    pub important: bool,
    pub available: bool,
    pub reward_buckets: Vec<RewardBucket>,
}

/// The interactive exploration engine context.
pub struct Explorer {
    graph: QuestGraph,
    layout: Simulation,
    progress: ProgressTracker,
    filter: FilterState,
    filter_view: FilterView,
    facets: FacetOptions,
    search_mode: SearchMode,
    search_query: String,
    selected: Option<String>,
    highlight: Highlight,
    viewport: Viewport,
}

impl Explorer {
    /// Builds the context, loads persisted progress, preselects the first
    /// quest, and warms the layout.
    pub fn new(
        graph: QuestGraph,
        store: Arc<dyn KeyValueStore>,
        config: LayoutConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let viewport = Viewport {
            center_x: config.width / 2.0,
            center_y: config.height / 2.0,
        };
        let mut layout = Simulation::new(&graph, config, rng);
        let mut progress = ProgressTracker::load(store);
        progress.refresh_available(&graph);
        let facets = FacetOptions::discover(&graph);
        let filter = FilterState::default();
        let filter_view = FilterView::compute(&graph, &filter);

        let first = graph.nodes().first().map(|n| n.id.clone());
        let highlight = first
            .as_deref()
            .map(|id| Highlight::for_node(&graph, id))
            .unwrap_or_default();
        if !graph.is_empty() {
            layout.warmup();
        }

        Self {
            graph,
            layout,
            progress,
            filter,
            filter_view,
            facets,
            search_mode: SearchMode::default(),
            search_query: String::new(),
            selected: first,
            highlight,
            viewport,
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn graph(&self) -> &QuestGraph {
        &self.graph
    }

    pub fn layout(&self) -> &Simulation {
        &self.layout
    }

    pub fn phase(&self) -> SimPhase {
        self.layout.phase()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_view(&self) -> &FilterView {
        &self.filter_view
    }

    pub fn facet_options(&self) -> &FacetOptions {
        &self.facets
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Detail-panel data for the selected quest.
    pub fn selection_details(&self) -> Option<SelectionDetails<'_>> {
        let id = self.selected.as_deref()?;
        let node = self.graph.node_by_id(id)?;
        Some(SelectionDetails {
            node,
            status: self.progress.status(id),
            important: self.progress.is_important(id),
            available: self.progress.is_available(id),
            reward_buckets: bucketize(&node.rewards),
        })
    }

    // =========================================================================
    // Layout loop
    // =========================================================================

    /// Advances the simulation; a no-op once settled.
    pub fn step(&mut self, dt: f32) {
        self.layout.step(dt);
    }

    pub fn begin_drag(&mut self, id: &str) {
        if let Some(idx) = self.graph.index_of(id) {
            self.layout.begin_drag(idx);
        }
    }

    pub fn drag_to(&mut self, id: &str, x: f32, y: f32) {
        if let Some(idx) = self.graph.index_of(id) {
            self.layout.drag_to(idx, x, y);
        }
    }

    pub fn end_drag(&mut self, id: &str) {
        if let Some(idx) = self.graph.index_of(id) {
            self.layout.end_drag(idx);
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects a quest and recomputes its ancestry/descendant highlight.
    ///
    /// Unresolvable ids are ignored.
    pub fn select(&mut self, id: &str) -> bool {
        if self.graph.index_of(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        self.highlight = Highlight::for_node(&self.graph, id);
        true
    }

    /// Selects a quest, recenters the viewport on it, and re-warms the
    /// layout.
    pub fn focus(&mut self, id: &str) -> bool {
        if !self.select(id) {
            return false;
        }
        if let Some(idx) = self.graph.index_of(id) {
            let body = self.layout.body(idx);
            self.viewport = Viewport {
                center_x: body.x,
                center_y: body.y,
            };
        }
        self.layout.warmup();
        true
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// Sets a quest's status from a raw status string; persists and rebuilds
    /// availability.
    pub fn set_status(&mut self, id: &str, raw: &str) -> QuestStatus {
        self.progress.set_status(&self.graph, id, raw)
    }

    pub fn toggle_important(&mut self, id: &str) -> bool {
        self.progress.toggle_important(id)
    }

    pub fn clear_progress(&mut self) {
        self.progress.clear(&self.graph);
    }

    /// Imports progress JSON; on failure prior progress is untouched.
    pub fn import_progress(&mut self, text: &str) -> Result<usize, DomainError> {
        self.progress.import_json(&self.graph, text)
    }

    pub fn export_progress(&self, now: DateTime<Utc>) -> ProgressRecord {
        self.progress.export(now)
    }

    pub fn export_progress_json(&self, now: DateTime<Utc>) -> Result<String, DomainError> {
        self.progress.export_json(now)
    }

    // =========================================================================
    // Filter
    // =========================================================================

    pub fn set_trader_facet(&mut self, facet: TextFacet) {
        self.filter.trader = facet;
        self.apply_filters();
    }

    pub fn set_location_facet(&mut self, facet: TextFacet) {
        self.filter.location = facet;
        self.apply_filters();
    }

    pub fn toggle_unlock_kind(&mut self, kind: UnlockKind) {
        if !self.filter.unlocks.remove(&kind) {
            self.filter.unlocks.insert(kind);
        }
        self.apply_filters();
    }

    pub fn set_xp_range(&mut self, min: u32, max: u32) {
        self.filter.xp_min = min.min(max);
        self.filter.xp_max = max.max(min);
        self.apply_filters();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        self.filter_view = FilterView::compute(&self.graph, &self.filter);
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search_mode = mode;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Evaluates the current query in the current mode.
    pub fn search_results(&self) -> SearchResults {
        search(
            &self.graph,
            &self.filter,
            self.search_mode,
            &self.search_query,
        )
    }
}

/// Stable trader color assignment for rendering collaborators.
pub fn trader_color(trader: Option<&str>) -> &'static str {
    match trader {
        Some("Prapor") => "#3b82f6",
        Some("Therapist") => "#22d3ee",
        Some("Fence") => "#a78bfa",
        Some("Skier") => "#f59e0b",
        Some("Peacekeeper") => "#34d399",
        Some("Mechanic") => "#f87171",
        Some("Ragman") => "#c084fc",
        Some("Jaeger") => "#f97316",
        Some("Lightkeeper") => "#eab308",
        Some("BTR Driver") => "#06b6d4",
        Some("Ref") => "#8b5cf6",
        _ => "#64748b",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::infrastructure::MemoryStore;
    use questtree_domain::QuestRow;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn explorer() -> Explorer {
        let rows = vec![
            QuestRow {
                name: "Debut".to_string(),
                given_by: Some("Prapor".to_string()),
                rewards: Some("5,200 EXP | 2 × Salewa".to_string()),
                leads_to: Some("Checking".to_string()),
                ..Default::default()
            },
            QuestRow {
                name: "Checking".to_string(),
                given_by: Some("Prapor".to_string()),
                leads_to: Some("Shootout Picnic".to_string()),
                ..Default::default()
            },
        ];
        let graph = build_graph(&rows, &HashMap::new());
        let mut rng = StdRng::seed_from_u64(11);
        Explorer::new(
            graph,
            Arc::new(MemoryStore::new()),
            LayoutConfig::default(),
            &mut rng,
        )
    }

    #[test]
    fn test_preselects_first_quest_and_warms() {
        let explorer = explorer();
        assert_eq!(explorer.selected(), Some("Debut"));
        assert_eq!(explorer.phase(), SimPhase::Warming);
        assert!(explorer.highlight().is_descendant("Checking"));
    }

    #[test]
    fn test_select_ignores_unknown_ids() {
        let mut explorer = explorer();
        assert!(!explorer.select("Nope"));
        assert_eq!(explorer.selected(), Some("Debut"));
    }

    #[test]
    fn test_focus_recenters_and_rewarms() {
        let mut explorer = explorer();
        // Run the sim down before focusing again.
        for _ in 0..50 {
            explorer.step(1.0);
        }
        assert!(explorer.focus("Checking"));
        let idx = explorer.graph().index_of("Checking").expect("node exists");
        let body = explorer.layout().body(idx);
        let viewport = explorer.viewport();
        assert_eq!(viewport.center_x, body.x);
        assert_eq!(viewport.center_y, body.y);
        assert_eq!(explorer.phase(), SimPhase::Warming);
    }

    #[test]
    fn test_status_flow_updates_details_and_availability() {
        let mut explorer = explorer();
        assert_eq!(explorer.set_status("Debut", "done"), QuestStatus::Completed);
        assert!(explorer.progress().is_available("Checking"));

        let details = explorer.selection_details().expect("selection");
        assert_eq!(details.status, QuestStatus::Completed);
        assert_eq!(details.reward_buckets.len(), 2);
    }

    #[test]
    fn test_filter_and_search_through_context() {
        let mut explorer = explorer();
        explorer.set_trader_facet(TextFacet::Is("Nobody".to_string()));
        assert!(explorer.filter_view().node_dimmed.iter().all(|&d| d));

        explorer.set_search_mode(SearchMode::Reward);
        explorer.set_search_query("salewa");
        let SearchResults::Groups(groups) = explorer.search_results() else {
            panic!("expected groups");
        };
        assert_eq!(groups[0].item, "Salewa");
        assert!(groups[0].all_dimmed);

        explorer.clear_filters();
        assert!(explorer.filter_view().node_dimmed.iter().all(|&d| !d));
    }

    #[test]
    fn test_trader_palette_has_fallback() {
        assert_eq!(trader_color(Some("Prapor")), "#3b82f6");
        assert_eq!(trader_color(Some("Unknown Guy")), "#64748b");
        assert_eq!(trader_color(None), "#64748b");
    }
}
