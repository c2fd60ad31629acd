//! Ancestry and descendant traversal for highlighting.
//!
//! Depth-first over the reverse/forward adjacency with a visited-set guard,
//! so cyclic prerequisite data cannot loop. Traversal is read-only; a
//! dangling id yields an empty set rather than an error.

use std::collections::HashSet;

use crate::graph::QuestGraph;

/// Inclusive set of ids reachable through "previous" edges from `id`.
pub fn collect_ancestors(graph: &QuestGraph, id: &str) -> HashSet<String> {
    collect(graph, id, |g, idx| g.predecessors(idx))
}

/// Inclusive set of ids reachable through "leads to" edges from `id`.
pub fn collect_descendants(graph: &QuestGraph, id: &str) -> HashSet<String> {
    collect(graph, id, |g, idx| g.successors(idx))
}

fn collect<'g>(
    graph: &'g QuestGraph,
    id: &str,
    neighbors: impl Fn(&'g QuestGraph, usize) -> &'g [usize],
) -> HashSet<String> {
    let Some(start) = graph.index_of(id) else {
        return HashSet::new();
    };
    let mut visited: HashSet<usize> = HashSet::new();
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        for &next in neighbors(graph, current) {
            if !visited.contains(&next) {
                stack.push(next);
            }
        }
    }
    visited
        .into_iter()
        .map(|idx| graph.node(idx).id.clone())
        .collect()
}

/// Highlight state for a focused node: its full ancestry and descendants.
#[derive(Debug, Clone, Default)]
pub struct Highlight {
    pub focused: Option<String>,
    pub ancestors: HashSet<String>,
    pub descendants: HashSet<String>,
}

impl Highlight {
    /// Computes the highlight sets for a focused node id.
    pub fn for_node(graph: &QuestGraph, id: &str) -> Self {
        Self {
            focused: graph.index_of(id).map(|_| id.to_string()),
            ancestors: collect_ancestors(graph, id),
            descendants: collect_descendants(graph, id),
        }
    }

    pub fn is_ancestor(&self, id: &str) -> bool {
        self.ancestors.contains(id)
    }

    pub fn is_descendant(&self, id: &str) -> bool {
        self.descendants.contains(id)
    }

    /// An edge renders as part of the ancestor chain when its target is an
    /// ancestor of the focused node.
    pub fn is_ancestor_edge(&self, _source: &str, target: &str) -> bool {
        self.ancestors.contains(target)
    }

    /// An edge renders as part of the descendant chain when both endpoints
    /// are descendants.
    pub fn is_descendant_edge(&self, source: &str, target: &str) -> bool {
        self.descendants.contains(source) && self.descendants.contains(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use questtree_domain::QuestRow;
    use std::collections::HashMap;

    fn row(name: &str, leads_to: Option<&str>) -> QuestRow {
        QuestRow {
            name: name.to_string(),
            leads_to: leads_to.map(str::to_string),
            ..Default::default()
        }
    }

    fn chain_graph() -> QuestGraph {
        // A -> B -> C, plus side branch B -> D.
        let rows = vec![
            row("A", Some("B")),
            row("B", Some("C | D")),
            row("C", None),
            row("D", None),
        ];
        build_graph(&rows, &HashMap::new())
    }

    #[test]
    fn test_ancestors_inclusive_of_self() {
        let graph = chain_graph();
        let ancestors = collect_ancestors(&graph, "C");
        assert!(ancestors.contains("C"));
        assert!(ancestors.contains("B"));
        assert!(ancestors.contains("A"));
        assert!(!ancestors.contains("D"));
    }

    #[test]
    fn test_descendants_inclusive_of_self() {
        let graph = chain_graph();
        let descendants = collect_descendants(&graph, "B");
        assert_eq!(descendants.len(), 3);
        assert!(descendants.contains("B"));
        assert!(descendants.contains("C"));
        assert!(descendants.contains("D"));
    }

    #[test]
    fn test_dag_intersection_is_self() {
        let graph = chain_graph();
        let ancestors = collect_ancestors(&graph, "B");
        let descendants = collect_descendants(&graph, "B");
        let both: Vec<&String> = ancestors.intersection(&descendants).collect();
        assert_eq!(both, vec!["B"]);
    }

    #[test]
    fn test_cycle_safe() {
        let rows = vec![row("A", Some("B")), row("B", Some("A"))];
        let graph = build_graph(&rows, &HashMap::new());
        let ancestors = collect_ancestors(&graph, "A");
        assert_eq!(ancestors.len(), 2);
        let descendants = collect_descendants(&graph, "A");
        assert_eq!(descendants.len(), 2);
    }

    #[test]
    fn test_dangling_id_yields_empty_set() {
        let graph = chain_graph();
        assert!(collect_ancestors(&graph, "Nope").is_empty());
        assert!(collect_descendants(&graph, "Nope").is_empty());
    }

    #[test]
    fn test_highlight_edge_classification() {
        let graph = chain_graph();
        let highlight = Highlight::for_node(&graph, "B");
        // A -> B ends on an ancestor of the focus.
        assert!(highlight.is_ancestor_edge("A", "B"));
        // B -> C connects two descendants.
        assert!(highlight.is_descendant_edge("B", "C"));
        assert!(!highlight.is_descendant_edge("A", "B"));
    }
}
