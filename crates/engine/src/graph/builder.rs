//! Graph construction from row-oriented input.
//!
//! Rows are merged into a deduplicated node set keyed by quest name; every
//! name mentioned in a `previous`/`leads_to` list materializes as at least a
//! stub node, so the output never contains dangling ids. Depth assignment is
//! cycle-tolerant: multi-source BFS from the root set, relaxing a neighbor's
//! depth whenever a shorter path is found. Pushing depths forward through
//! cycles would not terminate; shortest-depth-from-root is the safe
//! substitute.

use std::collections::{BTreeSet, HashMap, VecDeque};

use questtree_domain::{split_relations, QuestNode, QuestRow};

use super::QuestGraph;

const WIKI_BASE: &str = "https://escapefromtarkov.fandom.com/wiki/";

/// Resolves a quest's wiki URL: the link map wins, otherwise a canonical
/// URL is synthesized from the name (spaces become underscores).
fn resolved_url(name: &str, link_map: &HashMap<String, String>) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    if let Some(href) = link_map.get(name) {
        return Some(href.clone());
    }
    let slug = urlencoding::encode(&name.replace(' ', "_")).into_owned();
    Some(format!("{WIKI_BASE}{slug}"))
}

/// Builds the deduplicated quest graph from source rows and an optional
/// title-to-href link map.
pub fn build_graph(rows: &[QuestRow], link_map: &HashMap<String, String>) -> QuestGraph {
    let mut nodes: Vec<QuestNode> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut edge_set: BTreeSet<(String, String)> = BTreeSet::new();

    let mut ensure_node = |nodes: &mut Vec<QuestNode>, name: &str| -> usize {
        if let Some(&idx) = index.get(name) {
            return idx;
        }
        let idx = nodes.len();
        nodes.push(QuestNode::stub(name, resolved_url(name, link_map)));
        index.insert(name.to_string(), idx);
        idx
    };

    for row in rows {
        let name = row.name.trim();
        if name.is_empty() {
            continue;
        }
        let idx = ensure_node(&mut nodes, name);
        nodes[idx].merge_row(row);

        for prev in split_relations(row.previous.as_deref()) {
            ensure_node(&mut nodes, &prev);
            edge_set.insert((prev, name.to_string()));
        }
        for next in split_relations(row.leads_to.as_deref()) {
            ensure_node(&mut nodes, &next);
            edge_set.insert((name.to_string(), next));
        }
    }

    // BTreeSet iteration gives the sorted (source, target) order the
    // serialization contract expects.
    let edge_pairs: Vec<(usize, usize)> = edge_set
        .iter()
        .filter_map(|(s, t)| Some((*index.get(s)?, *index.get(t)?)))
        .collect();

    let depths = assign_depths(nodes.len(), &edge_pairs);
    for (node, depth) in nodes.iter_mut().zip(depths) {
        node.depth = depth;
    }

    QuestGraph::new(nodes, edge_pairs)
}

/// Multi-source BFS depth assignment, tolerant of cycles.
///
/// Roots are all zero-in-degree nodes; if none exist (the whole graph is
/// cyclic) every node seeds at depth 0. A neighbor's depth relaxes down
/// whenever a shorter path is found, so diamond-shaped prerequisite
/// structures converge to the same depth regardless of traversal order.
/// Relaxation only ever lowers a depth (bounded below by zero), so the pass
/// terminates on any input, cyclic included. Unreachable nodes default to 0.
fn assign_depths(node_count: usize, edges: &[(usize, usize)]) -> Vec<u32> {
    if node_count == 0 {
        return Vec::new();
    }

    let mut indegree = vec![0usize; node_count];
    let mut adjacency = vec![Vec::new(); node_count];
    for &(source, target) in edges {
        indegree[target] += 1;
        adjacency[source].push(target);
    }

    let roots: Vec<usize> = {
        let zero_in: Vec<usize> = (0..node_count).filter(|&n| indegree[n] == 0).collect();
        if zero_in.is_empty() {
            (0..node_count).collect()
        } else {
            zero_in
        }
    };

    let mut depths = vec![u32::MAX; node_count];
    let mut queue: VecDeque<usize> = VecDeque::new();
    for &root in &roots {
        depths[root] = 0;
        queue.push_back(root);
    }

    while let Some(current) = queue.pop_front() {
        let next_depth = depths[current].saturating_add(1);
        for &neighbor in &adjacency[current] {
            if next_depth < depths[neighbor] {
                depths[neighbor] = next_depth;
                queue.push_back(neighbor);
            }
        }
    }

    // Isolated leftovers (unreachable from any root) sit in column 0.
    for depth in &mut depths {
        if *depth == u32::MAX {
            *depth = 0;
        }
    }
    depths
}
