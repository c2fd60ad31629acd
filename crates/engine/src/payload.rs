//! Serialized graph contract for rendering collaborators.
//!
//! Nodes and links are emitted as two flat arrays; links reference nodes by
//! id. The shape is stable so downstream renderers can bind to it without
//! knowing anything about how the graph was assembled.

use serde::{Deserialize, Serialize};

use questtree_domain::QuestNode;

use crate::graph::QuestGraph;

/// One quest node on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: String,
    /// Mirrors `id`; kept so renderers can bind a label field directly.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialogue: Vec<String>,
    pub requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_level: Option<u32>,
    pub objectives: Vec<String>,
    pub rewards: Vec<String>,
    pub previous: Vec<String>,
    pub leads_to: Vec<String>,
    /// Graph depth, used as the initial layout column.
    pub level: u32,
}

impl NodePayload {
    fn from_node(node: &QuestNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.id.clone(),
            location: node.location.clone(),
            given_by: node.given_by.clone(),
            url: node.url.clone(),
            dialogue: node.dialogue.clone(),
            requirements: node.requirements.clone(),
            required_level: node.required_level,
            objectives: node.objectives.clone(),
            rewards: node.rewards.clone(),
            previous: node.previous.clone(),
            leads_to: node.leads_to.clone(),
            level: node.depth,
        }
    }
}

/// One directed unlock edge on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePayload {
    pub source: String,
    pub target: String,
}

/// The complete serialized graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    pub nodes: Vec<NodePayload>,
    pub links: Vec<EdgePayload>,
}

impl GraphPayload {
    pub fn from_graph(graph: &QuestGraph) -> Self {
        let nodes = graph.nodes().iter().map(NodePayload::from_node).collect();
        let links = graph
            .edges()
            .iter()
            .map(|&(source, target)| EdgePayload {
                source: graph.node(source).id.clone(),
                target: graph.node(target).id.clone(),
            })
            .collect();
        Self { nodes, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use questtree_domain::QuestRow;
    use std::collections::HashMap;

    fn fixture_graph() -> QuestGraph {
        let rows = vec![
            QuestRow {
                name: "Debut".to_string(),
                given_by: Some("Prapor".to_string()),
                rewards: Some("5,200 EXP".to_string()),
                leads_to: Some("Checking".to_string()),
                ..Default::default()
            },
            QuestRow {
                name: "Checking".to_string(),
                ..Default::default()
            },
        ];
        build_graph(&rows, &HashMap::new())
    }

    #[test]
    fn test_payload_mirrors_graph_shape() {
        let graph = fixture_graph();
        let payload = GraphPayload::from_graph(&graph);
        assert_eq!(payload.nodes.len(), 2);
        assert_eq!(payload.links.len(), 1);
        assert_eq!(payload.links[0].source, "Debut");
        assert_eq!(payload.links[0].target, "Checking");

        let debut = &payload.nodes[0];
        assert_eq!(debut.id, "Debut");
        assert_eq!(debut.name, "Debut");
        assert_eq!(debut.level, 0);
        assert_eq!(payload.nodes[1].level, 1);
    }

    #[test]
    fn test_json_omits_absent_optionals() {
        let graph = fixture_graph();
        let payload = GraphPayload::from_graph(&graph);
        let json = serde_json::to_string(&payload).expect("serializable");
        assert!(json.contains(r#""given_by":"Prapor""#));
        assert!(!json.contains("dialogue"));

        let parsed: GraphPayload = serde_json::from_str(&json).expect("parseable");
        assert_eq!(parsed, payload);
    }
}
