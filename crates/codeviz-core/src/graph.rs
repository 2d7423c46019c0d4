use crate::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Category of a graph entity. Drives layout bucketing and node coloring.
///
/// The backend emits lowercase kind strings; anything it invents later maps
/// to [`NodeKind::Other`] instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum NodeKind {
    Repo,
    File,
    Class,
    Function,
    Module,
    Other,
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "repo" => NodeKind::Repo,
            "file" => NodeKind::File,
            "class" => NodeKind::Class,
            "function" => NodeKind::Function,
            "module" => NodeKind::Module,
            _ => NodeKind::Other,
        }
    }
}

/// A node of the structure graph as delivered by the backend.
///
/// Positions and visual styling are *not* part of this type; they are
/// computed per viewport by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub full_path: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
}

/// A directed edge between two nodes. `kind` is the backend's relationship
/// tag (`CONTAINS`, `CALLS`, `HAS_FILE`, ...) and is treated as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: String,
}

/// One complete graph payload. Replaced wholesale on every successful load;
/// there is no incremental patching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_parses_lowercase_wire_values() {
        let kind: NodeKind = serde_json::from_str("\"function\"").unwrap();
        assert_eq!(kind, NodeKind::Function);
    }

    #[test]
    fn test_unknown_node_kind_falls_back_to_other() {
        let kind: NodeKind = serde_json::from_str("\"interface\"").unwrap();
        assert_eq!(kind, NodeKind::Other);
    }

    #[test]
    fn test_node_id_is_transparent_in_serde() {
        let id: NodeId = serde_json::from_str("\"main:src/app.py\"").unwrap();
        assert_eq!(id.as_str(), "main:src/app.py");
    }
}
