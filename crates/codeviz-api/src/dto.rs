use codeviz_core::{CodeReference, EdgeId, GraphData, GraphEdge, GraphNode, NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// Result of submitting a repository for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub repo_id: String,
    pub status: String,
    pub node_count: u32,
}

/// Wire shape of one graph node. The backend nests display metadata under
/// `data` and tags the kind as `type`; [`GraphNodeDto::into_node`] flattens
/// this into the domain type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNodeDto {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: GraphNodeData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNodeData {
    pub label: String,
    #[serde(rename = "fullPath", default)]
    pub full_path: Option<String>,
    #[serde(rename = "startLine", default)]
    pub start_line: Option<u32>,
    #[serde(rename = "endLine", default)]
    pub end_line: Option<u32>,
}

impl GraphNodeDto {
    pub fn into_node(self) -> GraphNode {
        GraphNode {
            id: self.id,
            kind: self.kind,
            label: self.data.label,
            full_path: self.data.full_path,
            start_line: self.data.start_line,
            end_line: self.data.end_line,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdgeDto {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub kind: String,
}

impl GraphEdgeDto {
    pub fn into_edge(self) -> GraphEdge {
        GraphEdge {
            id: self.id,
            source: self.source,
            target: self.target,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNodeDto>,
    pub edges: Vec<GraphEdgeDto>,
}

impl GraphResponse {
    pub fn into_graph_data(self) -> GraphData {
        GraphData {
            nodes: self.nodes.into_iter().map(GraphNodeDto::into_node).collect(),
            edges: self.edges.into_iter().map(GraphEdgeDto::into_edge).collect(),
        }
    }
}

/// Explanation payload for a single node. Uncached by design; every
/// selection re-fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
    pub code: String,
}

/// One symbol search match. `kind` is the backend's capitalized tag
/// (`Function`, `Class`, ...) and is only ever compared as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub start_line: Option<u32>,
    #[serde(default)]
    pub end_line: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub references: Vec<CodeReference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_node_dto_flattens_nested_data() {
        let json = r#"{
            "id": "parse:src/parser.py",
            "type": "function",
            "data": {"label": "parse", "fullPath": "src/parser.py", "startLine": 10, "endLine": 42}
        }"#;
        let node = serde_json::from_str::<GraphNodeDto>(json).unwrap().into_node();
        assert_eq!(node.kind, NodeKind::Function);
        assert_eq!(node.label, "parse");
        assert_eq!(node.full_path.as_deref(), Some("src/parser.py"));
        assert_eq!(node.start_line, Some(10));
    }

    #[test]
    fn test_graph_node_dto_tolerates_missing_optionals() {
        let json = r#"{"id": "r1", "type": "repo", "data": {"label": "my-repo"}}"#;
        let node = serde_json::from_str::<GraphNodeDto>(json).unwrap().into_node();
        assert_eq!(node.kind, NodeKind::Repo);
        assert!(node.full_path.is_none());
        assert!(node.start_line.is_none());
    }

    #[test]
    fn test_chat_response_without_references() {
        let resp: ChatResponse = serde_json::from_str(r#"{"response": "hello"}"#).unwrap();
        assert!(resp.references.is_empty());
    }
}
