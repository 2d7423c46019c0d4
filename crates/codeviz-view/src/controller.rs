use crate::layout::{self, PositionedNode};
use codeviz_api::{ApiError, ExplainResponse, SearchHit};
use codeviz_core::{GraphEdge, GraphNode, NodeId};
use std::collections::HashSet;

/// Shown in place of an explanation when the fetch fails. The selection and
/// the rest of the view are left untouched.
pub const FALLBACK_EXPLANATION: &str = "Unable to generate explanation";

/// The currently selected symbol. Search hits and chat references synthesize
/// selections for symbols that are not necessarily rendered in the graph, so
/// this carries its own display metadata instead of pointing into the node
/// list.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub id: NodeId,
    pub label: String,
    pub full_path: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
}

/// Explanation display state for the current selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Explanation {
    /// Nothing requested (search/reference selections issue no fetch).
    #[default]
    None,
    /// A fetch for the current selection is outstanding.
    Pending,
    Ready(String),
}

/// Work order for the fetch worker: fetch an explanation for `node_id`,
/// answering to `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainTicket {
    pub generation: u64,
    pub node_id: NodeId,
}

/// Top-level owner of the graph page's view state: node/edge data, layout,
/// selection, explanation, and chat panel visibility.
///
/// Every selection bumps a generation counter and explanation completions
/// are applied only when their tag matches the current generation
/// (last-selection-wins). Layout is recomputed only when a new graph payload
/// arrives, never per interaction.
pub struct GraphView {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    positioned: Vec<PositionedNode>,
    selection: Option<Selection>,
    explanation: Explanation,
    preview_code: Option<String>,
    show_chat: bool,
    generation: u64,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphView {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            positioned: Vec::new(),
            selection: None,
            explanation: Explanation::None,
            preview_code: None,
            show_chat: true,
            generation: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn positioned_nodes(&self) -> &[PositionedNode] {
        &self.positioned
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn explanation(&self) -> &Explanation {
        &self.explanation
    }

    pub fn preview_code(&self) -> Option<&str> {
        self.preview_code.as_deref()
    }

    pub fn show_chat(&self) -> bool {
        self.show_chat
    }

    /// Flip chat panel visibility. Purely cosmetic; no data is touched.
    pub fn toggle_chat_panel(&mut self) -> bool {
        self.show_chat = !self.show_chat;
        self.show_chat
    }

    /// Replace the graph wholesale and lay it out for the given viewport
    /// width. Clears selection and explanation; any in-flight explanation
    /// is invalidated by the generation bump.
    ///
    /// Edges pointing at unknown node ids are dropped here, so the canvas
    /// never has to resolve a dangling endpoint.
    pub fn on_graph_loaded(
        &mut self,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        viewport_width: f32,
    ) {
        let ids: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        let (edges, dangling): (Vec<_>, Vec<_>) = edges
            .into_iter()
            .partition(|e| ids.contains(&e.source) && ids.contains(&e.target));
        for edge in &dangling {
            tracing::warn!(
                edge = %edge.id,
                source = %edge.source,
                target = %edge.target,
                "dropping edge with missing endpoint"
            );
        }

        self.positioned = layout::layout(&nodes, viewport_width);
        self.nodes = nodes;
        self.edges = edges;
        self.generation += 1;
        self.selection = None;
        self.explanation = Explanation::None;
        self.preview_code = None;
    }

    /// Select a rendered node. The selection is applied synchronously; the
    /// returned ticket asks the caller to fetch an explanation which is
    /// applied later via [`GraphView::apply_explanation`].
    pub fn select_node(&mut self, node_id: &NodeId) -> Option<ExplainTicket> {
        let Some(node) = self.nodes.iter().find(|n| &n.id == node_id) else {
            tracing::warn!(node = %node_id, "selection for unknown node ignored");
            return None;
        };

        self.generation += 1;
        self.selection = Some(Selection {
            id: node.id.clone(),
            label: node.label.clone(),
            full_path: node.full_path.clone(),
            start_line: node.start_line,
            end_line: node.end_line,
        });
        self.explanation = Explanation::Pending;
        self.preview_code = None;

        Some(ExplainTicket {
            generation: self.generation,
            node_id: node_id.clone(),
        })
    }

    /// Select a symbol from a search hit. The hit's name doubles as the id;
    /// the symbol need not exist in the rendered graph and no explanation
    /// fetch is issued.
    pub fn select_search_hit(&mut self, hit: &SearchHit) {
        self.generation += 1;
        self.selection = Some(Selection {
            id: NodeId::new(hit.name.clone()),
            label: hit.name.clone(),
            full_path: hit.file_path.clone(),
            start_line: hit.start_line,
            end_line: hit.end_line,
        });
        self.explanation = Explanation::None;
        self.preview_code = None;
    }

    /// Jump to a file/line range cited by a chat answer.
    pub fn select_reference(&mut self, file: &str, start_line: u32, end_line: u32) {
        self.generation += 1;
        self.selection = Some(Selection {
            id: NodeId::new(file),
            label: file.to_string(),
            full_path: Some(file.to_string()),
            start_line: Some(start_line),
            end_line: Some(end_line),
        });
        self.explanation = Explanation::None;
        self.preview_code = None;
    }

    pub fn clear_selection(&mut self) {
        self.generation += 1;
        self.selection = None;
        self.explanation = Explanation::None;
        self.preview_code = None;
    }

    /// Apply an explanation completion. Discarded unless its generation tag
    /// matches the current selection's, so a slow response for an earlier
    /// selection can never overwrite a later one. A failure degrades to the
    /// fixed fallback text without disturbing the selection.
    pub fn apply_explanation(
        &mut self,
        generation: u64,
        result: Result<ExplainResponse, ApiError>,
    ) {
        if generation != self.generation || self.selection.is_none() {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale explanation response"
            );
            return;
        }

        match result {
            Ok(response) => {
                self.explanation = Explanation::Ready(response.explanation);
                self.preview_code = Some(response.code);
            }
            Err(err) => {
                tracing::warn!(error = %err, "explanation fetch failed");
                self.explanation = Explanation::Ready(FALLBACK_EXPLANATION.to_string());
            }
        }
    }
}
