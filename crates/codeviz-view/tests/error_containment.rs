//! Failures in one subsystem must never corrupt or block another: a failing
//! explanation leaves search and chat fully functional, a failing search
//! leaves the graph and chat untouched, and a failing chat request only adds
//! an error turn to its own transcript.

use codeviz_api::{ApiError, ChatResponse, ExplainResponse, SearchHit};
use codeviz_core::{GraphEdge, GraphNode, NodeId, NodeKind};
use codeviz_view::{
    ChatSession, Explanation, GraphView, SearchCoordinator, FALLBACK_EXPLANATION,
};
use std::time::{Duration, Instant};

fn node(id: &str, kind: NodeKind) -> GraphNode {
    GraphNode {
        id: NodeId::new(id),
        kind,
        label: id.to_string(),
        full_path: Some(format!("src/{id}.py")),
        start_line: Some(1),
        end_line: Some(30),
    }
}

fn hit(name: &str) -> SearchHit {
    SearchHit {
        name: name.to_string(),
        kind: "Function".to_string(),
        file_path: None,
        start_line: None,
        end_line: None,
    }
}

fn loaded_view() -> GraphView {
    let mut view = GraphView::new();
    view.on_graph_loaded(
        vec![node("main", NodeKind::Function), node("app", NodeKind::File)],
        Vec::<GraphEdge>::new(),
        1280.0,
    );
    view
}

#[test]
fn explanation_failure_leaves_every_other_subsystem_working() {
    let mut view = loaded_view();
    let mut search = SearchCoordinator::new();
    let mut chat = ChatSession::new();

    let ticket = view.select_node(&NodeId::new("main")).unwrap();
    view.apply_explanation(ticket.generation, Err(ApiError::backend("llm unavailable")));

    // The selection shows the fallback text; graph data is intact.
    assert_eq!(
        *view.explanation(),
        Explanation::Ready(FALLBACK_EXPLANATION.to_string())
    );
    assert!(view.selection().is_some());
    assert_eq!(view.node_count(), 2);
    assert_eq!(view.positioned_nodes().len(), 2);

    // Search still issues and applies requests.
    let t0 = Instant::now();
    search.on_query_changed("ma", t0);
    let ticket = search.poll(t0 + Duration::from_millis(300)).unwrap();
    search.apply_results(ticket.seq, Ok(vec![hit("main")]));
    assert_eq!(search.results().len(), 1);

    // Chat still sends and receives.
    let ticket = chat.send("what broke?").unwrap();
    chat.apply_response(
        ticket.seq,
        Ok(ChatResponse {
            response: "Nothing structural.".to_string(),
            references: Vec::new(),
        }),
    );
    assert!(!chat.is_loading());
}

#[test]
fn search_failure_is_contained_to_the_result_list() {
    let mut view = loaded_view();
    let mut search = SearchCoordinator::new();

    let explain = view.select_node(&NodeId::new("main")).unwrap();

    let t0 = Instant::now();
    search.on_query_changed("main", t0);
    let ticket = search.poll(t0 + Duration::from_millis(300)).unwrap();
    search.apply_results(ticket.seq, Err(ApiError::backend("index offline")));

    // Empty-state results, no error banner state to leak anywhere else.
    assert!(search.results().is_empty());
    assert!(!search.is_loading());

    // The selection flow is untouched and still accepts its explanation.
    view.apply_explanation(
        explain.generation,
        Ok(ExplainResponse {
            explanation: "Entry point.".to_string(),
            code: "def main(): ...".to_string(),
        }),
    );
    assert_eq!(
        *view.explanation(),
        Explanation::Ready("Entry point.".to_string())
    );
}

#[test]
fn chat_failure_only_appends_an_error_turn() {
    let mut view = loaded_view();
    let mut chat = ChatSession::new();

    let before_nodes = view.positioned_nodes().to_vec();

    let ticket = chat.send("explain the graph").unwrap();
    chat.apply_response(ticket.seq, Err(ApiError::backend("model overloaded")));

    let last = chat.messages().last().unwrap();
    assert!(last.content.starts_with("Sorry, I encountered an error:"));
    assert!(!chat.is_loading());

    // Graph state is byte-for-byte what it was.
    assert_eq!(view.positioned_nodes(), before_nodes.as_slice());

    // And the session accepts the next message.
    assert!(chat.send("try again").is_ok());
}
