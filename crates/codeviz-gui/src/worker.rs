//! Fetch worker: runs blocking backend calls off the UI thread and reports
//! completions over a channel drained once per frame.
//!
//! All view state stays on the UI thread; a completion only ever reaches it
//! as a tagged message, so there is no shared mutable state and no locking.
//! Staleness is handled by the view layer's generation/sequence tags, not
//! here — the worker never cancels anything.

use codeviz_api::{
    AnalyzeResponse, ApiError, Backend, ChatResponse, ExplainResponse, GraphResponse,
    SearchResponse,
};
use codeviz_core::RepoId;
use codeviz_view::{ChatTicket, ExplainRequest, SearchTicket};
use crossbeam_channel::{Receiver, Sender, unbounded};
use eframe::egui;
use std::sync::Arc;

pub enum WorkRequest {
    Analyze { url: String },
    LoadGraph { repo_id: RepoId },
    Explain(ExplainRequest),
    Search { repo_id: RepoId, ticket: SearchTicket },
    Chat { repo_id: RepoId, ticket: ChatTicket },
}

pub enum WorkResult {
    Analyzed(Result<AnalyzeResponse, ApiError>),
    Graph(Result<GraphResponse, ApiError>),
    Explained {
        generation: u64,
        result: Result<ExplainResponse, ApiError>,
    },
    SearchDone {
        seq: u64,
        query: String,
        result: Result<SearchResponse, ApiError>,
    },
    ChatDone {
        seq: u64,
        result: Result<ChatResponse, ApiError>,
    },
}

pub struct FetchWorker {
    backend: Arc<dyn Backend>,
    tx: Sender<WorkResult>,
    rx: Receiver<WorkResult>,
    ctx: egui::Context,
}

impl FetchWorker {
    pub fn new(backend: Arc<dyn Backend>, ctx: egui::Context) -> Self {
        let (tx, rx) = unbounded();
        Self {
            backend,
            tx,
            rx,
            ctx,
        }
    }

    /// Run one request on its own thread. The completion lands on the result
    /// channel and wakes the UI with a repaint request.
    pub fn submit(&self, request: WorkRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();

        std::thread::spawn(move || {
            let result = match request {
                WorkRequest::Analyze { url } => {
                    WorkResult::Analyzed(backend.create_analysis(&url))
                }
                WorkRequest::LoadGraph { repo_id } => {
                    WorkResult::Graph(backend.fetch_graph(&repo_id))
                }
                WorkRequest::Explain(request) => WorkResult::Explained {
                    generation: request.generation,
                    result: backend.fetch_explanation(&request.repo_id, &request.node_id),
                },
                WorkRequest::Search { repo_id, ticket } => WorkResult::SearchDone {
                    seq: ticket.seq,
                    result: backend.search(&repo_id, &ticket.query),
                    query: ticket.query,
                },
                WorkRequest::Chat { repo_id, ticket } => WorkResult::ChatDone {
                    seq: ticket.seq,
                    result: backend.chat(&repo_id, &ticket.message),
                },
            };
            // The app may have shut down; a closed channel is fine.
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Drain completed work. Called once per frame on the UI thread.
    pub fn try_results(&self) -> Vec<WorkResult> {
        self.rx.try_iter().collect()
    }
}
