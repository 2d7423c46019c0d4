use codeviz_api::{ApiError, SearchHit};
use std::time::{Duration, Instant};

/// Quiet period before a query is sent to the backend.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries shorter than this (after trimming) never reach the network.
pub const MIN_QUERY_LEN: usize = 2;

/// Work order for the fetch worker: one search request tagged with the
/// sequence number it must answer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

/// Debounced symbol search with last-issued-query-wins staleness handling.
///
/// The debounce is modeled as a deadline polled by the caller each frame
/// rather than an OS timer, so the only scheduled resource is plain struct
/// state that vanishes when the coordinator is dropped. Responses carry the
/// sequence number of the request they answer; anything but the most
/// recently issued sequence is discarded, so a slow response for an old
/// query can never overwrite results for a newer one.
pub struct SearchCoordinator {
    query: String,
    deadline: Option<Instant>,
    seq: u64,
    results: Vec<SearchHit>,
    loading: bool,
    panel_open: bool,
}

impl Default for SearchCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            deadline: None,
            seq: 0,
            results: Vec::new(),
            loading: false,
            panel_open: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Record a keystroke. Restarts the debounce window; nothing is issued
    /// until the query has been quiet for [`SEARCH_DEBOUNCE`].
    pub fn on_query_changed(&mut self, raw: &str, now: Instant) {
        self.query = raw.to_string();
        self.deadline = Some(now + SEARCH_DEBOUNCE);
    }

    /// Poll the debounce window. Returns a ticket when a request should be
    /// issued; short queries clear and hide the results instead.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;

        if self.query.trim().len() < MIN_QUERY_LEN {
            self.results.clear();
            self.loading = false;
            self.panel_open = false;
            return None;
        }

        self.seq += 1;
        self.loading = true;
        self.panel_open = true;
        Some(SearchTicket {
            seq: self.seq,
            query: self.query.clone(),
        })
    }

    /// Apply a completed search. Only the most recently issued request wins;
    /// stale completions are dropped. Failures clear the results silently —
    /// the panel shows its empty state, never an error banner.
    pub fn apply_results(&mut self, seq: u64, result: Result<Vec<SearchHit>, ApiError>) {
        if seq != self.seq {
            tracing::debug!(seq, current = self.seq, "discarding stale search response");
            return;
        }
        self.loading = false;
        match result {
            Ok(hits) => self.results = hits,
            Err(err) => {
                tracing::warn!(error = %err, "search failed");
                self.results.clear();
            }
        }
    }

    /// Reopen the panel on focus if there is anything to show.
    pub fn reopen_if_results(&mut self) {
        if !self.results.is_empty() {
            self.panel_open = true;
        }
    }

    /// Close the result panel (outside click / escape).
    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// A hit was chosen: clear the query and dismiss the panel.
    pub fn on_hit_selected(&mut self) {
        self.query.clear();
        self.panel_open = false;
    }

    /// Whether a debounce window is currently pending; callers use this to
    /// keep polling while the clock runs down.
    pub fn has_pending_deadline(&self) -> bool {
        self.deadline.is_some()
    }
}
