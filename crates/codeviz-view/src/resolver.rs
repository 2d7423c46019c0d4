use crate::controller::{Explanation, ExplainTicket, Selection};
use codeviz_core::{NodeId, RepoId};

/// Fully addressed explanation fetch, ready for the fetch worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    pub repo_id: RepoId,
    pub node_id: NodeId,
    pub generation: u64,
}

/// Turns selection tickets into backend requests and selection state into a
/// displayable preview.
///
/// Deliberately uncached: reselecting a node re-issues the fetch. Display
/// metadata (file name, line range) always comes from the selected node's
/// stored metadata, never from the response.
pub struct CodePreviewResolver {
    repo_id: RepoId,
}

impl CodePreviewResolver {
    pub fn new(repo_id: RepoId) -> Self {
        Self { repo_id }
    }

    pub fn repo_id(&self) -> &RepoId {
        &self.repo_id
    }

    pub fn request_for(&self, ticket: &ExplainTicket) -> ExplainRequest {
        ExplainRequest {
            repo_id: self.repo_id.clone(),
            node_id: ticket.node_id.clone(),
            generation: ticket.generation,
        }
    }
}

/// Everything the code preview panel needs to render one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct CodePreview {
    pub file_name: String,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub code: String,
    pub explanation: Option<String>,
    pub explanation_pending: bool,
}

impl CodePreview {
    /// Assemble the preview for a selection. Until the resolver has supplied
    /// real code, a placeholder body names the selected symbol.
    pub fn for_selection(
        selection: &Selection,
        explanation: &Explanation,
        code: Option<&str>,
    ) -> Self {
        let (explanation_text, pending) = match explanation {
            Explanation::Ready(text) => (Some(text.clone()), false),
            Explanation::Pending => (None, true),
            Explanation::None => (None, false),
        };

        Self {
            file_name: selection
                .full_path
                .clone()
                .unwrap_or_else(|| selection.label.clone()),
            start_line: selection.start_line,
            end_line: selection.end_line,
            code: code
                .map(str::to_string)
                .unwrap_or_else(|| format!("[Code for {}]", selection.label)),
            explanation: explanation_text,
            explanation_pending: pending,
        }
    }

    /// First displayed line number; code bodies without metadata start at 1.
    pub fn first_line(&self) -> u32 {
        self.start_line.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> Selection {
        Selection {
            id: NodeId::new("parse:src/parser.py"),
            label: "parse".to_string(),
            full_path: Some("src/parser.py".to_string()),
            start_line: Some(10),
            end_line: Some(42),
        }
    }

    #[test]
    fn test_requests_carry_repo_and_generation() {
        let resolver = CodePreviewResolver::new(RepoId("r-123".to_string()));
        let ticket = ExplainTicket {
            generation: 7,
            node_id: NodeId::new("parse:src/parser.py"),
        };

        let request = resolver.request_for(&ticket);
        assert_eq!(request.repo_id.as_str(), "r-123");
        assert_eq!(request.generation, 7);
    }

    #[test]
    fn test_preview_metadata_comes_from_selection_not_response() {
        let preview = CodePreview::for_selection(
            &selection(),
            &Explanation::Ready("It parses configs.".to_string()),
            Some("def parse(): ..."),
        );

        assert_eq!(preview.file_name, "src/parser.py");
        assert_eq!(preview.start_line, Some(10));
        assert_eq!(preview.explanation.as_deref(), Some("It parses configs."));
        assert_eq!(preview.code, "def parse(): ...");
    }

    #[test]
    fn test_preview_falls_back_to_label_and_placeholder_code() {
        let mut sel = selection();
        sel.full_path = None;
        let preview = CodePreview::for_selection(&sel, &Explanation::Pending, None);

        assert_eq!(preview.file_name, "parse");
        assert_eq!(preview.code, "[Code for parse]");
        assert!(preview.explanation_pending);
        assert!(preview.explanation.is_none());
    }

    #[test]
    fn test_first_line_defaults_to_one() {
        let mut sel = selection();
        sel.start_line = None;
        let preview = CodePreview::for_selection(&sel, &Explanation::None, None);
        assert_eq!(preview.first_line(), 1);
    }
}
