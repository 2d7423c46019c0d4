use codeviz_api::{ApiError, ChatResponse};
use codeviz_core::ChatMessage;
use std::collections::VecDeque;
use thiserror::Error;

/// Maximum retained conversation length. Oldest entries are evicted first,
/// regardless of who authored them.
pub const CHAT_HISTORY_CAPACITY: usize = 50;

const GREETING: &str = "Hello! I can help you understand this codebase. \
Ask me anything about its structure, functions, or architecture.";

const ERROR_PREFIX: &str = "Sorry, I encountered an error: ";
const GENERIC_ERROR_DETAIL: &str = "Please try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatSendError {
    #[error("message is empty")]
    Empty,
    #[error("a chat request is already in flight")]
    InFlight,
}

/// Work order for the fetch worker: one chat request tagged with the
/// sequence number its response must echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTicket {
    pub seq: u64,
    pub message: String,
}

/// Ordered, capacity-bounded conversation with request/response correlation.
///
/// Single-flight: at most one request may be outstanding; `send` rejects
/// while one is pending. Failures become ordinary assistant turns so the
/// conversation history is never interrupted by modal errors.
pub struct ChatSession {
    messages: VecDeque<ChatMessage>,
    next_id: u64,
    seq: u64,
    in_flight: Option<u64>,
    scroll_pending: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let mut session = Self {
            messages: VecDeque::with_capacity(CHAT_HISTORY_CAPACITY),
            next_id: 0,
            seq: 0,
            in_flight: None,
            scroll_pending: false,
        };
        let greeting = ChatMessage::assistant(session.allocate_id(), GREETING, Vec::new());
        session.push(greeting);
        session
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Consume the auto-scroll request raised by the last mutation.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    /// Append the user's turn and hand back the request to issue.
    pub fn send(&mut self, input: &str) -> Result<ChatTicket, ChatSendError> {
        if input.trim().is_empty() {
            return Err(ChatSendError::Empty);
        }
        if self.in_flight.is_some() {
            return Err(ChatSendError::InFlight);
        }

        let message = ChatMessage::user(self.allocate_id(), input);
        self.push(message);

        self.seq += 1;
        self.in_flight = Some(self.seq);
        Ok(ChatTicket {
            seq: self.seq,
            message: input.to_string(),
        })
    }

    /// Apply the completion for an issued request. A success appends the
    /// assistant's answer with its references; a failure appends an
    /// assistant-authored error turn instead.
    pub fn apply_response(&mut self, seq: u64, result: Result<ChatResponse, ApiError>) {
        if self.in_flight != Some(seq) {
            tracing::debug!(seq, "discarding chat response for unknown request");
            return;
        }
        self.in_flight = None;

        let message = match result {
            Ok(response) => {
                ChatMessage::assistant(self.allocate_id(), response.response, response.references)
            }
            Err(err) => {
                let detail = if err.message.trim().is_empty() {
                    GENERIC_ERROR_DETAIL
                } else {
                    err.message.as_str()
                };
                ChatMessage::assistant(
                    self.allocate_id(),
                    format!("{ERROR_PREFIX}{detail}"),
                    Vec::new(),
                )
            }
        };
        self.push(message);
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > CHAT_HISTORY_CAPACITY {
            self.messages.pop_front();
        }
        self.scroll_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeviz_core::{CodeReference, Role};

    fn respond(session: &mut ChatSession, ticket: &ChatTicket, text: &str) {
        session.apply_response(
            ticket.seq,
            Ok(ChatResponse {
                response: text.to_string(),
                references: Vec::new(),
            }),
        );
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = ChatSession::new();
        let first = session.messages().next().unwrap();
        assert_eq!(first.role, Role::Assistant);
        assert!(first.content.starts_with("Hello!"));
    }

    #[test]
    fn test_empty_and_whitespace_input_is_rejected() {
        let mut session = ChatSession::new();
        assert_eq!(session.send(""), Err(ChatSendError::Empty));
        assert_eq!(session.send("   \n"), Err(ChatSendError::Empty));
    }

    #[test]
    fn test_second_send_is_rejected_while_in_flight() {
        let mut session = ChatSession::new();
        let ticket = session.send("what does main do?").unwrap();
        assert_eq!(session.send("and this?"), Err(ChatSendError::InFlight));

        respond(&mut session, &ticket, "It boots the app.");
        assert!(session.send("and this?").is_ok());
    }

    #[test]
    fn test_success_appends_assistant_turn_with_references() {
        let mut session = ChatSession::new();
        let ticket = session.send("where is parsing done?").unwrap();
        session.apply_response(
            ticket.seq,
            Ok(ChatResponse {
                response: "In the parser module.".to_string(),
                references: vec![CodeReference {
                    file: "src/parser.py".to_string(),
                    start_line: 5,
                    end_line: 60,
                }],
            }),
        );

        let last = session.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.references.len(), 1);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_failure_becomes_an_assistant_error_turn() {
        let mut session = ChatSession::new();
        let ticket = session.send("hello?").unwrap();
        session.apply_response(ticket.seq, Err(ApiError::backend("model overloaded")));

        let last = session.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Sorry, I encountered an error: model overloaded");
        // History is preserved: greeting + user turn + error turn.
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn test_blank_failure_detail_uses_generic_fallback() {
        let mut session = ChatSession::new();
        let ticket = session.send("hello?").unwrap();
        session.apply_response(ticket.seq, Err(ApiError::backend("  ")));

        let last = session.messages().last().unwrap();
        assert_eq!(last.content, "Sorry, I encountered an error: Please try again.");
    }

    #[test]
    fn test_history_is_capped_at_capacity_dropping_oldest() {
        let mut session = ChatSession::new();
        for i in 0..40 {
            let ticket = session.send(&format!("question {i}")).unwrap();
            respond(&mut session, &ticket, &format!("answer {i}"));
            assert!(session.len() <= CHAT_HISTORY_CAPACITY);
        }

        assert_eq!(session.len(), CHAT_HISTORY_CAPACITY);
        // 81 messages were appended in total; the first 31 are gone and the
        // retained window is in original order.
        let contents: Vec<&str> = session.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(contents[0], "question 15");
        assert_eq!(contents[1], "answer 15");
        assert_eq!(*contents.last().unwrap(), "answer 39");
    }

    #[test]
    fn test_every_append_raises_a_scroll_request() {
        let mut session = ChatSession::new();
        assert!(session.take_scroll_request());
        assert!(!session.take_scroll_request());

        let ticket = session.send("hi").unwrap();
        assert!(session.take_scroll_request());

        respond(&mut session, &ticket, "hello");
        assert!(session.take_scroll_request());
    }
}
