//! The interactive heart of the CodeViz client: deterministic graph layout,
//! the selection/explanation flow, debounced symbol search, and the bounded
//! chat session.
//!
//! Everything in this crate is an explicit state container with pure
//! transition functions. Nothing here talks to the network or reads ambient
//! globals; callers feed in user input, clock readings, and tagged backend
//! completions, and poll out work orders for the fetch worker.

pub mod chat;
pub mod controller;
pub mod layout;
pub mod resolver;
pub mod search;

pub use chat::{ChatSendError, ChatSession, ChatTicket, CHAT_HISTORY_CAPACITY};
pub use controller::{ExplainTicket, Explanation, GraphView, Selection, FALLBACK_EXPLANATION};
pub use layout::{layout, Color, NodeStyle, Point, PositionedNode};
pub use resolver::{CodePreview, CodePreviewResolver, ExplainRequest};
pub use search::{SearchCoordinator, SearchTicket, MIN_QUERY_LEN, SEARCH_DEBOUNCE};
