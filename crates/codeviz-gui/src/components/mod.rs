pub mod chat_panel;
pub mod code_preview;
pub mod graph_canvas;
pub mod search_bar;
pub mod status_bar;
pub mod welcome;
