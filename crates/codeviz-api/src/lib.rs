mod client;
mod dto;
mod errors;

pub use client::{Backend, HttpBackend};
pub use dto::{
    AnalyzeResponse, ChatResponse, ExplainResponse, GraphEdgeDto, GraphNodeData, GraphNodeDto,
    GraphResponse, SearchHit, SearchResponse,
};
pub use errors::ApiError;
