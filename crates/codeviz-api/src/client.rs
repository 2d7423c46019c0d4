use crate::dto::{AnalyzeResponse, ChatResponse, ExplainResponse, GraphResponse, SearchResponse};
use crate::errors::ApiError;
use codeviz_core::{NodeId, RepoId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// The five logical operations the visualization client consumes. The wire
/// format behind them is the backend's concern; the view layer only ever
/// sees these shapes and [`ApiError`].
pub trait Backend: Send + Sync {
    fn create_analysis(&self, github_url: &str) -> Result<AnalyzeResponse, ApiError>;
    fn fetch_graph(&self, repo_id: &RepoId) -> Result<GraphResponse, ApiError>;
    fn fetch_explanation(
        &self,
        repo_id: &RepoId,
        node_id: &NodeId,
    ) -> Result<ExplainResponse, ApiError>;
    fn search(&self, repo_id: &RepoId, query: &str) -> Result<SearchResponse, ApiError>;
    fn chat(&self, repo_id: &RepoId, message: &str) -> Result<ChatResponse, ApiError>;
}

#[derive(Serialize)]
struct AnalyzeRequestBody<'a> {
    github_url: &'a str,
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    repo_id: &'a str,
    message: &'a str,
}

/// Blocking HTTP implementation of [`Backend`]. Runs on the GUI's fetch
/// worker, never on the UI thread.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// Analysis can take minutes on large repositories; the timeout only
    /// guards against a backend that stops responding entirely.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn handle<T: DeserializeOwned>(
        response: reqwest::blocking::Response,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::from_error_body(status.as_u16(), &body, fallback));
        }
        response
            .json::<T>()
            .map_err(|e| ApiError::backend(format!("{fallback}: {e}")))
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fallback: &str,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "backend GET");
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        Self::handle(response, fallback)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "backend POST");
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        Self::handle(response, fallback)
    }
}

impl Backend for HttpBackend {
    fn create_analysis(&self, github_url: &str) -> Result<AnalyzeResponse, ApiError> {
        self.post(
            "/analyze",
            &AnalyzeRequestBody { github_url },
            "Failed to analyze repository",
        )
    }

    fn fetch_graph(&self, repo_id: &RepoId) -> Result<GraphResponse, ApiError> {
        self.get(
            &format!("/graph/{}", repo_id.as_str()),
            &[],
            "Failed to fetch graph data",
        )
    }

    fn fetch_explanation(
        &self,
        repo_id: &RepoId,
        node_id: &NodeId,
    ) -> Result<ExplainResponse, ApiError> {
        self.get(
            "/explain",
            &[("repo_id", repo_id.as_str()), ("node_id", node_id.as_str())],
            "Failed to get explanation",
        )
    }

    fn search(&self, repo_id: &RepoId, query: &str) -> Result<SearchResponse, ApiError> {
        self.get(
            "/search",
            &[("repo_id", repo_id.as_str()), ("query", query)],
            "Failed to search",
        )
    }

    fn chat(&self, repo_id: &RepoId, message: &str) -> Result<ChatResponse, ApiError> {
        self.post(
            "/chat",
            &ChatRequestBody {
                repo_id: repo_id.as_str(),
                message,
            },
            "Failed to get response",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:8000/").unwrap();
        assert_eq!(backend.base_url, "http://localhost:8000");
    }
}
