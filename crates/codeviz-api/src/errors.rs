use serde::{Deserialize, Serialize};
use std::fmt;

/// Error currency for every backend operation. `code` is a stable machine
/// tag, `message` is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new("backend", message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new("transport", message)
    }

    /// Decode a non-success response body into a user-facing message.
    ///
    /// Three tiers: a JSON body with a `detail` field wins, then any
    /// non-empty plain-text body, then the operation's fixed fallback.
    pub fn from_error_body(status: u16, body: &str, fallback: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.detail,
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => fallback.to_string(),
        };
        Self::new(format!("http_{status}"), message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_field_wins_over_raw_body() {
        let err = ApiError::from_error_body(404, r#"{"detail":"Repository not found"}"#, "Failed");
        assert_eq!(err.message, "Repository not found");
        assert_eq!(err.code, "http_404");
    }

    #[test]
    fn test_plain_text_body_is_surfaced() {
        let err = ApiError::from_error_body(500, "upstream exploded", "Failed");
        assert_eq!(err.message, "upstream exploded");
    }

    #[test]
    fn test_empty_body_uses_fallback() {
        let err = ApiError::from_error_body(502, "  \n", "Failed to fetch graph data");
        assert_eq!(err.message, "Failed to fetch graph data");
    }

    #[test]
    fn test_json_without_detail_is_treated_as_text() {
        let err = ApiError::from_error_body(500, r#"{"error":"nope"}"#, "Failed");
        assert_eq!(err.message, r#"{"error":"nope"}"#);
    }
}
