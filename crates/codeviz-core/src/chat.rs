use serde::{Deserialize, Serialize};

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A source location cited by an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeReference {
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// One turn of the chat conversation. Messages are append-only; the session
/// enforces its capacity by evicting from the front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub references: Vec<CodeReference>,
}

impl ChatMessage {
    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            references: Vec::new(),
        }
    }

    pub fn assistant(id: u64, content: impl Into<String>, references: Vec<CodeReference>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: content.into(),
            references,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_references_default_to_empty_on_deserialize() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"id":1,"role":"user","content":"hi"}"#).unwrap();
        assert!(msg.references.is_empty());
    }
}
