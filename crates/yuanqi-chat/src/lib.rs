//! Chat-session client for the Tencent Yuanqi agent API.
//!
//! Provides a conversational [`ChatSession`] over the agent
//! chat-completions endpoint with:
//! - Bounded conversation history with head-first trimming
//! - Text turns that submit the full trimmed history
//! - One-shot image+text turns that bypass history entirely
//! - Bearer-token auth resolved from env or a credentials file

pub mod history;
pub mod session;
pub mod yuanqi;

use async_trait::async_trait;

pub use history::History;
pub use session::ChatSession;
pub use yuanqi::{YuanqiClient, YuanqiConfig};

/// Transport seam between the session façade and the wire.
///
/// Both methods resolve to `Ok(Some(reply))` on success and `Err` on
/// transport or decode failure. `Ok(None)` is the defined no-reply
/// outcome: the endpoint answered 2xx with an empty `choices` list, so
/// there is neither a reply nor an error to deliver.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Submit a request carrying the given conversation history.
    async fn send_chat(&self, messages: Vec<Message>) -> Result<Option<String>, ChatError>;

    /// Submit a one-shot image+text request that ignores history.
    async fn send_image(
        &self,
        image_url: &str,
        text: &str,
    ) -> Result<Option<String>, ChatError>;
}

/// One chat turn: a role plus its ordered content parts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl Message {
    /// Build a message carrying at most one content part: non-empty
    /// `text` wins, else the file reference, else no parts at all (the
    /// request will simply carry no content for that turn).
    pub fn from_parts(role: Role, text: Option<&str>, file: Option<FileRef>) -> Self {
        let mut content = Vec::new();
        match text {
            Some(text) if !text.is_empty() => content.push(ContentPart::text(text)),
            _ => {
                if let Some(file) = file {
                    content.push(ContentPart::FileUrl { file_url: file });
                }
            }
        }
        Self { role, content }
    }

    pub fn user(text: impl AsRef<str>) -> Self {
        Self::from_parts(Role::User, Some(text.as_ref()), None)
    }

    pub fn assistant(text: impl AsRef<str>) -> Self {
        Self::from_parts(Role::Assistant, Some(text.as_ref()), None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One unit of message content, discriminated on the wire by `"type"`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    FileUrl { file_url: FileRef },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::FileUrl {
            file_url: FileRef::image(url),
        }
    }
}

/// Typed file reference (`{"type":"image","url":…}` on the wire).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl FileRef {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            url: url.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Connectivity failure or non-2xx status from the endpoint.
    #[error("request failed: {0}")]
    Transport(String),
    /// Response body did not decode into the expected schema.
    #[error("parse error: {0}")]
    Parse(String),
    /// No usable credentials (only produced by config resolution).
    #[error("not configured: {0}")]
    Config(String),
}

#[cfg(test)]
mod message_tests {
    use super::*;

    #[test]
    fn text_wins_over_file() {
        let msg = Message::from_parts(
            Role::User,
            Some("hello"),
            Some(FileRef::image("http://x/a.png")),
        );
        assert_eq!(msg.content, vec![ContentPart::text("hello")]);
    }

    #[test]
    fn empty_text_yields_no_text_part() {
        let file = FileRef::image("http://x/a.png");
        let msg = Message::from_parts(Role::User, Some(""), Some(file));
        assert_eq!(msg.content, vec![ContentPart::image("http://x/a.png")]);

        let msg = Message::from_parts(Role::User, Some(""), None);
        assert!(msg.content.is_empty());
    }

    #[test]
    fn neither_text_nor_file_is_tolerated() {
        let msg = Message::from_parts(Role::Assistant, None, None);
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_empty());
    }

    #[test]
    fn parts_serialize_to_wire_shape() {
        let text = serde_json::to_value(ContentPart::text("hi")).unwrap();
        assert_eq!(text, serde_json::json!({ "type": "text", "text": "hi" }));

        let image = serde_json::to_value(ContentPart::image("http://x/img.png")).unwrap();
        assert_eq!(
            image,
            serde_json::json!({
                "type": "file_url",
                "file_url": { "type": "image", "url": "http://x/img.png" }
            })
        );
    }

    #[test]
    fn roles_serialize_lowercase() {
        let msg = Message::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");

        let msg = Message::assistant("ok");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
