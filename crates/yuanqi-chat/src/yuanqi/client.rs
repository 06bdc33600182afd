//! Yuanqi API client struct, request building, and response parsing.

use serde::{Deserialize, Serialize};

use crate::{ContentPart, FileRef, Message, Role};

use super::config::YuanqiConfig;

pub(crate) const YUANQI_API_URL: &str =
    "https://open.hunyuan.tencent.com/openapi/v1/agent/chat/completions";
pub(crate) const X_SOURCE: &str = "openapi";

/// Yuanqi agent API client.
pub struct YuanqiClient {
    pub(crate) config: YuanqiConfig,
    pub(crate) http: reqwest::Client,
}

impl YuanqiClient {
    pub fn new(config: YuanqiConfig) -> Self {
        Self {
            config,
            // No request timeout here: submits rely on the transport's
            // own defaults and offer no cancellation.
            http: reqwest::Client::new(),
        }
    }

    /// From-history request: wraps a history snapshot unchanged.
    pub fn chat_request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            assistant_id: self.config.assistant_id.clone(),
            user_id: self.config.user_id.clone(),
            stream: false,
            messages,
        }
    }

    /// Transient request: one synthesized user message with the text
    /// part first (when non-empty), then the image reference. History is
    /// neither read nor written on this path.
    pub fn image_request(&self, image_url: &str, text: &str) -> ChatRequest {
        let mut content = Vec::new();
        if !text.is_empty() {
            content.push(ContentPart::text(text));
        }
        content.push(ContentPart::FileUrl {
            file_url: FileRef::image(image_url),
        });

        ChatRequest {
            assistant_id: self.config.assistant_id.clone(),
            user_id: self.config.user_id.clone(),
            stream: false,
            messages: vec![Message {
                role: Role::User,
                content,
            }],
        }
    }

    /// Extract the reply from a decoded response. `None` when the
    /// endpoint returned no choices; the caller then delivers neither a
    /// reply nor an error.
    pub(crate) fn parse_response(&self, response: ChatResponse) -> Option<String> {
        let choice = response.choices.into_iter().next()?;
        Some(choice.message.content)
    }
}

/// Outbound request body for the agent chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub assistant_id: String,
    pub user_id: String,
    pub stream: bool,
    pub messages: Vec<Message>,
}

/// Decoded response body. Every field defaults so sparse bodies decode
/// instead of failing; in particular a body without `choices` becomes an
/// empty list, which is the no-reply case rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub finish_reason: String,
    #[serde(default)]
    pub message: ChoiceMessage,
}

/// Assistant message inside a choice. `steps` carries the agent's
/// intermediate workflow turns when the endpoint reports them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Token accounting reported by the endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> YuanqiClient {
        YuanqiClient::new(YuanqiConfig::new("secret", "agent-1").with_user_id("user-1"))
    }

    #[test]
    fn chat_request_wraps_history_verbatim() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        let request = client().chat_request(messages.clone());

        assert_eq!(request.assistant_id, "agent-1");
        assert_eq!(request.user_id, "user-1");
        assert!(!request.stream);
        assert_eq!(request.messages, messages);
    }

    #[test]
    fn chat_request_serializes_to_wire_contract() {
        let request = client().chat_request(vec![Message::user("hi")]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "assistant_id": "agent-1",
                "user_id": "user-1",
                "stream": false,
                "messages": [
                    { "role": "user", "content": [{ "type": "text", "text": "hi" }] }
                ]
            })
        );
    }

    #[test]
    fn image_request_is_one_message_with_text_then_image() {
        let request = client().image_request("http://x/img.png", "what is this?");

        assert_eq!(request.messages.len(), 1);
        let message = &request.messages[0];
        assert_eq!(message.role, Role::User);
        assert_eq!(
            message.content,
            vec![
                ContentPart::text("what is this?"),
                ContentPart::image("http://x/img.png"),
            ]
        );
    }

    #[test]
    fn image_request_drops_empty_text_part() {
        let request = client().image_request("http://x/img.png", "");

        assert_eq!(
            request.messages[0].content,
            vec![ContentPart::image("http://x/img.png")]
        );
    }

    #[test]
    fn image_request_serializes_file_url_nesting() {
        let request = client().image_request("http://x/img.png", "look");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["messages"][0]["content"][1],
            serde_json::json!({
                "type": "file_url",
                "file_url": { "type": "image", "url": "http://x/img.png" }
            })
        );
    }

    #[test]
    fn parse_response_takes_the_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{
                "id": "chat-123",
                "created": "1712062126",
                "choices": [
                    {
                        "index": 0,
                        "finish_reason": "stop",
                        "message": {
                            "role": "assistant",
                            "content": "first",
                            "steps": [{ "role": "tool", "content": "lookup" }]
                        }
                    },
                    {
                        "index": 1,
                        "finish_reason": "stop",
                        "message": { "role": "assistant", "content": "second" }
                    }
                ],
                "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
            }"#,
        )
        .unwrap();

        assert_eq!(response.id, "chat-123");
        assert_eq!(response.created, "1712062126");
        assert_eq!(response.usage.total_tokens, 15);
        assert_eq!(response.choices[0].message.steps.len(), 1);

        assert_eq!(client().parse_response(response), Some("first".to_string()));
    }

    #[test]
    fn parse_response_with_no_choices_is_none() {
        let response: ChatResponse = serde_json::from_str(r#"{ "choices": [] }"#).unwrap();
        assert_eq!(client().parse_response(response), None);
    }

    #[test]
    fn sparse_bodies_decode_with_defaults() {
        // Missing `choices` is the no-reply case, not a decode failure.
        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(response.choices.is_empty());
        assert_eq!(response.usage.total_tokens, 0);

        let response: ChatResponse =
            serde_json::from_str(r#"{ "choices": [{ "message": { "content": "ok" } }] }"#).unwrap();
        assert_eq!(client().parse_response(response), Some("ok".to_string()));
    }

    #[test]
    fn mistyped_bodies_fail_to_decode() {
        assert!(serde_json::from_str::<ChatResponse>(r#"{ "choices": 5 }"#).is_err());
        assert!(serde_json::from_str::<ChatResponse>("not json").is_err());
    }
}
