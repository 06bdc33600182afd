//! AgentClient trait implementation for YuanqiClient (submit + decode).

use async_trait::async_trait;
use tracing::debug;

use crate::{AgentClient, ChatError, Message};

use super::client::{ChatRequest, ChatResponse, YuanqiClient, X_SOURCE};

#[async_trait]
impl AgentClient for YuanqiClient {
    async fn send_chat(&self, messages: Vec<Message>) -> Result<Option<String>, ChatError> {
        let request = self.chat_request(messages);
        self.submit(&request).await
    }

    async fn send_image(
        &self,
        image_url: &str,
        text: &str,
    ) -> Result<Option<String>, ChatError> {
        let request = self.image_request(image_url, text);
        self.submit(&request).await
    }
}

impl YuanqiClient {
    /// One POST to the chat-completions endpoint. Single attempt: no
    /// retry, no timeout beyond the transport defaults, no cancellation
    /// once the request is in flight.
    pub(crate) async fn submit(&self, request: &ChatRequest) -> Result<Option<String>, ChatError> {
        debug!(
            assistant = %self.config.assistant_id,
            messages = request.messages.len(),
            "Yuanqi chat request"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("content-type", "application/json")
            .header("X-Source", X_SOURCE)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(ChatError::Transport(format!("HTTP {status}: {text}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        debug!(body = %body, "Yuanqi API response");

        let decoded: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ChatError::Parse(e.to_string()))?;

        Ok(self.parse_response(decoded))
    }
}
