//! Conversation session façade.
//!
//! A `ChatSession` owns the bounded history and a transport. Text turns
//! go out with the full trimmed history and feed the reply back into it
//! for the next turn; image+text turns are one-shot and bypass history.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::history::History;
use crate::{AgentClient, ChatError, Message, YuanqiClient, YuanqiConfig};

/// A conversation session against one agent.
///
/// Methods take `&self`, so a session shared behind an [`Arc`] accepts
/// overlapping sends: history appends interleave in send order while
/// replies land whenever the transport settles, possibly out of order.
/// Callers that need strict turn ordering must serialize their calls.
pub struct ChatSession {
    client: Arc<dyn AgentClient>,
    history: Mutex<History>,
    last_reply: Mutex<Option<String>>,
}

impl ChatSession {
    /// Session over the production Yuanqi endpoint.
    pub fn new(config: YuanqiConfig) -> Self {
        Self::with_client(Arc::new(YuanqiClient::new(config)))
    }

    /// Session over any transport (tests inject stubs here).
    pub fn with_client(client: Arc<dyn AgentClient>) -> Self {
        Self {
            client,
            history: Mutex::new(History::new()),
            last_reply: Mutex::new(None),
        }
    }

    pub fn with_history_limit(self, limit: usize) -> Self {
        self.history.lock().unwrap().set_limit(limit);
        self
    }

    /// Submit a text turn carrying the full trimmed history.
    ///
    /// The user message is recorded before the request goes out and
    /// stays recorded when the turn fails; the reply is appended only on
    /// success. `Ok(None)` is the no-choices outcome: nothing is
    /// appended and nothing is reported.
    pub async fn send_text(
        &self,
        user_message: impl Into<String>,
    ) -> Result<Option<String>, ChatError> {
        let text = user_message.into();
        debug!(chars = text.len(), "sending text turn");

        // Append and snapshot in one critical section so the request
        // always contains its own user message.
        let messages = {
            let mut history = self.history.lock().unwrap();
            history.push(Message::user(&text));
            history.snapshot()
        };

        match self.client.send_chat(messages).await {
            Ok(Some(reply)) => {
                self.history
                    .lock()
                    .unwrap()
                    .push(Message::assistant(&reply));
                *self.last_reply.lock().unwrap() = Some(reply.clone());
                Ok(Some(reply))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                warn!(error = %err, "text turn failed");
                Err(err)
            }
        }
    }

    /// Submit a one-shot image+text turn. History is neither read nor
    /// written, whatever the outcome.
    pub async fn send_image_text(
        &self,
        image_url: &str,
        user_message: &str,
    ) -> Result<Option<String>, ChatError> {
        debug!(url = %image_url, "sending image+text turn");

        match self.client.send_image(image_url, user_message).await {
            Ok(Some(reply)) => {
                *self.last_reply.lock().unwrap() = Some(reply.clone());
                Ok(Some(reply))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                warn!(error = %err, "image turn failed");
                Err(err)
            }
        }
    }

    /// Cap the history length (floor of 4) and trim immediately.
    pub fn set_history_limit(&self, limit: usize) {
        self.history.lock().unwrap().set_limit(limit);
    }

    pub fn clear_history(&self) {
        self.history.lock().unwrap().clear();
    }

    /// Independent snapshot of the current history.
    pub fn history(&self) -> Vec<Message> {
        self.history.lock().unwrap().snapshot()
    }

    /// Number of messages currently in history.
    pub fn message_count(&self) -> usize {
        self.history.lock().unwrap().len()
    }

    /// Most recent successful reply from either send path.
    pub fn last_reply(&self) -> Option<String> {
        self.last_reply.lock().unwrap().clone()
    }
}
