//! Yuanqi API client configuration.

use std::fmt;

use crate::ChatError;

/// Yuanqi agent API client configuration.
#[derive(Clone)]
pub struct YuanqiConfig {
    pub token: String,
    pub assistant_id: String,
    pub user_id: String,
    pub endpoint: String,
}

impl fmt::Debug for YuanqiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YuanqiConfig")
            .field("token", &"[REDACTED]")
            .field("assistant_id", &self.assistant_id)
            .field("user_id", &self.user_id)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl YuanqiConfig {
    /// Config for one agent. The user id defaults to a fresh UUID; give
    /// the endpoint a stable id via [`with_user_id`](Self::with_user_id)
    /// when replies should share server-side context across runs.
    pub fn new(token: impl Into<String>, assistant_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            assistant_id: assistant_id.into(),
            user_id: uuid::Uuid::new_v4().to_string(),
            endpoint: super::client::YUANQI_API_URL.to_string(),
        }
    }

    /// Create config from environment or the credentials file.
    ///
    /// Resolution order:
    /// 1. `YUANQI_API_TOKEN` + `YUANQI_ASSISTANT_ID` env vars
    /// 2. `~/.yuanqi/credentials.json` (`{"apiToken": …, "assistantId": …}`)
    ///
    /// `YUANQI_USER_ID`, when set, replaces the generated user id.
    pub fn from_env() -> Result<Self, ChatError> {
        let env_pair = (
            std::env::var("YUANQI_API_TOKEN"),
            std::env::var("YUANQI_ASSISTANT_ID"),
        );
        let resolved = match env_pair {
            (Ok(token), Ok(assistant_id)) => Some((token, assistant_id)),
            _ => Self::read_credentials_file(),
        };

        let (token, assistant_id) = resolved.ok_or_else(|| {
            ChatError::Config(
                "Yuanqi API not configured. Set YUANQI_API_TOKEN and \
                 YUANQI_ASSISTANT_ID, or write ~/.yuanqi/credentials.json."
                    .into(),
            )
        })?;

        let mut config = Self::new(token, assistant_id);
        if let Ok(user_id) = std::env::var("YUANQI_USER_ID") {
            config.user_id = user_id;
        }
        Ok(config)
    }

    /// Read `apiToken`/`assistantId` from `~/.yuanqi/credentials.json`.
    fn read_credentials_file() -> Option<(String, String)> {
        let home = dirs::home_dir()?;
        let path = home.join(".yuanqi").join("credentials.json");
        let data = std::fs::read_to_string(&path).ok()?;
        let json: serde_json::Value = serde_json::from_str(&data).ok()?;
        let token = json.get("apiToken")?.as_str()?.to_string();
        let assistant_id = json.get("assistantId")?.as_str()?.to_string();
        Some((token, assistant_id))
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}
