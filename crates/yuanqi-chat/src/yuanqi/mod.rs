//! Tencent Yuanqi agent API client.
//!
//! Implements the `AgentClient` trait for the agent chat-completions
//! endpoint (open.hunyuan.tencent.com/openapi/v1/agent/chat/completions).
//!
//! Authenticates with a Bearer token and marks requests with the
//! `X-Source: openapi` header the endpoint expects.

mod api;
mod client;
mod config;

pub use client::{ChatRequest, ChatResponse, Choice, ChoiceMessage, Step, Usage, YuanqiClient};
pub use config::YuanqiConfig;
