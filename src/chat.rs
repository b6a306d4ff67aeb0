/// Chat-completion HTTP client module.
///
/// This module provides a blocking HTTP client for a hosted chat-completion
/// service (OpenAI wire shape), along with error types and a builder for
/// configuration.
mod client;

pub use client::{
    ChatClient, ChatClientBuilder, ChatError, ChatMessage, CompletionClient, DEFAULT_BASE_URL,
    DEFAULT_MODEL, SYSTEM_PROMPT,
};
