/// Chat-completion client implementation.
///
/// This module provides `ChatClient` for making synchronous HTTP requests to
/// an OpenAI-compatible chat-completion endpoint, along with error types and
/// a builder pattern for configuration.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default completion endpoint base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier for completion requests.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Fixed system instruction sent as the first turn of every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Errors that can occur when calling the completion service.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Network-related errors (connection failures, DNS resolution, timeouts)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-success HTTP responses, with the service's error message if the
    /// body carried one
    #[error("HTTP error: status {status}{}", http_message_suffix(.message))]
    Http {
        status: u16,
        message: Option<String>,
    },

    /// Well-formed responses that carry no usable completion choice
    #[error("Completion service error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Formats the optional service message for `ChatError::Http` display.
fn http_message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(" ({m})"),
        None => String::new(),
    }
}

/// A single chat turn in the completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Creates the fixed system turn.
    pub fn system() -> Self {
        Self {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Creates a user turn carrying the submitted question.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the `/chat/completions` endpoint.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Response body from the `/chat/completions` endpoint.
///
/// Only the fields this client reads are modeled.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// Error body shape returned by the service on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Builder for constructing `ChatClient` instances.
///
/// # Examples
///
/// ```
/// use hoidap::chat::ChatClientBuilder;
///
/// let client = ChatClientBuilder::new()
///     .api_key("sk-test")
///     .base_url("https://api.openai.com/v1")
///     .model("gpt-3.5-turbo")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct ChatClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
}

impl ChatClientBuilder {
    /// Creates a new `ChatClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key used for bearer authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL of the completion service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier sent with every request.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Builds the `ChatClient` with the configured settings.
    ///
    /// If `base_url()` or `model()` were not called, the `OPENAI_BASE_URL`
    /// and `OPENAI_MODEL` environment variables are consulted before falling
    /// back to [`DEFAULT_BASE_URL`] and [`DEFAULT_MODEL`]. The API key has no
    /// default; credential validation happens in the configuration layer
    /// before this builder is reached.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::InvalidUrl` if the base URL does not parse, or
    /// `ChatError::Network` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ChatClient, ChatError> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
        };

        let model = if let Some(m) = self.model {
            m
        } else {
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string())
        };

        let api_key = self.api_key.unwrap_or_default();

        reqwest::Url::parse(&base_url)
            .map_err(|e| ChatError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ChatError::Network)?;

        Ok(ChatClient {
            client,
            api_key,
            base_url,
            model,
        })
    }
}

/// Trait for completion service operations.
///
/// This trait enables mocking in unit tests and keeps the answer resolver
/// independent of the HTTP layer.
pub trait CompletionClient: Send + Sync {
    /// Requests a single-turn completion for the given question.
    ///
    /// The request carries exactly two turns: the fixed system instruction
    /// and the user's question. No history, no retries, no streaming.
    fn complete(&self, question: &str) -> Result<String, ChatError>;
}

/// Synchronous HTTP client for an OpenAI-compatible completion endpoint.
///
/// Constructed via `ChatClientBuilder`. Each call is a fresh request; no
/// responses are cached across questions.
pub struct ChatClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model identifier configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn complete_internal(&self, question: &str) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        let messages = [ChatMessage::system(), ChatMessage::user(question)];
        let body = CompletionRequest {
            model: &self.model,
            messages: &messages,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(ChatError::Network)?;

        let status = response.status();
        if !status.is_success() {
            // Pull the service's own message out of the error body if present.
            let message = response
                .json::<ErrorResponse>()
                .ok()
                .map(|e| e.error.message);
            return Err(ChatError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().map_err(ChatError::Network)?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ChatError::Api {
                message: "Response contained no completion choices".to_string(),
            })
    }
}

impl CompletionClient for ChatClient {
    fn complete(&self, question: &str) -> Result<String, ChatError> {
        self.complete_internal(question)
    }
}
