use crate::config::Config;
use crate::error::{is_retryable_error, Error};
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Natural stop: the full reply was produced
    Complete,
    /// The reply hit the token ceiling
    Truncated,
    /// A content filter cut the reply
    Filtered,
    /// No usable result yet (status missing or unknown)
    InProgress,
}

impl CompletionStatus {
    /// Map OpenAI's `finish_reason` onto the four statuses.
    pub fn from_finish_reason(reason: Option<&str>) -> Self {
        match reason {
            Some("stop") => CompletionStatus::Complete,
            Some("length") => CompletionStatus::Truncated,
            Some("content_filter") => CompletionStatus::Filtered,
            _ => CompletionStatus::InProgress,
        }
    }
}

/// A reply from the completion service.
///
/// `text` is `None` when the service returned a choice without content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: Option<String>,
    pub status: CompletionStatus,
}

/// Client for the OpenAI chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    max_tokens: u32,
    retry: RetryConfig,
}

impl OpenAiClient {
    pub fn new(client: reqwest::Client, api_url: &str, api_key: &str, max_tokens: u32) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            max_tokens,
            retry: RetryConfig::api_call(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            &config.openai_api_url,
            &config.openai_api_key,
            config.openai_max_tokens,
        )
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Send a two-turn conversation (system instruction, user message).
    ///
    /// Transport failures, non-2xx statuses and replies without choices are
    /// errors; an incomplete reply is not, its status is returned instead.
    pub async fn complete(&self, model: &str, system: &str, user: &str) -> Result<Completion> {
        let request = ChatRequest {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.max_tokens,
        };

        with_retry_if(
            &self.retry,
            "OpenAI completion",
            || async {
                let response = self
                    .client
                    .post(&self.api_url)
                    .bearer_auth(&self.api_key)
                    .json(&request)
                    .send()
                    .await
                    .context("Failed to send request to OpenAI API")?;

                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
                    return Err(anyhow::Error::new(Error::Api {
                        service: "OpenAI",
                        status,
                        body,
                    }));
                }

                let chat_response: ChatResponse = response
                    .json()
                    .await
                    .context("Failed to parse OpenAI response")?;

                let choice = chat_response
                    .choices
                    .into_iter()
                    .next()
                    .ok_or(Error::EmptyCompletion)?;

                Ok::<_, anyhow::Error>(Completion {
                    text: choice.message.content,
                    status: CompletionStatus::from_finish_reason(choice.finish_reason.as_deref()),
                })
            },
            is_retryable_error,
        )
        .await
    }
}
