//! Chat-completions wrapper around an OpenAI-compatible API.
//!
//! One [`ChatClient::generate`] call is one network round trip plus at most
//! one repair round trip when the response is not parseable JSON. There is
//! no caching — identical requests re-invoke the remote service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use coursegen_shared::{CourseGenError, Result};

use crate::{parse, prompts};

/// Request timeout for a single completion call.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// Explicit configuration for the generation service, passed in at
/// construction. Credentials never live in process-wide state.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// API key for the generation service.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible endpoint (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Client for the hosted text-generation service.
pub struct ChatClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Build a client. Fails with an auth error when the key is empty
    /// and a config error when the base URL is not a valid URL.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CourseGenError::Auth(
                "generation API key is empty".into(),
            ));
        }
        Url::parse(&config.base_url).map_err(|e| {
            CourseGenError::config(format!("invalid base URL '{}': {e}", config.base_url))
        })?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("CourseGen/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CourseGenError::Generation(format!("client build: {e}")))?;

        Ok(Self { http, config })
    }

    /// Send a prompt and parse the response into a JSON value.
    ///
    /// If the first response cannot be parsed as JSON, one repair round trip
    /// re-prompts the model to fix its own output; a second failure is a
    /// generation error.
    #[instrument(skip_all, fields(model = %self.config.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<Value> {
        let text = self.complete(prompt).await?;

        match parse::extract_json(&text) {
            Ok(value) => Ok(value),
            Err(first_err) => {
                warn!(error = %first_err, "response was not valid JSON, attempting repair");
                let repaired = self.complete(&prompts::json_repair(&text)).await?;
                parse::extract_json(&repaired).map_err(|_| {
                    CourseGenError::Generation(
                        "model response could not be parsed as JSON after one repair attempt"
                            .into(),
                    )
                })
            }
        }
    }

    /// One raw completion round trip.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CourseGenError::Generation(format!("request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(CourseGenError::Auth(format!(
                "generation service rejected credentials (HTTP {status})"
            )));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(200).collect();
            return Err(CourseGenError::Generation(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CourseGenError::Generation(format!("invalid response body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(CourseGenError::Generation("empty model response".into()));
        }

        debug!(response_len = content.len(), "completion received");
        Ok(content)
    }
}
