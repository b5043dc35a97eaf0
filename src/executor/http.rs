//! HTTP chat-completion adapter.
//!
//! Wraps an OpenAI-compatible `/v1/chat/completions` endpoint. Carries no
//! routing logic; it only translates the uniform execution contract into
//! one HTTP call and maps failures onto the executor error taxonomy.

use super::{ExecutionBackend, ExecutionMode, ExecutionRequest, ExecutionResponse, ExecutorError, Usage};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;
use serde_json::json;

/// Executor for HTTP inference backends.
pub struct HttpChatExecutor {
    id: String,
    name: String,
    base_url: String,
    model: String,
    api_key: Option<String>,
    input_cost: f64,
    output_cost: f64,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl HttpChatExecutor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        input_cost: f64,
        output_cost: f64,
    ) -> Result<Self, ExecutorError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ExecutorError::Configuration(e.to_string()))?;

        Ok(Self {
            id: id.into(),
            name: name.into(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            input_cost,
            output_cost,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }

    fn cost_for(&self, usage: &Usage) -> f64 {
        (usage.input_units as f64 * self.input_cost
            + usage.output_units as f64 * self.output_cost)
            / 1_000_000.0
    }
}

/// Parse a Retry-After header value (delta-seconds form) into a timestamp.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<chrono::DateTime<Utc>> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()
        .map(|secs| Utc::now() + ChronoDuration::seconds(secs))
}

#[async_trait]
impl ExecutionBackend for HttpChatExecutor {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, ExecutorError> {
        let prompt = request.prompt();

        let mut body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });
        if request.mode == ExecutionMode::Json {
            body["response_format"] = json!({"type": "json_object"});
        }

        let mut http_request = self
            .client
            .post(self.endpoint())
            .timeout(request.timeout)
            .json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                ExecutorError::Timeout(request.timeout.as_millis() as u64)
            } else {
                ExecutorError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ExecutorError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExecutorError::Upstream {
                status: status.as_u16(),
                message: truncate(&message, 500),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExecutorError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ExecutorError::InvalidResponse("empty choices array".to_string()))?;

        let usage = match parsed.usage {
            Some(u) => Usage {
                input_units: u.prompt_tokens,
                output_units: u.completion_tokens,
            },
            None => Usage::estimate(&prompt, &content),
        };
        let cost_estimate = self.cost_for(&usage);

        Ok(ExecutionResponse {
            content,
            usage,
            cost_estimate,
        })
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
