/// LLM Client: the single point of entry for all language-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the model API directly.
/// Services depend on the `TextGenerator` trait; `LlmClient` is the production
/// implementation against an OpenAI-compatible chat completions endpoint.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MINI_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM request timed out")]
    Timeout,

    #[error("LLM output did not match the schema: {0}")]
    Malformed(String),
}

/// Which configured model a call should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Copy generation and shortening.
    Generation,
    /// Cheaper model for page analysis and USP extraction.
    Mini,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatPrompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub tier: ModelTier,
}

/// A named strict JSON schema the model output must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct OutputSchema<'a> {
    pub name: &'a str,
    pub schema: &'a Value,
}

/// The text-generation collaborator. Implement this to swap providers (or to
/// script responses in tests) without touching callers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Free-text completion.
    async fn complete(&self, prompt: &ChatPrompt<'_>) -> Result<String, LlmError>;

    /// Structured completion returning one JSON object matching `schema`.
    async fn complete_structured(
        &self,
        prompt: &ChatPrompt<'_>,
        schema: &OutputSchema<'_>,
    ) -> Result<Value, LlmError>;

    fn model_name(&self, tier: ModelTier) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl LlmResponse {
    /// Extracts the non-empty content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production LLM client used by all services.
/// Wraps chat completions with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    mini_model: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        mini_model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            mini_model,
        }
    }

    /// Makes a raw chat completions call, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    /// Timeouts are returned immediately as `LlmError::Timeout`.
    async fn call(&self, request_body: &ChatRequest<'_>) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if e.is_timeout() => return Err(LlmError::Timeout),
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(retryable_failure(status.as_u16(), body));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await.map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Http(e)
                }
            })?;

            if let Some(usage) = &llm_response.usage {
                debug!(
                    "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                    request_body.model, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }

    fn build_request<'a>(
        &'a self,
        prompt: &ChatPrompt<'a>,
        schema: Option<&OutputSchema<'a>>,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: self.model_name(prompt.tier),
            max_tokens: MAX_TOKENS,
            temperature: prompt.temperature,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: prompt.system,
                },
                WireMessage {
                    role: "user",
                    content: prompt.user,
                },
            ],
            response_format: schema.map(|s| ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: s.name,
                    strict: true,
                    schema: s.schema,
                },
            }),
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(&self, prompt: &ChatPrompt<'_>) -> Result<String, LlmError> {
        let request = self.build_request(prompt, None);
        let response = self.call(&request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    async fn complete_structured(
        &self,
        prompt: &ChatPrompt<'_>,
        schema: &OutputSchema<'_>,
    ) -> Result<Value, LlmError> {
        let request = self.build_request(prompt, Some(schema));
        let response = self.call(&request).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(LlmError::Malformed(format!(
                "expected a JSON object for schema '{}'",
                schema.name
            )));
        }
        Ok(value)
    }

    fn model_name(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Generation => &self.model,
            ModelTier::Mini => &self.mini_model,
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Error recorded for a retryable status. Running out of retries on 429
/// surfaces as `RateLimited`; 5xx keeps the API status and body.
fn retryable_failure(status: u16, body: String) -> LlmError {
    if status == 429 {
        LlmError::RateLimited {
            retries: MAX_RETRIES,
        }
    } else {
        LlmError::Api {
            status,
            message: body,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One call observed by `ScriptedGenerator`.
    #[derive(Debug, Clone)]
    pub(crate) struct RecordedCall {
        pub system: String,
        pub user: String,
        pub temperature: f32,
        pub tier: ModelTier,
        pub schema_name: Option<String>,
    }

    /// In-memory `TextGenerator` replaying queued replies in order.
    ///
    /// `Value::String` replies serve `complete`; objects serve
    /// `complete_structured`. An exhausted queue yields `EmptyContent`.
    #[derive(Default)]
    pub(crate) struct ScriptedGenerator {
        replies: Mutex<VecDeque<Result<Value, LlmError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn new(replies: Vec<Result<Value, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        fn next(&self, prompt: &ChatPrompt<'_>, schema_name: Option<&str>) -> Result<Value, LlmError> {
            self.calls.lock().unwrap().push(RecordedCall {
                system: prompt.system.to_string(),
                user: prompt.user.to_string(),
                temperature: prompt.temperature,
                tier: prompt.tier,
                schema_name: schema_name.map(str::to_string),
            });
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn complete(&self, prompt: &ChatPrompt<'_>) -> Result<String, LlmError> {
            match self.next(prompt, None)? {
                Value::String(s) => Ok(s),
                other => Ok(other.to_string()),
            }
        }

        async fn complete_structured(
            &self,
            prompt: &ChatPrompt<'_>,
            schema: &OutputSchema<'_>,
        ) -> Result<Value, LlmError> {
            let value = self.next(prompt, Some(schema.name))?;
            if value.is_object() {
                Ok(value)
            } else {
                Err(LlmError::Malformed("expected a JSON object".to_string()))
            }
        }

        fn model_name(&self, tier: ModelTier) -> &str {
            match tier {
                ModelTier::Generation => DEFAULT_MODEL,
                ModelTier::Mini => DEFAULT_MINI_MODEL,
            }
        }
    }

    fn client() -> LlmClient {
        LlmClient::new(
            "test-key".to_string(),
            "https://llm.invalid/v1/".to_string(),
            DEFAULT_MODEL.to_string(),
            DEFAULT_MINI_MODEL.to_string(),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_model_tiers_map_to_configured_models() {
        let llm = client();
        assert_eq!(llm.model_name(ModelTier::Generation), DEFAULT_MODEL);
        assert_eq!(llm.model_name(ModelTier::Mini), DEFAULT_MINI_MODEL);
    }

    #[test]
    fn test_structured_request_carries_strict_named_schema() {
        let llm = client();
        let schema = json!({"type": "object", "additionalProperties": false});
        let prompt = ChatPrompt {
            system: "sys",
            user: "usr",
            temperature: 0.5,
            tier: ModelTier::Generation,
        };
        let output = OutputSchema {
            name: "meta_ad_copy",
            schema: &schema,
        };
        let body = serde_json::to_value(llm.build_request(&prompt, Some(&output))).unwrap();

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "meta_ad_copy");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn test_plain_request_omits_response_format() {
        let llm = client();
        let prompt = ChatPrompt {
            system: "sys",
            user: "usr",
            temperature: 0.3,
            tier: ModelTier::Mini,
        };
        let body = serde_json::to_value(llm.build_request(&prompt, None)).unwrap();
        assert!(body.get("response_format").is_none());
        assert_eq!(body["model"], DEFAULT_MINI_MODEL);
    }

    #[test]
    fn test_response_text_skips_blank_content() {
        let response: LlmResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": "  "}}]})).unwrap();
        assert!(response.text().is_none());

        let response: LlmResponse = serde_json::from_value(
            json!({"choices": [{"message": {"content": "{}"}}], "usage": {"prompt_tokens": 3, "completion_tokens": 1}}),
        )
        .unwrap();
        assert_eq!(response.text(), Some("{}"));
    }

    #[test]
    fn test_retryable_failures() {
        assert!(matches!(
            retryable_failure(429, "slow down".to_string()),
            LlmError::RateLimited { retries: MAX_RETRIES }
        ));
        assert_eq!(
            retryable_failure(503, "overloaded".to_string()).to_string(),
            "API error (status 503): overloaded"
        );
    }
}
