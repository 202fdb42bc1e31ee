//! OpenRouter AI provider implementation.
//!
//! This module provides the [`OpenRouterProvider`] which implements the [`AIProvider`]
//! trait for the OpenRouter API (<https://openrouter.ai/>).
//!
//! OpenRouter exposes an OpenAI-compatible chat-completions endpoint, so the
//! same provider works against any compatible server by overriding `base_url`.

use super::AIProvider;
use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenRouter API endpoint.
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model to use for quality analysis.
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default temperature for model responses (low for consistent analysis).
const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default max tokens for responses.
const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

/// Configuration for the OpenRouter provider.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// The model to use (e.g., "openai/gpt-4o-mini", "deepseek/deepseek-chat").
    pub model: String,
    /// Temperature for response generation (0.0 - 2.0).
    pub temperature: f32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Base URL for the API (useful for proxies or custom endpoints).
    pub base_url: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl OpenRouterConfig {
    /// Create a new configuration builder.
    pub fn builder() -> OpenRouterConfigBuilder {
        OpenRouterConfigBuilder::default()
    }
}

/// Builder for [`OpenRouterConfig`].
#[derive(Default)]
pub struct OpenRouterConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl OpenRouterConfigBuilder {
    /// Set the model to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature (0.0 - 2.0).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set a custom base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenRouterConfig {
        OpenRouterConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// OpenRouter AI provider for generative quality analysis.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::ai::{OpenRouterProvider, OpenRouterConfig};
///
/// // Simple usage with defaults
/// let provider = OpenRouterProvider::new("your-api-key")?;
///
/// // With custom configuration
/// let config = OpenRouterConfig::builder()
///     .model("anthropic/claude-3.5-haiku")
///     .temperature(0.2)
///     .build();
/// let provider = OpenRouterProvider::with_config("your-api-key", config)?;
/// ```
pub struct OpenRouterProvider {
    api_key: String,
    config: OpenRouterConfig,
    client: Client,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OpenRouterConfig::default())
    }

    /// Create a new OpenRouter provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(api_key: impl Into<String>, config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    fn build_request(&self, instruction: &str, prompt: &str) -> OpenRouterRequest {
        OpenRouterRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: instruction.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }

    fn call_api(&self, request: &OpenRouterRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "lex-quality")
            .json(request)
            .send()
            .map_err(reqwest::Error::without_url)?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "OpenRouter API Error {}: {}",
                response.status(),
                response.text()?
            ));
        }

        let result: OpenRouterResponse = response.json()?;
        extract_content(result)
    }
}

fn extract_content(result: OpenRouterResponse) -> Result<String> {
    result
        .choices
        .as_ref()
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.message.as_ref())
        .map(|msg| msg.content.clone())
        .ok_or_else(|| anyhow!("No response content from OpenRouter API"))
}

impl AIProvider for OpenRouterProvider {
    fn complete_json(&self, instruction: &str, prompt: &str) -> Result<String> {
        let request = self.build_request(instruction, prompt);
        self.call_api(&request)
    }

    fn name(&self) -> &str {
        "OpenRouter"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // OpenRouterResponse parsing tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_valid_response_structure() {
        let json = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "{\"issues\": []}"
                }
            }]
        }"#;

        let response: OpenRouterResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_content(response).unwrap(), r#"{"issues": []}"#);
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let response: OpenRouterResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(extract_content(response).is_err());
    }

    #[test]
    fn test_null_choices_is_an_error() {
        let response: OpenRouterResponse = serde_json::from_str(r#"{"choices": null}"#).unwrap();
        assert!(response.choices.is_none());
        assert!(extract_content(response).is_err());
    }

    #[test]
    fn test_missing_message_is_an_error() {
        let response: OpenRouterResponse =
            serde_json::from_str(r#"{"choices": [{"message": null}]}"#).unwrap();
        assert!(extract_content(response).is_err());
    }

    #[test]
    fn test_parse_malformed_json() {
        let json = r#"{"choices": [{"message": "not an object"}]}"#;

        let result: std::result::Result<OpenRouterResponse, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // -------------------------------------------------------------------------
    // Request tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_request_asks_for_json_object() {
        let provider = OpenRouterProvider::new("test-key").unwrap();
        let request = provider.build_request("You are a data quality expert.", "Table: orders");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a data quality expert.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Table: orders");
        assert_eq!(body["model"], DEFAULT_MODEL);
    }

    // -------------------------------------------------------------------------
    // Config builder tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_config_builder_defaults() {
        let config = OpenRouterConfig::builder().build();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_builder_custom_values() {
        let config = OpenRouterConfig::builder()
            .model("openai/gpt-4")
            .temperature(0.5)
            .max_tokens(200)
            .timeout_secs(10)
            .base_url("https://custom.api.com")
            .build();

        assert_eq!(config.model, "openai/gpt-4");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.base_url, "https://custom.api.com");
    }

    // -------------------------------------------------------------------------
    // Provider trait implementation tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_provider_name_and_model() {
        let provider = OpenRouterProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "OpenRouter");
        assert_eq!(provider.model(), Some(DEFAULT_MODEL));

        let config = OpenRouterConfig::builder().model("custom-model").build();
        let provider = OpenRouterProvider::with_config("test-key", config).unwrap();
        assert_eq!(provider.model(), Some("custom-model"));
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        let config = OpenRouterConfig::builder()
            .base_url("http://127.0.0.1:9/v1/chat/completions")
            .timeout_secs(2)
            .build();
        let provider = OpenRouterProvider::with_config("test-key", config).unwrap();

        assert!(provider.complete_json("instruction", "prompt").is_err());
    }
}
