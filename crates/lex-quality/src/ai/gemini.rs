//! Google Gemini AI provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the [`AIProvider`]
//! trait for Google's Gemini API (<https://ai.google.dev/>).
//!
//! The instruction is sent as a system instruction and the response MIME type
//! is pinned to `application/json`.

use std::time::Duration;

use super::AIProvider;
use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Default Gemini API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";

/// Header carrying the API key. The key never appears in the request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Default model to use for quality analysis.
const DEFAULT_MODEL: &str = "gemini-flash-lite-latest";

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default temperature for model responses (low for consistent analysis).
const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default max tokens for responses.
const DEFAULT_MAX_TOKENS: u32 = 4096;

// Gemini API request structures
#[derive(Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

// Gemini API response structures
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// The model to use (e.g., "gemini-2.0-flash", "gemini-flash-lite-latest").
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

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl GeminiConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }
}

/// Builder for [`GeminiConfig`].
#[derive(Default)]
pub struct GeminiConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl GeminiConfigBuilder {
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
    pub fn build(self) -> GeminiConfig {
        GeminiConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
        }
    }
}

/// Google Gemini AI provider for generative quality analysis.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::ai::{GeminiProvider, GeminiConfig};
///
/// let config = GeminiConfig::builder()
///     .model("gemini-2.0-flash")
///     .build();
/// let provider = GeminiProvider::with_config("your-api-key", config)?;
/// ```
pub struct GeminiProvider {
    api_key: String,
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, GeminiConfig::default())
    }

    /// Create a new Gemini provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(api_key: impl Into<String>, config: GeminiConfig) -> Result<Self> {
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

    fn build_request(&self, instruction: &str, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: instruction.to_owned(),
                }],
            },
            contents: vec![Content {
                role: "user".to_owned(),
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: "application/json",
            },
        }
    }

    fn call_api(&self, request: &GeminiRequest) -> Result<String> {
        // Build URL: {base_url}{model}:generateContent (key travels in a header)
        let url = format!(
            "{}{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(request)
            .send()
            .map_err(reqwest::Error::without_url)?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Gemini API error {}: {}",
                response.status(),
                response.text().map_err(reqwest::Error::without_url)?
            ));
        }

        let result: GeminiResponse = response.json().map_err(reqwest::Error::without_url)?;
        extract_text(result)
    }
}

/// Pull the text of the first candidate, rejecting blocked responses.
fn extract_text(result: GeminiResponse) -> Result<String> {
    result
        .candidates
        .as_ref()
        .and_then(|candidates| candidates.first())
        .and_then(|c| {
            if let Some(reason) = &c.finish_reason
                && (reason == "SAFETY" || reason == "BLOCKED")
            {
                return None;
            }
            c.content.as_ref()
        })
        .and_then(|content| content.parts.as_ref())
        .map(|parts| {
            parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .concat()
        })
        .filter(|text| !text.is_empty())
        .ok_or_else(|| anyhow!("No response content from Gemini API"))
}

impl AIProvider for GeminiProvider {
    fn complete_json(&self, instruction: &str, prompt: &str) -> Result<String> {
        let request = self.build_request(instruction, prompt);
        self.call_api(&request)
    }

    fn name(&self) -> &str {
        "Gemini"
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
    // GeminiResponse parsing tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_valid_response_structure() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "{\"issues\": []}"}]
                },
                "finishReason": "STOP"
            }]
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(response).unwrap(), r#"{"issues": []}"#);
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn test_null_candidates_is_an_error() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": null}"#).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn test_missing_parts_is_an_error() {
        let json = r#"{"candidates": [{"content": {"parts": null}, "finishReason": "STOP"}]}"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn test_safety_blocked_is_an_error() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "{}"}]},
                "finishReason": "SAFETY"
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn test_parse_malformed_json() {
        let json = r#"{"candidates": "not an array"}"#;

        let result: std::result::Result<GeminiResponse, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_multiple_parts_are_joined() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "{\"issues\":"},
                        {"text": " []}"}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(response).unwrap(), r#"{"issues": []}"#);
    }

    // -------------------------------------------------------------------------
    // Request tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_request_pins_json_mime_type() {
        let provider = GeminiProvider::new("test-key").unwrap();
        let request = provider.build_request("instruction text", "Table: orders");
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "instruction text");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Table: orders");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], DEFAULT_MAX_TOKENS);
    }

    // -------------------------------------------------------------------------
    // Config builder tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_config_builder_defaults() {
        let config = GeminiConfig::builder().build();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_builder_custom_values() {
        let config = GeminiConfig::builder()
            .model("gemini-2.0-flash")
            .temperature(0.3)
            .max_tokens(512)
            .timeout_secs(15)
            .base_url("https://proxy.example.com/models/")
            .build();

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.base_url, "https://proxy.example.com/models/");
    }

    // -------------------------------------------------------------------------
    // Provider trait implementation tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_transport_error_does_not_expose_api_key() {
        let config = GeminiConfig::builder()
            .base_url("http://127.0.0.1:9/v1beta/models/")
            .timeout_secs(2)
            .build();
        let provider = GeminiProvider::with_config("SECRET_KEY_123", config).unwrap();

        let err = provider.complete_json("instruction", "prompt").unwrap_err();
        let text = format!("{:#}", err);
        assert!(!text.contains("SECRET_KEY_123"), "key leaked: {}", text);
        assert!(!text.contains("key="));
    }

    #[test]
    fn test_provider_name_and_model() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "Gemini");
        assert_eq!(provider.model(), Some(DEFAULT_MODEL));
    }
}
