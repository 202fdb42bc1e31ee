//! AI provider trait for abstracting LLM interactions.
//!
//! This module defines the [`AIProvider`] trait that lets the detection and
//! test suggestion stages talk to any generative backend (OpenRouter, Gemini,
//! a local model, or an in-process fake in tests) without changing the
//! pipeline logic.
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/ai/` (e.g., `ollama.rs`)
//! 2. Implement the [`AIProvider`] trait for your provider struct
//! 3. Export the provider in `src/ai/mod.rs`
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_quality::ai::{AIProvider, OpenRouterProvider};
//! use lex_quality::Analyzer;
//! use std::sync::Arc;
//!
//! let provider = Arc::new(OpenRouterProvider::new("your-api-key")?);
//! let analyzer = Analyzer::builder().ai_provider(provider).build()?;
//! ```

use anyhow::Result;

/// Trait for generative backends that answer with a single JSON object.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so providers can be shared behind an
/// `Arc` by both generative stages.
///
/// # Error Handling
///
/// Implementations return transport and API failures via `anyhow::Result`.
/// Callers treat every error as a backend failure and switch to the
/// rule-based path; providers never retry on their own.
pub trait AIProvider: Send + Sync {
    /// Send a fixed instruction plus a rendered prompt and return the raw
    /// response text.
    ///
    /// The response is expected to be a JSON object, but shape checking is the
    /// caller's job.
    fn complete_json(&self, instruction: &str, prompt: &str) -> Result<String>;

    /// Get the provider name for logging and debugging.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// assert_eq!(provider.name(), "OpenRouter");
    /// ```
    fn name(&self) -> &str;

    /// Get the model being used by this provider.
    ///
    /// Returns `None` if the provider doesn't expose model information.
    fn model(&self) -> Option<&str> {
        None
    }
}
