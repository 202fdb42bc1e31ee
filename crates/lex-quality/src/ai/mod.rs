//! AI module for the generative analysis backend.
//!
//! This module provides a trait-based abstraction for AI providers, allowing
//! the detection and test suggestion stages to work with multiple LLM backends.
//!
//! # Feature Flag
//!
//! The concrete provider implementations require the `ai` feature flag. The
//! [`AIProvider`] trait and the prompt helpers are always available, so custom
//! providers (and test fakes) work without it.
//!
//! ```toml
//! # Enable AI support (default)
//! lex-quality = { version = "0.1", features = ["ai"] }
//!
//! # Rule-based analysis only, no HTTP client
//! lex-quality = { version = "0.1", default-features = false }
//! ```
//!
//! # Architecture
//!
//! - [`AIProvider`] sends an instruction plus a prompt and returns raw text
//! - [`prompts`] owns the instruction texts, prompt rendering and strict JSON parsing
//! - [`OpenRouterProvider`] and [`GeminiProvider`] are the shipped backends

// Provider trait is always available (for custom implementations)
mod provider;
pub use provider::AIProvider;

pub mod prompts;

// Concrete providers require the "ai" feature
#[cfg(feature = "ai")]
mod gemini;
#[cfg(feature = "ai")]
mod openrouter;

#[cfg(feature = "ai")]
pub use gemini::{GeminiConfig, GeminiConfigBuilder, GeminiProvider};

#[cfg(feature = "ai")]
pub use openrouter::{OpenRouterConfig, OpenRouterConfigBuilder, OpenRouterProvider};
