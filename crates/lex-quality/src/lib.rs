//! Data Quality Auditing Library
//!
//! An AI-optional data quality auditor built with Rust and Polars.
//!
//! # Overview
//!
//! A run takes one table through four stages, strictly in sequence:
//!
//! - **Profiling**: per-column null, distinct, numeric and example-value statistics
//! - **Anomaly Detection**: generative detection with a rule-based fallback
//! - **Test Suggestion**: generative suggestions filtered against the profile, with a
//!   rule-based fallback
//! - **Serialization**: a dbt-style YAML test configuration document
//!
//! Backend failures never abort a run. Only loading and profiling errors are fatal.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_quality::{AnalysisConfig, Analyzer, TableLoader};
//! use lex_quality::ai::OpenRouterProvider;
//! use std::sync::Arc;
//!
//! let table = TableLoader::load("orders.csv", "orders")?;
//!
//! // Option 1: With a generative backend
//! let provider = Arc::new(OpenRouterProvider::new(api_key)?);
//! let result = Analyzer::builder()
//!     .ai_provider(provider)
//!     .build()?
//!     .analyze(&table.df, "orders")?;
//!
//! // Option 2: Rule-based only (no AI required)
//! let config = AnalysisConfig::builder()
//!     .use_ai(false)
//!     .high_null_threshold(0.5)
//!     .build()?;
//!
//! let result = Analyzer::builder()
//!     .config(config)
//!     .build()?
//!     .analyze(&table.df, "orders")?;
//!
//! println!("{}", result.test_config_yaml()?);
//! ```
//!
//! # AI Providers
//!
//! Generative backends implement the [`ai::AIProvider`] trait.
//! Currently implemented providers:
//!
//! - [`ai::OpenRouterProvider`] - OpenRouter API (supports multiple LLM models)
//! - [`ai::GeminiProvider`] - Google Gemini API
//!
//! To implement your own provider, see the [`ai`] module documentation.

pub mod ai;
pub mod config;
pub mod detection;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod serializer;
pub mod suggestions;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, DetectionConfig};
pub use detection::{AnomalyDetector, IssueDetector, RuleBasedIssueDetector};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use loader::{FileFormat, LoadedTable, TableLoader, TableMetadata};
pub use pipeline::{AnalysisResult, Analyzer, AnalyzerBuilder, write_outputs};
pub use profiler::DataProfiler;
pub use reporting::ReportRenderer;
pub use serializer::{TestConfigDocument, to_yaml};
pub use suggestions::{RuleBasedTestSuggester, TestGenerator, TestSuggester};
pub use types::{
    AnalysisSource, ColumnProfile, Issue, IssueType, NumericSummary, OutputPaths, Priority,
    Severity, TableProfile, TestSpec, TestSuggestions, TestType,
};
