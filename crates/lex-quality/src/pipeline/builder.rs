//! Main analysis pipeline module.
//!
//! This module provides the core `Analyzer` struct and builder for
//! orchestrating profile → detection → test suggestion.

use crate::ai::AIProvider;
use crate::config::{AnalysisConfig, ConfigValidationError};
use crate::detection::AnomalyDetector;
use crate::error::Result;
use crate::profiler::DataProfiler;
use crate::serializer;
use crate::suggestions::TestGenerator;
use crate::types::{AnalysisSource, Issue, TableProfile, TestSuggestions};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub profile: TableProfile,
    pub issues: Vec<Issue>,
    /// Which detection path produced `issues`.
    pub detection_source: AnalysisSource,
    pub suggestions: TestSuggestions,
}

impl AnalysisResult {
    /// The test configuration document for the suggested tests, as YAML.
    pub fn test_config_yaml(&self) -> Result<String> {
        serializer::to_yaml(&self.profile.table_name, &self.suggestions.tests)
    }

    /// The profile document, pretty-printed with two-space indentation.
    pub fn profile_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.profile)?)
    }
}

/// The main analysis pipeline.
///
/// Use [`Analyzer::builder()`] to create a new analyzer with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::{Analyzer, AnalysisConfig};
/// use lex_quality::ai::OpenRouterProvider;
/// use std::sync::Arc;
///
/// // With a generative backend
/// let provider = Arc::new(OpenRouterProvider::new(api_key)?);
/// let result = Analyzer::builder()
///     .ai_provider(provider)
///     .build()?
///     .analyze(&df, "orders")?;
///
/// // Without AI (rule-based)
/// let result = Analyzer::builder()
///     .config(AnalysisConfig::builder().use_ai(false).build()?)
///     .build()?
///     .analyze(&df, "orders")?;
/// ```
pub struct Analyzer {
    config: AnalysisConfig,
    detector: AnomalyDetector,
    generator: TestGenerator,
}

// Ensure Analyzer is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Analyzer: Send);

impl Analyzer {
    /// Create a new analyzer builder.
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    /// The configuration this analyzer was built with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Profile a table without running detection.
    pub fn profile(&self, df: &DataFrame, table_name: &str) -> Result<TableProfile> {
        info!("Profiling table '{}'...", table_name);
        let profile = DataProfiler::profile_table(df, table_name)?;
        info!(
            "Profiled {} rows x {} columns",
            profile.row_count, profile.column_count
        );
        Ok(profile)
    }

    /// Run the full pipeline on a table.
    ///
    /// Only profiling can fail; backend failures in the later stages are
    /// absorbed by the rule-based fallbacks.
    pub fn analyze(&self, df: &DataFrame, table_name: &str) -> Result<AnalysisResult> {
        let start_time = Instant::now();

        info!("Step 1: Profiling table...");
        let profile = self.profile(df, table_name)?;

        info!("Step 2: Detecting anomalies...");
        let (issues, detection_source) = self.detector.detect_with_source(&profile);
        info!("Found {} potential issue(s)", issues.len());

        info!("Step 3: Generating test suggestions...");
        let suggestions = self.generator.generate(&profile, &issues);
        info!("Generated {} test suggestion(s)", suggestions.tests.len());

        info!(
            "Analysis of '{}' finished in {:.2?}",
            table_name,
            start_time.elapsed()
        );

        Ok(AnalysisResult {
            profile,
            issues,
            detection_source,
            suggestions,
        })
    }
}

/// Builder for [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    config: Option<AnalysisConfig>,
    ai_provider: Option<Arc<dyn AIProvider>>,
}

// Ensure AnalyzerBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(AnalyzerBuilder: Send);

impl AnalyzerBuilder {
    /// Set the analysis configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the generative backend.
    ///
    /// Ignored when `use_ai` is false in the configuration. Without a
    /// provider both generative stages use their rule-based paths.
    pub fn ai_provider(mut self, provider: Arc<dyn AIProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Build the analyzer.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Analyzer, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let ai_provider = self.ai_provider.filter(|_| config.use_ai);
        match &ai_provider {
            Some(provider) => info!(
                "Using {} ({}) for generative analysis",
                provider.name(),
                provider.model().unwrap_or("default model")
            ),
            None => info!("Using rule-based analysis"),
        }

        Ok(Analyzer {
            detector: AnomalyDetector::new(config.detection(), ai_provider.clone()),
            generator: TestGenerator::new(config.not_null_threshold, ai_provider),
            config,
        })
    }
}
