//! Configuration types for the data quality pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup. Components receive their
//! configuration explicitly at construction; nothing here reads the environment.

use serde::{Deserialize, Serialize};

/// Default fraction of nulls above which a column is flagged.
pub const DEFAULT_HIGH_NULL_THRESHOLD: f64 = 0.3;

/// Default distinct-value count at or below which a column is constant.
pub const DEFAULT_CONSTANT_THRESHOLD: usize = 1;

/// Default required uniqueness fraction for identifier columns.
pub const DEFAULT_ID_UNIQUENESS_THRESHOLD: f64 = 1.0;

/// Default null fraction below which a `not_null` test is suggested.
pub const DEFAULT_NOT_NULL_THRESHOLD: f64 = 0.05;

/// Thresholds used by the rule-based anomaly detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub high_null_threshold: f64,
    pub constant_threshold: usize,
    pub id_uniqueness_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            high_null_threshold: DEFAULT_HIGH_NULL_THRESHOLD,
            constant_threshold: DEFAULT_CONSTANT_THRESHOLD,
            id_uniqueness_threshold: DEFAULT_ID_UNIQUENESS_THRESHOLD,
        }
    }
}

/// Configuration for the analysis pipeline.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_quality::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .high_null_threshold(0.5)
///     .use_ai(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Columns with a null fraction strictly above this value get a
    /// `high_null_rate` issue (0.0 - 1.0).
    /// Default: 0.3 (30%)
    pub high_null_threshold: f64,

    /// Columns with at most this many distinct values get a `constant_column` issue.
    /// Default: 1
    pub constant_threshold: usize,

    /// Identifier-like columns with a distinct fraction strictly below this value
    /// get a `non_unique_id` issue (0.0 - 1.0).
    /// Default: 1.0 (100%)
    pub id_uniqueness_threshold: f64,

    /// Columns with a null fraction strictly below this value get a `not_null`
    /// test from the rule-based suggester (0.0 - 1.0).
    /// Default: 0.05 (5%)
    pub not_null_threshold: f64,

    /// Whether to consult the generative backend (requires a provider).
    /// If false or no provider is given, rule-based detection and suggestions are used.
    /// Default: true
    pub use_ai: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_null_threshold: DEFAULT_HIGH_NULL_THRESHOLD,
            constant_threshold: DEFAULT_CONSTANT_THRESHOLD,
            id_uniqueness_threshold: DEFAULT_ID_UNIQUENESS_THRESHOLD,
            not_null_threshold: DEFAULT_NOT_NULL_THRESHOLD,
            use_ai: true,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// The detector thresholds carried by this configuration.
    pub fn detection(&self) -> DetectionConfig {
        DetectionConfig {
            high_null_threshold: self.high_null_threshold,
            constant_threshold: self.constant_threshold,
            id_uniqueness_threshold: self.id_uniqueness_threshold,
        }
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let fractions = [
            ("high_null_threshold", self.high_null_threshold),
            ("id_uniqueness_threshold", self.id_uniqueness_threshold),
            ("not_null_threshold", self.not_null_threshold),
        ];

        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    high_null_threshold: Option<f64>,
    constant_threshold: Option<usize>,
    id_uniqueness_threshold: Option<f64>,
    not_null_threshold: Option<f64>,
    use_ai: Option<bool>,
}

impl AnalysisConfigBuilder {
    /// Set the null fraction above which a column is reported.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.3 = 30%)
    pub fn high_null_threshold(mut self, threshold: f64) -> Self {
        self.high_null_threshold = Some(threshold);
        self
    }

    /// Set the distinct count at or below which a column is constant.
    pub fn constant_threshold(mut self, threshold: usize) -> Self {
        self.constant_threshold = Some(threshold);
        self
    }

    /// Set the uniqueness fraction identifier columns must reach.
    pub fn id_uniqueness_threshold(mut self, threshold: f64) -> Self {
        self.id_uniqueness_threshold = Some(threshold);
        self
    }

    /// Set the null fraction below which a `not_null` test is suggested.
    pub fn not_null_threshold(mut self, threshold: f64) -> Self {
        self.not_null_threshold = Some(threshold);
        self
    }

    /// Enable or disable the generative backend.
    pub fn use_ai(mut self, use_ai: bool) -> Self {
        self.use_ai = Some(use_ai);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let config = AnalysisConfig {
            high_null_threshold: self
                .high_null_threshold
                .unwrap_or(DEFAULT_HIGH_NULL_THRESHOLD),
            constant_threshold: self.constant_threshold.unwrap_or(DEFAULT_CONSTANT_THRESHOLD),
            id_uniqueness_threshold: self
                .id_uniqueness_threshold
                .unwrap_or(DEFAULT_ID_UNIQUENESS_THRESHOLD),
            not_null_threshold: self.not_null_threshold.unwrap_or(DEFAULT_NOT_NULL_THRESHOLD),
            use_ai: self.use_ai.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
