//! Anomaly detection over a table profile.
//!
//! This module provides both AI-powered and rule-based issue detectors, plus
//! the [`AnomalyDetector`] wrapper that tries the generative path first and
//! substitutes the rule engine on any backend failure.

mod ai_detector;
mod rule_detector;

pub use ai_detector::AiIssueDetector;
pub use rule_detector::{RuleBasedIssueDetector, is_amount_or_count_column, is_id_column};

use crate::ai::AIProvider;
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::types::{AnalysisSource, Issue, TableProfile};
use std::sync::Arc;
use tracing::{info, warn};

/// Trait for issue detectors.
///
/// Implementations can use AI, rule-based heuristics, or other strategies to
/// turn a profile into a list of issues.
pub trait IssueDetector: Send + Sync {
    /// Detect issues in a table profile.
    fn detect(&self, profile: &TableProfile) -> Result<Vec<Issue>>;
}

/// Two-tier anomaly detector.
///
/// Holds an optional generative backend. When one is configured it is asked
/// exactly once; any error falls through to the rule engine immediately.
pub struct AnomalyDetector {
    rules: RuleBasedIssueDetector,
    ai: Option<AiIssueDetector>,
}

impl AnomalyDetector {
    /// Create a detector with the given thresholds and optional backend.
    pub fn new(config: DetectionConfig, ai_provider: Option<Arc<dyn AIProvider>>) -> Self {
        Self {
            rules: RuleBasedIssueDetector::new(config),
            ai: ai_provider.map(AiIssueDetector::new),
        }
    }

    /// Create a detector that only uses the rule engine.
    pub fn rule_based(config: DetectionConfig) -> Self {
        Self::new(config, None)
    }

    /// Detect issues, reporting which path produced them.
    pub fn detect_with_source(&self, profile: &TableProfile) -> (Vec<Issue>, AnalysisSource) {
        if let Some(ai) = &self.ai {
            match ai.detect(profile) {
                Ok(issues) => {
                    info!("Generative detection found {} issue(s)", issues.len());
                    return (issues, AnalysisSource::Generative);
                }
                Err(e) => {
                    warn!("Generative detection failed ({}), falling back to rule-based", e);
                }
            }
        }

        let issues = self.rules.detect_issues(profile);
        info!("Rule-based detection found {} issue(s)", issues.len());
        (issues, AnalysisSource::RuleBased)
    }
}

impl IssueDetector for AnomalyDetector {
    fn detect(&self, profile: &TableProfile) -> Result<Vec<Issue>> {
        Ok(self.detect_with_source(profile).0)
    }
}
