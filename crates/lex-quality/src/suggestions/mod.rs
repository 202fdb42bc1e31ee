//! Test suggestion synthesis.
//!
//! Mirrors the detection stage: an AI-powered suggester whose output passes a
//! validation filter, a deterministic rule-based suggester, and the
//! [`TestGenerator`] wrapper that picks between them.

mod ai_suggester;
mod rule_suggester;

pub use ai_suggester::{AiTestSuggester, validate_candidates};
pub use rule_suggester::{FALLBACK_DESCRIPTION, RuleBasedTestSuggester};

use crate::ai::AIProvider;
use crate::error::Result;
use crate::types::{Issue, TableProfile, TestSuggestions};
use std::sync::Arc;
use tracing::{info, warn};

/// Trait for test suggesters.
pub trait TestSuggester: Send + Sync {
    /// Suggest tests for a profiled table and its detected issues.
    fn suggest(&self, profile: &TableProfile, issues: &[Issue]) -> Result<TestSuggestions>;
}

/// Two-tier test generator.
pub struct TestGenerator {
    rules: RuleBasedTestSuggester,
    ai: Option<AiTestSuggester>,
}

impl TestGenerator {
    /// Create a generator with the rule-based not-null threshold and an optional backend.
    pub fn new(not_null_threshold: f64, ai_provider: Option<Arc<dyn AIProvider>>) -> Self {
        Self {
            rules: RuleBasedTestSuggester::new(not_null_threshold),
            ai: ai_provider.map(AiTestSuggester::new),
        }
    }

    /// Create a generator that only uses the rule-based suggester.
    pub fn rule_based(not_null_threshold: f64) -> Self {
        Self::new(not_null_threshold, None)
    }

    /// Generate suggestions. Backend failures are logged and never surface.
    pub fn generate(&self, profile: &TableProfile, issues: &[Issue]) -> TestSuggestions {
        if let Some(ai) = &self.ai {
            match ai.suggest(profile, issues) {
                Ok(suggestions) => {
                    info!("Generative backend suggested {} test(s)", suggestions.tests.len());
                    return suggestions;
                }
                Err(e) => {
                    warn!("Generative test generation failed ({}), falling back to rule-based", e);
                }
            }
        }

        let suggestions = self.rules.suggest_tests(profile, issues);
        info!("Rule-based generation suggested {} test(s)", suggestions.tests.len());
        suggestions
    }
}

impl TestSuggester for TestGenerator {
    fn suggest(&self, profile: &TableProfile, issues: &[Issue]) -> Result<TestSuggestions> {
        Ok(self.generate(profile, issues))
    }
}
