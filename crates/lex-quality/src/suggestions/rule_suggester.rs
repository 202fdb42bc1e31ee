//! Rule-based test suggestions.

use super::TestSuggester;
use crate::error::Result;
use crate::types::{
    AnalysisSource, Issue, IssueType, TableProfile, TestSpec, TestSuggestions, TestType,
};

/// Description attached to every rule-based suggestion set.
pub const FALLBACK_DESCRIPTION: &str =
    "Rule-based test suggestions (generative backend unavailable)";

/// Deterministic suggester.
///
/// Two independent passes: a `unique` test for every `non_unique_id` issue,
/// then a `not_null` test for every column whose null fraction is below the
/// threshold. Overlapping tests for the same column are kept as-is.
pub struct RuleBasedTestSuggester {
    not_null_threshold: f64,
}

impl RuleBasedTestSuggester {
    pub fn new(not_null_threshold: f64) -> Self {
        Self { not_null_threshold }
    }

    pub fn suggest_tests(&self, profile: &TableProfile, issues: &[Issue]) -> TestSuggestions {
        // high_null_rate issues get no test from this pass
        let unique_tests = issues
            .iter()
            .filter(|issue| issue.issue_type == IssueType::NonUniqueId)
            .map(|issue| TestSpec::new(issue.column.clone(), TestType::Unique));

        let not_null_tests = profile
            .columns
            .iter()
            .filter(|col| col.null_pct < self.not_null_threshold)
            .map(|col| TestSpec::new(col.name.clone(), TestType::NotNull));

        TestSuggestions {
            description: FALLBACK_DESCRIPTION.to_string(),
            tests: unique_tests.chain(not_null_tests).collect(),
            source: AnalysisSource::RuleBased,
        }
    }
}

impl TestSuggester for RuleBasedTestSuggester {
    fn suggest(&self, profile: &TableProfile, issues: &[Issue]) -> Result<TestSuggestions> {
        Ok(self.suggest_tests(profile, issues))
    }
}
