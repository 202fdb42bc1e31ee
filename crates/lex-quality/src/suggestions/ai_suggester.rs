//! AI-powered test suggestions with a validation filter.

use super::TestSuggester;
use crate::ai::AIProvider;
use crate::ai::prompts::{
    GENERATION_INSTRUCTION, parse_json_object, render_issue_summary, render_profile_summary,
};
use crate::error::{QualityError, Result};
use crate::types::{AnalysisSource, Issue, TableProfile, TestSpec, TestSuggestions, TestType};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// AI-powered test suggester.
///
/// The response must be a JSON object with a string `description` and a
/// `tests` array. Candidates in the array are untrusted and go through
/// [`validate_candidates`]; a bad candidate is dropped, a bad envelope is an
/// error.
pub struct AiTestSuggester {
    ai_provider: Arc<dyn AIProvider>,
}

impl AiTestSuggester {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    fn build_prompt(profile: &TableProfile, issues: &[Issue]) -> String {
        let mut prompt = render_profile_summary(profile, false);
        prompt.push_str(&render_issue_summary(issues));
        prompt
    }

    fn parse_response(text: &str, profile: &TableProfile) -> Result<TestSuggestions> {
        let mut object =
            parse_json_object(text).map_err(|e| QualityError::Backend(e.to_string()))?;

        let description = match object.remove("description") {
            Some(Value::String(description)) => description,
            Some(_) => {
                return Err(QualityError::Backend(
                    "'description' is not a string".to_string(),
                ));
            }
            None => {
                return Err(QualityError::Backend(
                    "response is missing 'description'".to_string(),
                ));
            }
        };

        let candidates = match object.remove("tests") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(QualityError::Backend("'tests' is not an array".to_string())),
            None => {
                return Err(QualityError::Backend(
                    "response is missing 'tests'".to_string(),
                ));
            }
        };

        Ok(TestSuggestions {
            description,
            tests: validate_candidates(&candidates, profile),
            source: AnalysisSource::Generative,
        })
    }
}

impl TestSuggester for AiTestSuggester {
    fn suggest(&self, profile: &TableProfile, issues: &[Issue]) -> Result<TestSuggestions> {
        let prompt = Self::build_prompt(profile, issues);
        debug!(
            "Requesting test suggestions from {} ({})",
            self.ai_provider.name(),
            self.ai_provider.model().unwrap_or("default model")
        );

        let text = self
            .ai_provider
            .complete_json(GENERATION_INSTRUCTION, &prompt)
            .map_err(|e| QualityError::Backend(e.to_string()))?;

        Self::parse_response(&text, profile)
    }
}

/// Filter generated test candidates down to well-formed tests.
///
/// A candidate is dropped when it is not an object, lacks a string `column`
/// or `test_type`, names a column absent from the profile, uses a test type
/// outside the allowed set, or carries a `config` that is not a mapping.
/// A missing or null `config` becomes an empty mapping. Surviving candidates
/// keep their response order.
pub fn validate_candidates(candidates: &[Value], profile: &TableProfile) -> Vec<TestSpec> {
    let columns: HashSet<&str> = profile.columns.iter().map(|c| c.name.as_str()).collect();

    candidates
        .iter()
        .filter_map(|candidate| {
            let spec = validate_candidate(candidate, &columns);
            if spec.is_none() {
                debug!("Dropping invalid test candidate: {}", candidate);
            }
            spec
        })
        .collect()
}

fn validate_candidate(candidate: &Value, columns: &HashSet<&str>) -> Option<TestSpec> {
    let object = candidate.as_object()?;

    let column = object.get("column")?.as_str()?;
    if !columns.contains(column) {
        return None;
    }

    let test_type: TestType = object.get("test_type")?.as_str()?.parse().ok()?;

    let config = match object.get("config") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(config)) => config.clone(),
        Some(_) => return None,
    };

    Some(TestSpec::new(column, test_type).with_config(config))
}
