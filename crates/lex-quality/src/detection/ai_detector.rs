//! AI-powered issue detection using an LLM via API.

use super::IssueDetector;
use crate::ai::AIProvider;
use crate::ai::prompts::{DETECTION_INSTRUCTION, parse_json_object, render_profile_summary};
use crate::error::{QualityError, Result};
use crate::types::{Issue, TableProfile};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// AI-powered issue detector.
///
/// Sends the detection instruction plus a rendered profile summary and
/// requires a JSON object with an `issues` array. Every failure is an error;
/// falling back is the caller's decision.
pub struct AiIssueDetector {
    ai_provider: Arc<dyn AIProvider>,
}

impl AiIssueDetector {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    fn parse_response(text: &str) -> Result<Vec<Issue>> {
        let mut object =
            parse_json_object(text).map_err(|e| QualityError::Backend(e.to_string()))?;

        let issues = match object.remove("issues") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(QualityError::Backend(
                    "'issues' is not an array".to_string(),
                ));
            }
            None => {
                return Err(QualityError::Backend(
                    "response is missing 'issues'".to_string(),
                ));
            }
        };

        serde_json::from_value(Value::Array(issues))
            .map_err(|e| QualityError::Backend(format!("malformed issue: {}", e)))
    }
}

impl IssueDetector for AiIssueDetector {
    fn detect(&self, profile: &TableProfile) -> Result<Vec<Issue>> {
        let prompt = render_profile_summary(profile, true);
        debug!(
            "Requesting issue detection from {} ({})",
            self.ai_provider.name(),
            self.ai_provider.model().unwrap_or("default model")
        );

        let text = self
            .ai_provider
            .complete_json(DETECTION_INSTRUCTION, &prompt)
            .map_err(|e| QualityError::Backend(e.to_string()))?;

        Self::parse_response(&text)
    }
}
