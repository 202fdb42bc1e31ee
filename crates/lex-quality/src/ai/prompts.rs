//! Instruction texts and prompt rendering for the generative backend.

use crate::types::{Issue, TableProfile};
use crate::utils::format_pct;
use anyhow::{Result, anyhow};
use serde_json::{Map, Value};

/// Instruction sent with every detection request.
pub const DETECTION_INSTRUCTION: &str = r#"You are a data quality expert helping identify anomalies in database tables.

Given a table profile, analyze the statistics and identify potential data quality issues.

**Look for these types of anomalies:**
- high_null_rate: Columns with an unexpectedly high percentage of null values (e.g., > 30%)
- non_unique_id: ID-like columns that are not 100% unique
- constant_column: Columns that have only 1 distinct value
- negative_values: Numeric columns (amount, price, count) that contain negative values
- suspicious_distribution: Columns with unusual statistical properties (e.g., mean far from median)

**Response format (strict JSON):**
{
  "issues": [
    {
      "column": "column_name",
      "issue_type": "high_null_rate",
      "severity": "warning",
      "priority": "HIGH",
      "details": "Column has 45% null values, which is high for a 'status' column",
      "justification": "Status columns usually track the state of a record and should be populated.",
      "impact_description": "Incomplete status tracking may lead to reporting gaps.",
      "action_recommendation": "Investigate upstream ingestion for missing status updates.",
      "example": "Null count: 450/1000 rows",
      "value": 0.45
    }
  ]
}

**Guidelines:**
1. Use "error" only for clear integrity problems and "warning" for suspicious but possible data.
2. Use column names to infer expected behavior (e.g., 'email' is usually unique).
3. ID columns should almost always be unique.
4. Return an empty list if no significant anomalies are found.
5. Assign a priority (CRITICAL, HIGH, MEDIUM, LOW) based on business impact.
"#;

/// Instruction sent with every test generation request.
pub const GENERATION_INSTRUCTION: &str = r#"You are a data quality expert helping generate dbt-style tests for database tables.

Given a table profile and detected data quality issues, suggest appropriate tests.

**Allowed test types:**
- not_null: Column should not contain null values
- unique: Column values should be unique
- accepted_values: Column should only contain specific values
- relationships: Column should reference values in another table
- expect_column_values_to_be_between: Numeric column should be within a range
- expect_column_values_to_match_regex: Column should match a pattern
- expect_column_mean_to_be_between: Column mean should be within a range

**Response format (strict JSON):**
{
  "description": "Brief summary of the test strategy",
  "tests": [
    {
      "column": "column_name",
      "test_type": "not_null",
      "config": {}
    }
  ]
}

**Guidelines:**
1. Prioritize tests for detected issues
2. Add not_null tests for columns with low null rates
3. Add unique tests for ID columns
4. Add range tests for numeric columns based on observed min/max
5. Keep config simple and practical
6. Suggest 3-10 tests per table
"#;

/// Render the natural-language profile summary sent to the backend.
///
/// The mean line is only part of the detection prompt.
pub fn render_profile_summary(profile: &TableProfile, include_mean: bool) -> String {
    let mut lines = vec![
        format!("Table: {}", profile.table_name),
        format!("Rows: {}", profile.row_count),
        format!("Columns: {}", profile.column_count),
        String::new(),
        "**Column Profiles:**".to_string(),
    ];

    for col in &profile.columns {
        lines.push(format!("- {} ({})", col.name, col.dtype));
        lines.push(format!("  - Null: {}", format_pct(col.null_pct)));
        lines.push(format!(
            "  - Distinct: {} ({})",
            col.distinct_count,
            format_pct(col.distinct_pct)
        ));
        if let Some(numeric) = &col.numeric {
            lines.push(format!("  - Range: [{}, {}]", numeric.min, numeric.max));
            if include_mean {
                lines.push(format!("  - Mean: {}", numeric.mean));
            }
        }
    }

    lines.join("\n")
}

/// Render the detected issues block appended to the generation prompt.
///
/// Empty when there are no issues.
pub fn render_issue_summary(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return String::new();
    }

    let mut lines = vec![String::new(), "**Detected Issues:**".to_string()];
    lines.extend(issues.iter().map(|issue| {
        format!(
            "- {}: {} ({}) - {}",
            issue.column, issue.issue_type, issue.severity, issue.details
        )
    }));
    lines.join("\n")
}

/// Parse a backend response that must be exactly one JSON object.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(text.trim())? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!(
            "expected a JSON object, got {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnProfile, IssueType, NumericSummary, Priority, Severity};
    use pretty_assertions::assert_eq;

    fn profile() -> TableProfile {
        TableProfile {
            table_name: "orders".to_string(),
            row_count: 10,
            column_count: 2,
            columns: vec![
                ColumnProfile {
                    name: "status".to_string(),
                    dtype: "String".to_string(),
                    null_count: 4,
                    null_pct: 0.4,
                    distinct_count: 3,
                    distinct_pct: 0.3,
                    numeric: None,
                    example_values: vec![],
                },
                ColumnProfile {
                    name: "amount".to_string(),
                    dtype: "Float64".to_string(),
                    null_count: 0,
                    null_pct: 0.0,
                    distinct_count: 10,
                    distinct_pct: 1.0,
                    numeric: Some(NumericSummary {
                        min: -5.0,
                        max: 120.5,
                        mean: 40.25,
                        median: 35.0,
                        std: 12.0,
                    }),
                    example_values: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_detection_summary_includes_mean() {
        let expected = "Table: orders\n\
                        Rows: 10\n\
                        Columns: 2\n\
                        \n\
                        **Column Profiles:**\n\
                        - status (String)\n  - Null: 40.0%\n  - Distinct: 3 (30.0%)\n\
                        - amount (Float64)\n  - Null: 0.0%\n  - Distinct: 10 (100.0%)\n\
                        \x20 - Range: [-5, 120.5]\n  - Mean: 40.25";
        assert_eq!(render_profile_summary(&profile(), true), expected);
    }

    #[test]
    fn test_generation_summary_omits_mean() {
        let rendered = render_profile_summary(&profile(), false);
        assert!(rendered.contains("  - Range: [-5, 120.5]"));
        assert!(!rendered.contains("Mean"));
    }

    #[test]
    fn test_issue_summary() {
        assert_eq!(render_issue_summary(&[]), "");

        let issue = Issue {
            column: "status".to_string(),
            issue_type: IssueType::HighNullRate,
            severity: Severity::Warning,
            priority: Priority::High,
            details: "Column has 40.0% null values".to_string(),
            justification: String::new(),
            impact_description: String::new(),
            action_recommendation: String::new(),
            example: String::new(),
            value: serde_json::json!(0.4),
        };
        assert_eq!(
            render_issue_summary(&[issue]),
            "\n**Detected Issues:**\n- status: high_null_rate (warning) - Column has 40.0% null values"
        );
    }

    #[test]
    fn test_parse_json_object_is_strict() {
        let parsed = parse_json_object("  {\"issues\": []}\n").unwrap();
        assert!(parsed.contains_key("issues"));

        assert!(parse_json_object("[]").is_err());
        assert!(parse_json_object("not json").is_err());
        assert!(parse_json_object("```json\n{\"issues\": []}\n```").is_err());
        assert!(parse_json_object("").is_err());
    }
}
