//! Rule-based issue detection using thresholds and name heuristics.

use super::IssueDetector;
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::types::{ColumnProfile, Issue, IssueType, Priority, Severity, TableProfile};
use crate::utils::{format_pct, name_contains_any};
use serde_json::{Value, json};
use tracing::debug;

const ID_FRAGMENTS: &[&str] = &["_id", "id_", "identifier", "key"];

const AMOUNT_FRAGMENTS: &[&str] = &[
    "amount", "price", "cost", "total", "sum", "count", "quantity", "qty", "number", "num",
];

/// Whether a column name looks like an identifier.
pub fn is_id_column(name: &str) -> bool {
    name.eq_ignore_ascii_case("id") || name_contains_any(name, ID_FRAGMENTS)
}

/// Whether a column name looks like an amount or count field.
pub fn is_amount_or_count_column(name: &str) -> bool {
    name_contains_any(name, AMOUNT_FRAGMENTS)
}

/// Deterministic rule engine.
///
/// Checks run independently per column, so one column can produce several
/// issues. Output order is column order, then check order.
pub struct RuleBasedIssueDetector {
    config: DetectionConfig,
}

impl RuleBasedIssueDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Run every rule against every column. Never fails.
    pub fn detect_issues(&self, profile: &TableProfile) -> Vec<Issue> {
        let mut issues = Vec::new();

        for col in &profile.columns {
            if let Some(issue) = self.check_high_null_rate(col, profile.row_count) {
                issues.push(issue);
            }
            if let Some(issue) = self.check_non_unique_id(col, profile.row_count) {
                issues.push(issue);
            }
            if let Some(issue) = self.check_constant(col) {
                issues.push(issue);
            }
            if let Some(issue) = check_negative_values(col) {
                issues.push(issue);
            }
        }

        debug!("Rule engine produced {} issue(s)", issues.len());
        issues
    }

    fn check_high_null_rate(&self, col: &ColumnProfile, row_count: usize) -> Option<Issue> {
        if col.null_pct <= self.config.high_null_threshold {
            return None;
        }

        Some(Issue {
            column: col.name.clone(),
            issue_type: IssueType::HighNullRate,
            severity: Severity::Warning,
            priority: Priority::High,
            details: format!(
                "Column has {} null values (threshold: {})",
                format_pct(col.null_pct),
                format_pct(self.config.high_null_threshold)
            ),
            justification: "High null rates can indicate missing data or broken ingestion pipelines."
                .to_string(),
            impact_description:
                "Missing data can lead to incomplete analysis and inaccurate reporting.".to_string(),
            action_recommendation:
                "Check upstream data sources for missing values or adjust null thresholds."
                    .to_string(),
            example: format!("Null count: {}/{} rows", col.null_count, row_count),
            value: json!(col.null_pct),
        })
    }

    fn check_non_unique_id(&self, col: &ColumnProfile, row_count: usize) -> Option<Issue> {
        if !is_id_column(&col.name) || col.distinct_pct >= self.config.id_uniqueness_threshold {
            return None;
        }

        Some(Issue {
            column: col.name.clone(),
            issue_type: IssueType::NonUniqueId,
            severity: Severity::Error,
            priority: Priority::Critical,
            details: format!(
                "ID column is only {} unique (expected {})",
                format_pct(col.distinct_pct),
                format_pct(self.config.id_uniqueness_threshold)
            ),
            justification: "ID columns are expected to identify each row. Duplicates cause data integrity issues."
                .to_string(),
            impact_description:
                "Duplicate IDs can cause double-counting in aggregations and join explosions."
                    .to_string(),
            action_recommendation: "Remove duplicates or investigate why the ID is not unique."
                .to_string(),
            example: format!(
                "Unique count: {} vs Row count: {}",
                col.distinct_count, row_count
            ),
            value: json!(col.distinct_pct),
        })
    }

    fn check_constant(&self, col: &ColumnProfile) -> Option<Issue> {
        if col.distinct_count > self.config.constant_threshold {
            return None;
        }

        Some(Issue {
            column: col.name.clone(),
            issue_type: IssueType::ConstantColumn,
            severity: Severity::Info,
            priority: Priority::Low,
            details: format!("Column has only {} distinct value(s)", col.distinct_count),
            justification: "Constant columns provide no information gain and might be redundant."
                .to_string(),
            impact_description: "Redundant columns waste storage and computation.".to_string(),
            action_recommendation:
                "Consider removing this column if it is not needed for filtering.".to_string(),
            example: format!("Distinct count: {}", col.distinct_count),
            value: json!(col.distinct_count),
        })
    }
}

fn check_negative_values(col: &ColumnProfile) -> Option<Issue> {
    if !is_amount_or_count_column(&col.name) {
        return None;
    }
    let min = col.min().filter(|min| *min < 0.0)?;

    Some(Issue {
        column: col.name.clone(),
        issue_type: IssueType::NegativeValues,
        severity: Severity::Warning,
        priority: Priority::High,
        details: format!(
            "Column contains negative values (min: {}) but appears to be an amount/count field",
            min
        ),
        justification:
            "Amount and count fields are typically positive. Negative values might indicate data errors or returns."
                .to_string(),
        impact_description: "Negative values can skew totals and averages.".to_string(),
        action_recommendation:
            "Verify if negative values are expected (e.g., returns) or data errors.".to_string(),
        example: format!("Min value: {}", min),
        value: serde_json::Number::from_f64(min)
            .map(Value::Number)
            .unwrap_or(Value::Null),
    })
}

impl IssueDetector for RuleBasedIssueDetector {
    fn detect(&self, profile: &TableProfile) -> Result<Vec<Issue>> {
        Ok(self.detect_issues(profile))
    }
}
