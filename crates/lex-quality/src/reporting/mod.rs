//! Plain-text report rendering.
//!
//! The report has four sections: table summary, detected issues (most severe
//! first), suggested tests and output files. No terminal styling is applied so
//! the text can be written to a log or a file as-is.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_quality::reporting::ReportRenderer;
//!
//! let text = ReportRenderer::render(&result.profile, &result.issues, &result.suggestions, &paths);
//! println!("{}", text);
//! ```

use crate::types::{Issue, OutputPaths, TableProfile, TestSuggestions};
use crate::utils::format_count;
use std::collections::BTreeMap;
use std::fmt::Write;

const RULE_WIDTH: usize = 40;

/// Renders the end-of-run report.
pub struct ReportRenderer;

impl ReportRenderer {
    /// Render the full report.
    pub fn render(
        profile: &TableProfile,
        issues: &[Issue],
        suggestions: &TestSuggestions,
        output_paths: &OutputPaths,
    ) -> String {
        let mut out = String::new();
        Self::render_table_summary(&mut out, profile);
        Self::render_issues(&mut out, issues);
        Self::render_tests(&mut out, suggestions);
        Self::render_output_paths(&mut out, output_paths);
        out
    }

    fn section(out: &mut String, title: &str) {
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    }

    fn render_table_summary(out: &mut String, profile: &TableProfile) {
        Self::section(out, "TABLE SUMMARY");
        let _ = writeln!(out, "  Table Name:   {}", profile.table_name);
        let _ = writeln!(out, "  Row Count:    {}", format_count(profile.row_count));
        let _ = writeln!(out, "  Column Count: {}", profile.column_count);
        out.push('\n');
    }

    fn render_issues(out: &mut String, issues: &[Issue]) {
        Self::section(out, "DETECTED ISSUES");
        if issues.is_empty() {
            let _ = writeln!(out, "  No data quality issues detected");
            out.push('\n');
            return;
        }

        // sort_by_key is stable, so issues keep detection order within a severity
        let mut sorted: Vec<&Issue> = issues.iter().collect();
        sorted.sort_by_key(|issue| issue.severity);

        for issue in sorted {
            let _ = writeln!(
                out,
                "  [{}] {}: {} - {}",
                issue.severity.as_str().to_uppercase(),
                issue.column,
                issue.issue_type,
                issue.details
            );
        }
        out.push('\n');
    }

    fn render_tests(out: &mut String, suggestions: &TestSuggestions) {
        Self::section(out, "SUGGESTED TESTS");
        if suggestions.tests.is_empty() {
            let _ = writeln!(out, "  No tests suggested");
            out.push('\n');
            return;
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for test in &suggestions.tests {
            *counts.entry(test.test_type.as_str()).or_default() += 1;
        }

        let _ = writeln!(out, "  Total Tests:  {}", suggestions.tests.len());
        let _ = writeln!(out, "  Description:  {}", suggestions.description);
        let _ = writeln!(out, "  Tests by Type:");
        for (test_type, count) in counts {
            let _ = writeln!(out, "    - {}: {}", test_type, count);
        }
        out.push('\n');
    }

    fn render_output_paths(out: &mut String, paths: &OutputPaths) {
        Self::section(out, "OUTPUT FILES");
        if let Some(profile) = &paths.profile {
            let _ = writeln!(out, "  Profile JSON: {}", profile.display());
        }
        if let Some(tests) = &paths.tests {
            let _ = writeln!(out, "  Tests YAML:   {}", tests.display());
        }
    }
}
