//! Integration tests for the data quality pipeline.
//!
//! These tests load fixture tables from disk and verify end-to-end behavior,
//! including the generative paths driven by in-process fake providers.

use lex_quality::ai::AIProvider;
use lex_quality::ai::prompts::DETECTION_INSTRUCTION;
use lex_quality::{
    AnalysisConfig, AnalysisSource, Analyzer, IssueType, OutputPaths, QualityError,
    ReportRenderer, TableLoader, TestType, write_outputs,
};
use pretty_assertions::assert_eq;
use serde_yaml::Value as Yaml;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn rule_based() -> Analyzer {
    Analyzer::builder()
        .config(AnalysisConfig::builder().use_ai(false).build().unwrap())
        .build()
        .unwrap()
}

/// Answers detection and generation prompts with separate canned bodies.
struct ScriptedProvider {
    detection: Option<String>,
    generation: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(detection: Option<&str>, generation: Option<&str>) -> Self {
        Self {
            detection: detection.map(str::to_string),
            generation: generation.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }
}

impl AIProvider for ScriptedProvider {
    fn complete_json(&self, instruction: &str, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = if instruction == DETECTION_INSTRUCTION {
            &self.detection
        } else {
            &self.generation
        };
        body.clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

// ============================================================================
// Loading Tests
// ============================================================================

#[test]
fn test_load_orders_fixture() {
    let table = TableLoader::load(fixtures_path().join("orders.csv"), "orders").unwrap();

    assert_eq!(table.df.shape(), (6, 5));
    assert_eq!(
        table.metadata.columns,
        vec!["order_id", "user_id", "status", "amount", "currency"]
    );
}

#[test]
fn test_load_errors_are_load_errors() {
    let missing = TableLoader::load(fixtures_path().join("missing.csv"), "missing").unwrap_err();
    assert!(matches!(missing, QualityError::NotFound(_)));

    let unsupported = TableLoader::load(fixtures_path().join("notes.txt"), "notes").unwrap_err();
    assert!(matches!(unsupported, QualityError::UnsupportedFormat { .. }));
    assert_eq!(unsupported.error_code(), "UNSUPPORTED_FORMAT");

    assert!(missing.is_load_error() && unsupported.is_load_error());
}

#[test]
fn test_column_changing_kind_late_is_profiled_as_text() {
    let table = TableLoader::load(fixtures_path().join("stock.csv"), "stock").unwrap();
    assert_eq!(table.metadata.row_count, 151);

    let profile = rule_based().profile(&table.df, "stock").unwrap();
    let qty = profile.column("qty").unwrap();
    assert_eq!(qty.dtype, "String");
    assert!(qty.numeric.is_none());
    assert_eq!(qty.distinct_count, 151);
}

// ============================================================================
// Rule-Based Pipeline Tests
// ============================================================================

#[test]
fn test_rule_based_pipeline_on_orders() {
    let table = TableLoader::load(fixtures_path().join("orders.csv"), "orders").unwrap();
    let result = rule_based().analyze(&table.df, "orders").unwrap();

    let status = result.profile.column("status").unwrap();
    assert_eq!(status.null_count, 3);
    assert_eq!(status.distinct_count, 2);

    assert_eq!(result.detection_source, AnalysisSource::RuleBased);
    let issues: Vec<(&str, IssueType)> = result
        .issues
        .iter()
        .map(|i| (i.column.as_str(), i.issue_type.clone()))
        .collect();
    assert_eq!(
        issues,
        vec![
            ("user_id", IssueType::NonUniqueId),
            ("status", IssueType::HighNullRate),
            ("amount", IssueType::NegativeValues),
            ("currency", IssueType::ConstantColumn),
        ]
    );

    assert_eq!(result.suggestions.source, AnalysisSource::RuleBased);
    let tests: Vec<(&str, TestType)> = result
        .suggestions
        .tests
        .iter()
        .map(|t| (t.column.as_str(), t.test_type))
        .collect();
    assert_eq!(
        tests,
        vec![
            ("user_id", TestType::Unique),
            ("order_id", TestType::NotNull),
            ("user_id", TestType::NotNull),
            ("amount", TestType::NotNull),
            ("currency", TestType::NotNull),
        ]
    );
}

#[test]
fn test_pipeline_is_deterministic() {
    let table = TableLoader::load(fixtures_path().join("orders.csv"), "orders").unwrap();
    let first = rule_based().analyze(&table.df, "orders").unwrap();
    let second = rule_based().analyze(&table.df, "orders").unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.test_config_yaml().unwrap(),
        second.test_config_yaml().unwrap()
    );
}

// ============================================================================
// Generative Path Tests
// ============================================================================

#[test]
fn test_generative_pipeline_filters_invalid_candidates() {
    let detection = r#"{"issues": [
        {"column": "status", "issue_type": "high_null_rate", "severity": "warning",
         "priority": "high", "details": "Half of the rows have no status"}
    ]}"#;
    let generation = r#"{"description": "Order integrity checks", "tests": [
        {"column": "order_id", "test_type": "unique"},
        {"column": "ghost", "test_type": "not_null"},
        {"column": "status", "test_type": "accepted_values",
         "config": {"values": ["paid", "refunded"]}},
        {"column": "amount", "test_type": "bogus"}
    ]}"#;
    let provider = Arc::new(ScriptedProvider::new(Some(detection), Some(generation)));

    let table = TableLoader::load(fixtures_path().join("orders.csv"), "orders").unwrap();
    let result = Analyzer::builder()
        .ai_provider(provider.clone())
        .build()
        .unwrap()
        .analyze(&table.df, "orders")
        .unwrap();

    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert_eq!(result.detection_source, AnalysisSource::Generative);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].details, "Half of the rows have no status");

    assert_eq!(result.suggestions.source, AnalysisSource::Generative);
    assert_eq!(result.suggestions.description, "Order integrity checks");
    let tests: Vec<(&str, TestType)> = result
        .suggestions
        .tests
        .iter()
        .map(|t| (t.column.as_str(), t.test_type))
        .collect();
    assert_eq!(
        tests,
        vec![
            ("order_id", TestType::Unique),
            ("status", TestType::AcceptedValues),
        ]
    );
}

#[test]
fn test_backend_outage_falls_back_for_both_stages() {
    let provider = Arc::new(ScriptedProvider::new(None, None));
    let table = TableLoader::load(fixtures_path().join("orders.csv"), "orders").unwrap();

    let with_outage = Analyzer::builder()
        .ai_provider(provider.clone())
        .build()
        .unwrap()
        .analyze(&table.df, "orders")
        .unwrap();
    let without_ai = rule_based().analyze(&table.df, "orders").unwrap();

    // one attempt per stage, no retries
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert_eq!(with_outage.detection_source, AnalysisSource::RuleBased);
    assert_eq!(with_outage.issues, without_ai.issues);
    assert_eq!(with_outage.suggestions, without_ai.suggestions);
}

#[test]
fn test_detection_failure_does_not_block_generation() {
    let generation = r#"{"description": "Keys", "tests": [
        {"column": "order_id", "test_type": "unique", "config": null}
    ]}"#;
    let provider = Arc::new(ScriptedProvider::new(Some("not json"), Some(generation)));
    let table = TableLoader::load(fixtures_path().join("orders.csv"), "orders").unwrap();

    let result = Analyzer::builder()
        .ai_provider(provider)
        .build()
        .unwrap()
        .analyze(&table.df, "orders")
        .unwrap();

    assert_eq!(result.detection_source, AnalysisSource::RuleBased);
    assert_eq!(result.issues.len(), 4);
    assert_eq!(result.suggestions.source, AnalysisSource::Generative);
    assert_eq!(result.suggestions.tests.len(), 1);
    assert!(result.suggestions.tests[0].config.is_empty());
}

// ============================================================================
// Output Tests
// ============================================================================

#[test]
fn test_write_outputs_and_report() {
    let dir = TempDir::new().unwrap();
    let table = TableLoader::load(fixtures_path().join("orders.csv"), "orders").unwrap();
    let result = rule_based().analyze(&table.df, "orders").unwrap();

    let paths = write_outputs(&result, dir.path()).unwrap();
    let tests_file = paths.tests.clone().unwrap();
    assert_eq!(tests_file, dir.path().join("tests/orders_tests.yml"));

    let doc: Yaml = serde_yaml::from_str(&std::fs::read_to_string(&tests_file).unwrap()).unwrap();
    assert_eq!(doc["version"].as_u64(), Some(2));
    assert_eq!(doc["models"][0]["name"].as_str(), Some("orders"));

    let columns = doc["models"][0]["columns"].as_sequence().unwrap();
    let names: Vec<&str> = columns
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["user_id", "order_id", "amount", "currency"]);
    assert_eq!(
        columns[0]["tests"],
        serde_yaml::from_str::<Yaml>("[unique, not_null]").unwrap()
    );

    let profile_json = std::fs::read_to_string(paths.profile.clone().unwrap()).unwrap();
    assert!(profile_json.contains("\"table_name\": \"orders\""));

    let report = ReportRenderer::render(
        &result.profile,
        &result.issues,
        &result.suggestions,
        &paths,
    );
    assert!(report.contains("  [ERROR] user_id: non_unique_id"));
    assert!(report.contains("  Total Tests:  5"));
    assert!(report.contains("    - not_null: 4\n    - unique: 1\n"));

    let empty_report = ReportRenderer::render(
        &result.profile,
        &[],
        &result.suggestions,
        &OutputPaths::default(),
    );
    assert!(empty_report.contains("No data quality issues detected"));
}
