use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ============================================================================
// Profile Types
// ============================================================================

/// Statistical profile of a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableProfile {
    pub table_name: String,
    pub row_count: usize,
    pub column_count: usize,
    /// Column profiles in source column order.
    pub columns: Vec<ColumnProfile>,
}

impl TableProfile {
    /// Look up a column profile by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|col| col.name == name)
    }
}

/// Statistical profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
    pub null_pct: f64,
    pub distinct_count: usize,
    pub distinct_pct: f64,
    /// Present only for numeric columns with at least one non-null value.
    #[serde(flatten)]
    pub numeric: Option<NumericSummary>,
    /// Up to five distinct non-null values in first-seen order.
    pub example_values: Vec<Value>,
}

impl ColumnProfile {
    /// Minimum value, if the column carries a numeric summary.
    pub fn min(&self) -> Option<f64> {
        self.numeric.as_ref().map(|n| n.min)
    }
}

/// Summary statistics of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

// ============================================================================
// Issue Types
// ============================================================================

/// Kind of a detected data quality issue.
///
/// The rule engine only emits the four named kinds; generative backends may
/// report anything, which is kept as [`IssueType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueType {
    HighNullRate,
    NonUniqueId,
    ConstantColumn,
    NegativeValues,
    Other(String),
}

impl IssueType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::HighNullRate => "high_null_rate",
            Self::NonUniqueId => "non_unique_id",
            Self::ConstantColumn => "constant_column",
            Self::NegativeValues => "negative_values",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for IssueType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "high_null_rate" => Self::HighNullRate,
            "non_unique_id" => Self::NonUniqueId,
            "constant_column" => Self::ConstantColumn,
            "negative_values" => Self::NegativeValues,
            _ => Self::Other(value),
        }
    }
}

impl From<IssueType> for String {
    fn from(value: IssueType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        match value.to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity '{}'", value)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business priority of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        match value.to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Self::Critical),
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Err(format!("unknown priority '{}'", value)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected data quality issue on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub column: String,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub priority: Priority,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub impact_description: String,
    #[serde(default)]
    pub action_recommendation: String,
    #[serde(default)]
    pub example: String,
    /// Numeric or scalar evidence for the issue.
    #[serde(default)]
    pub value: Value,
}

// ============================================================================
// Test Suggestion Types
// ============================================================================

/// The closed set of test kinds a suggestion may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    NotNull,
    Unique,
    AcceptedValues,
    Relationships,
    ExpectColumnValuesToBeBetween,
    ExpectColumnValuesToMatchRegex,
    ExpectColumnMeanToBeBetween,
}

impl TestType {
    pub const ALL: [TestType; 7] = [
        TestType::NotNull,
        TestType::Unique,
        TestType::AcceptedValues,
        TestType::Relationships,
        TestType::ExpectColumnValuesToBeBetween,
        TestType::ExpectColumnValuesToMatchRegex,
        TestType::ExpectColumnMeanToBeBetween,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotNull => "not_null",
            Self::Unique => "unique",
            Self::AcceptedValues => "accepted_values",
            Self::Relationships => "relationships",
            Self::ExpectColumnValuesToBeBetween => "expect_column_values_to_be_between",
            Self::ExpectColumnValuesToMatchRegex => "expect_column_values_to_match_regex",
            Self::ExpectColumnMeanToBeBetween => "expect_column_mean_to_be_between",
        }
    }
}

impl FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|test_type| test_type.as_str() == s)
            .ok_or_else(|| format!("unsupported test type '{}'", s))
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative assertion about one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    pub column: String,
    pub test_type: TestType,
    #[serde(default)]
    pub config: Map<String, Value>,
}

impl TestSpec {
    /// Create a test with an empty config.
    pub fn new(column: impl Into<String>, test_type: TestType) -> Self {
        Self {
            column: column.into(),
            test_type,
            config: Map::new(),
        }
    }

    /// Attach a config mapping.
    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = config;
        self
    }
}

/// Which path produced a stage's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Generative,
    RuleBased,
}

/// Output of the test suggestion stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuggestions {
    pub description: String,
    pub tests: Vec<TestSpec>,
    pub source: AnalysisSource,
}

/// Files written by a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub profile: Option<PathBuf>,
    pub tests: Option<PathBuf>,
}
