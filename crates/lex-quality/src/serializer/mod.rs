//! dbt-style test configuration emitter.
//!
//! Tests are grouped by column in first-seen order, and each group keeps the
//! relative order of its tests. A test with an empty config renders as a bare
//! name; otherwise it renders as a single-key mapping `{test_type: config}`.
//!
//! ```yaml
//! version: 2
//! models:
//! - name: orders
//!   columns:
//!   - name: order_id
//!     tests:
//!     - unique
//!     - not_null
//! ```

use crate::error::Result;
use crate::types::TestSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Version marker written at the top of every document.
pub const CONFIG_VERSION: u32 = 2;

/// A complete test configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfigDocument {
    pub version: u32,
    pub models: Vec<ModelEntry>,
}

/// One model (table) and its column groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub columns: Vec<ColumnEntry>,
}

/// The tests attached to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub name: String,
    pub tests: Vec<TestEntry>,
}

/// A single rendered test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestEntry {
    /// Test without options, e.g. `- unique`.
    Bare(String),
    /// Test with options, e.g. `- accepted_values: {values: [a, b]}`.
    Configured(BTreeMap<String, BTreeMap<String, Value>>),
}

impl From<&TestSpec> for TestEntry {
    fn from(test: &TestSpec) -> Self {
        let name = test.test_type.as_str().to_string();
        if test.config.is_empty() {
            TestEntry::Bare(name)
        } else {
            // BTreeMap keeps option keys sorted regardless of serde_json's map ordering
            let config = test
                .config
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            TestEntry::Configured(BTreeMap::from([(name, config)]))
        }
    }
}

/// Build the document for one table.
pub fn build_document(table_name: &str, tests: &[TestSpec]) -> TestConfigDocument {
    let mut columns: Vec<ColumnEntry> = Vec::new();

    for test in tests {
        let entry = TestEntry::from(test);
        match columns.iter_mut().find(|group| group.name == test.column) {
            Some(group) => group.tests.push(entry),
            None => columns.push(ColumnEntry {
                name: test.column.clone(),
                tests: vec![entry],
            }),
        }
    }

    TestConfigDocument {
        version: CONFIG_VERSION,
        models: vec![ModelEntry {
            name: table_name.to_string(),
            columns,
        }],
    }
}

/// Render the document for one table as YAML.
pub fn to_yaml(table_name: &str, tests: &[TestSpec]) -> Result<String> {
    Ok(serde_yaml::to_string(&build_document(table_name, tests))?)
}
