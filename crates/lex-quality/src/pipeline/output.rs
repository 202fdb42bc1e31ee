//! Writing analysis documents to disk.

use super::AnalysisResult;
use crate::error::{Result, ResultExt};
use crate::types::{OutputPaths, TableProfile};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Path of the profile document for a table.
pub fn profile_path(output_dir: &Path, table_name: &str) -> PathBuf {
    output_dir.join(format!("{}_profile.json", table_name))
}

/// Path of the test configuration document for a table.
pub fn tests_path(output_dir: &Path, table_name: &str) -> PathBuf {
    output_dir
        .join("tests")
        .join(format!("{}_tests.yml", table_name))
}

/// Write only the profile document, creating `output_dir` if needed.
pub fn write_profile(profile: &TableProfile, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .context(format!("creating output directory {}", output_dir.display()))?;

    let path = profile_path(output_dir, &profile.table_name);
    fs::write(&path, serde_json::to_string_pretty(profile)?)
        .context(format!("writing {}", path.display()))?;
    info!("Profile written to {}", path.display());
    Ok(path)
}

/// Write the profile and test configuration documents.
///
/// Produces `<output_dir>/<table>_profile.json` and
/// `<output_dir>/tests/<table>_tests.yml`.
pub fn write_outputs(result: &AnalysisResult, output_dir: impl AsRef<Path>) -> Result<OutputPaths> {
    let output_dir = output_dir.as_ref();
    let profile = write_profile(&result.profile, output_dir)?;

    let tests = tests_path(output_dir, &result.profile.table_name);
    if let Some(parent) = tests.parent() {
        fs::create_dir_all(parent).context(format!("creating {}", parent.display()))?;
    }
    let yaml = result
        .test_config_yaml()
        .context(format!("rendering tests for '{}'", result.profile.table_name))?;
    fs::write(&tests, yaml).context(format!("writing {}", tests.display()))?;
    info!("Tests written to {}", tests.display());

    Ok(OutputPaths {
        profile: Some(profile),
        tests: Some(tests),
    })
}
