//! Pipeline module.
//!
//! This module provides the main analysis pipeline and output writing.

mod builder;
mod output;

pub use builder::{AnalysisResult, Analyzer, AnalyzerBuilder};
pub use output::{profile_path, tests_path, write_outputs, write_profile};
