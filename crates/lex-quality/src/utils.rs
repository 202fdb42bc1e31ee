//! Shared utilities for the data quality pipeline.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Text Utilities
// =============================================================================

/// Format a fraction (0.0 - 1.0) as a percentage with one decimal place.
///
/// ```rust,ignore
/// assert_eq!(format_pct(0.45), "45.0%");
/// ```
pub fn format_pct(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Format a count with comma thousands separators.
///
/// ```rust,ignore
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Case-insensitive check whether `name` contains any of the given fragments.
pub fn name_contains_any(name: &str, fragments: &[&str]) -> bool {
    let lower = name.to_lowercase();
    fragments.iter().any(|fragment| lower.contains(fragment))
}

// =============================================================================
// Tests
// =============================================================================
