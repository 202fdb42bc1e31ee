//! Data profiling module for table analysis.
//!
//! This module computes the statistical profile consumed by every later stage:
//! - Null and distinct counts per column
//! - Numeric summary (min, max, mean, median, std) for numeric columns
//! - Up to five example values per column, converted to JSON primitives
//!
//! Profiling is all-or-nothing: any failure propagates and no partial profile
//! is ever returned.

mod statistics;
mod values;

use crate::error::{QualityError, Result};
use crate::types::{ColumnProfile, TableProfile};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use tracing::debug;

pub(crate) use statistics::numeric_summary;
pub(crate) use values::collect_example_values;

/// Maximum number of example values kept per column.
pub const MAX_EXAMPLE_VALUES: usize = 5;

/// Data profiler for analyzing table structure and statistics.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire table.
    ///
    /// Columns are profiled in source order. Identical input yields an
    /// identical profile.
    pub fn profile_table(df: &DataFrame, table_name: &str) -> Result<TableProfile> {
        let row_count = df.height();
        let mut columns = Vec::with_capacity(df.width());

        for col_name in df.get_column_names() {
            let profile = Self::profile_column(df, col_name, row_count).map_err(|e| {
                QualityError::ProfilingFailed(format!("column '{}': {}", col_name, e))
            })?;
            debug!(
                "  {}: {} (nulls: {}, distinct: {})",
                profile.name, profile.dtype, profile.null_count, profile.distinct_count
            );
            columns.push(profile);
        }

        Ok(TableProfile {
            table_name: table_name.to_string(),
            row_count,
            column_count: df.width(),
            columns,
        })
    }

    fn profile_column(df: &DataFrame, col_name: &str, row_count: usize) -> PolarsResult<ColumnProfile> {
        let series = nan_to_null(df.column(col_name)?.as_materialized_series())?;
        let dtype = format!("{:?}", series.dtype());

        let null_count = series.null_count();
        let non_null = series.drop_nulls();
        let distinct_count = non_null.n_unique()?;

        let numeric = if is_numeric_dtype(series.dtype()) {
            numeric_summary(&non_null)?
        } else {
            None
        };

        let example_values = collect_example_values(&non_null, MAX_EXAMPLE_VALUES)?;

        Ok(ColumnProfile {
            name: col_name.to_string(),
            dtype,
            null_count,
            null_pct: fraction(null_count, row_count),
            distinct_count,
            distinct_pct: fraction(distinct_count, row_count),
            numeric,
            example_values,
        })
    }
}

/// Float NaN counts as missing everywhere in the profile.
fn nan_to_null(series: &Series) -> PolarsResult<Series> {
    let cleaned = match series.dtype() {
        DataType::Float64 => series
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect::<Float64Chunked>()
            .into_series(),
        DataType::Float32 => series
            .f32()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect::<Float32Chunked>()
            .into_series(),
        _ => return Ok(series.clone()),
    };
    Ok(cleaned.with_name(series.name().clone()))
}

/// `count / total`, defined as 0 for an empty table.
fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
