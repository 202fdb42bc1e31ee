//! Statistical functions for numeric column profiling.

use crate::types::NumericSummary;
use polars::prelude::*;

/// Build the numeric summary of a series that already has its nulls dropped.
///
/// Returns `None` when no usable value remains. NaN is treated like a null.
pub(crate) fn numeric_summary(non_null: &Series) -> PolarsResult<Option<NumericSummary>> {
    let float_series = non_null.cast(&DataType::Float64)?;
    let values: Vec<f64> = float_series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();

    Ok(summarize(&values))
}

/// Summarize a slice of values; `None` when empty.
pub(crate) fn summarize(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = calculate_mean(values);

    Some(NumericSummary {
        min,
        max,
        mean,
        median: calculate_median(values),
        std: calculate_std(values, mean),
    })
}

fn calculate_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; the mean of the two middle values for even counts.
pub(crate) fn calculate_median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Sample standard deviation (n - 1); zero for fewer than two values.
pub(crate) fn calculate_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;

    if n <= 1.0 {
        return 0.0;
    }

    let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    variance.sqrt()
}
