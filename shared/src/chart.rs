//! Series shaped for ApexCharts.
//!
//! The raw series maps are keyed by model; ApexCharts wants a list of named
//! series instead. Range series become `rangeBar` points, summary maps become
//! plain `bar` values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::series::{RangeSeries, SummarySeries};

/// Category label for range bars.
pub const RANGE_LABEL: &str = "Latency";

/// Output shape requested for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    /// Series keyed by model.
    #[default]
    Raw,
    /// Named series lists for ApexCharts.
    Apex,
}

impl std::fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Apex => write!(f, "apex"),
        }
    }
}

/// One `rangeBar` data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangePoint {
    /// Category label.
    pub x: String,
    /// `[start, end]` offsets in seconds.
    pub y: [f64; 2],
}

/// A named chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries<T> {
    /// Series name (the model).
    pub name: String,
    /// Data points.
    pub data: Vec<T>,
}

/// A chart-ready payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApexSeries {
    /// `rangeBar` series.
    RangeBar(Vec<ChartSeries<RangePoint>>),
    /// `bar` series with numeric values.
    Bar(Vec<ChartSeries<f64>>),
    /// `bar` series with integer values.
    Counts(Vec<ChartSeries<i64>>),
}

/// Converts range series into `rangeBar` series, one point per observation.
#[must_use]
pub fn range_bars(series: &RangeSeries, label: &str) -> Vec<ChartSeries<RangePoint>> {
    series
        .iter()
        .map(|(name, ranges)| ChartSeries {
            name: name.clone(),
            data: ranges
                .iter()
                .map(|&y| RangePoint {
                    x: label.to_string(),
                    y,
                })
                .collect(),
        })
        .collect()
}

/// Converts a `model -> values` map into named bar series.
#[must_use]
pub fn bars<T: Clone, const N: usize>(series: &IndexMap<String, [T; N]>) -> Vec<ChartSeries<T>> {
    series
        .iter()
        .map(|(name, values)| ChartSeries {
            name: name.clone(),
            data: values.to_vec(),
        })
        .collect()
}

/// Converts summary rows into named bar series of four values.
#[must_use]
pub fn summary_bars(series: &SummarySeries) -> Vec<ChartSeries<f64>> {
    // Token and call counts stay exact below 2^53.
    #[allow(clippy::cast_precision_loss)]
    let to_values = |row: &crate::series::SummaryRow| {
        vec![
            row.latency(),
            row.input_tokens() as f64,
            row.output_tokens() as f64,
            row.calls() as f64,
        ]
    };

    series
        .iter()
        .map(|(name, row)| ChartSeries {
            name: name.clone(),
            data: to_values(row),
        })
        .collect()
}
