//! Summary metrics over a record set.
//!
//! Reducers never fail: missing numeric fields count as 0, empty sets
//! produce 0 rather than NaN, and goal percentages are clamped to [0, 100].

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::filter::{matches_any, Criterion};
use crate::helpers::format_grouped;
use crate::record::Record;

/// How a metric collapses a record set into one number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Reducer {
    /// Number of records.
    Count,
    /// Records matching at least one criterion (e.g. "issues").
    CountAny { criteria: Vec<Criterion> },
    Sum { field: String },
    /// Mean over all records; missing values count as 0.
    Mean { field: String },
    /// Smallest present value, 0 if none.
    Min { field: String },
    /// Largest present value, 0 if none.
    Max { field: String },
    /// Share of records matching any criterion, as a percentage.
    Rate { criteria: Vec<Criterion> },
    /// Percent of goal over the field totals.
    GoalPercent { current: String, goal: String },
    /// Sum of `field * weight / scale` per record, e.g. deal value weighted
    /// by win probability (`scale` 100). Missing factors count as 0.
    WeightedSum {
        field: String,
        weight: String,
        #[serde(default = "unit_scale")]
        scale: f64,
    },
}

fn unit_scale() -> f64 {
    1.0
}

impl Reducer {
    pub fn reduce<T: Record>(&self, records: &[T]) -> f64 {
        match self {
            Reducer::Count => records.len() as f64,
            Reducer::CountAny { criteria } => count_any(records, criteria) as f64,
            Reducer::Sum { field } => sum(records, field),
            Reducer::Mean { field } => {
                if records.is_empty() {
                    0.0
                } else {
                    sum(records, field) / records.len() as f64
                }
            }
            Reducer::Min { field } => present(records, field).reduce(f64::min).unwrap_or(0.0),
            Reducer::Max { field } => present(records, field).reduce(f64::max).unwrap_or(0.0),
            Reducer::Rate { criteria } => {
                if records.is_empty() {
                    0.0
                } else {
                    count_any(records, criteria) as f64 / records.len() as f64 * 100.0
                }
            }
            Reducer::GoalPercent { current, goal } => {
                percent_of_goal(sum(records, current), sum(records, goal))
            }
            Reducer::WeightedSum {
                field,
                weight,
                scale,
            } => weighted_sum(records, field, weight, *scale),
        }
    }
}

fn present<'a, T: Record>(records: &'a [T], field: &'a str) -> impl Iterator<Item = f64> + 'a {
    records.iter().filter_map(move |r| r.field(field).as_number())
}

// `Iterator::sum` for floats starts at -0.0, which leaks into the JSON.
fn sum<T: Record>(records: &[T], field: &str) -> f64 {
    present(records, field).fold(0.0, |acc, v| acc + v)
}

fn weighted_sum<T: Record>(records: &[T], field: &str, weight: &str, scale: f64) -> f64 {
    if scale == 0.0 || !scale.is_finite() {
        return 0.0;
    }
    records
        .iter()
        .map(|r| {
            let value = r.field(field).as_number().unwrap_or(0.0);
            let factor = r.field(weight).as_number().unwrap_or(0.0);
            value * factor / scale
        })
        .fold(0.0, |acc, v| acc + v)
}

/// Records matching at least one of `criteria`.
pub fn count_any<T: Record>(records: &[T], criteria: &[Criterion]) -> usize {
    records.iter().filter(|r| matches_any(criteria, *r)).count()
}

/// `min(round(current / goal * 100), 100)`, floored at 0. A zero or
/// non-finite goal yields 0.
pub fn percent_of_goal(current: f64, goal: f64) -> f64 {
    if goal == 0.0 || !goal.is_finite() || !current.is_finite() {
        return 0.0;
    }
    let percent = (current / goal * 100.0).round().clamp(0.0, 100.0);
    // Small negative progress rounds to -0.0.
    if percent == 0.0 {
        0.0
    } else {
        percent
    }
}

/// Per-record progress toward a goal, e.g. a channel's revenue bar.
pub fn record_goal_percent<R: Record + ?Sized>(record: &R, current: &str, goal: &str) -> f64 {
    let current = record.field(current).as_number().unwrap_or(0.0);
    let goal = record.field(goal).as_number().unwrap_or(0.0);
    percent_of_goal(current, goal)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MetricFormat {
    /// Up to one decimal place.
    #[default]
    Number,
    Integer,
    Currency,
    Percent,
}

impl MetricFormat {
    pub fn format(self, value: f64) -> String {
        if !value.is_finite() {
            return "0".to_string();
        }
        match self {
            MetricFormat::Number => {
                let rounded = (value * 10.0).round() / 10.0;
                if rounded.fract() == 0.0 {
                    format_grouped(rounded, 0)
                } else {
                    format_grouped(rounded, 1)
                }
            }
            MetricFormat::Integer => format_grouped(value.round(), 0),
            MetricFormat::Currency => {
                let whole = value.round();
                let digits = format_grouped(whole.abs(), 0);
                if whole < 0.0 {
                    format!("-${}", digits)
                } else {
                    format!("${}", digits)
                }
            }
            MetricFormat::Percent => format!("{}%", format_grouped(value.round(), 0)),
        }
    }
}

/// A named reducer with its display format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetric {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub reducer: Reducer,
    #[serde(default)]
    pub format: MetricFormat,
}

impl SummaryMetric {
    pub fn new(name: &str, reducer: Reducer) -> Self {
        SummaryMetric {
            name: name.to_string(),
            label: String::new(),
            reducer,
            format: MetricFormat::default(),
        }
    }

    pub fn with_format(mut self, format: MetricFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
}

/// Metric values by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Summary(BTreeMap<String, f64>);

impl Summary {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Display rows in `metrics` order.
    pub fn formatted(&self, metrics: &[SummaryMetric]) -> Vec<FormattedMetric> {
        metrics
            .iter()
            .map(|m| {
                let value = self.get(&m.name).unwrap_or(0.0);
                FormattedMetric {
                    name: m.name.clone(),
                    label: if m.label.is_empty() {
                        m.name.clone()
                    } else {
                        m.label.clone()
                    },
                    value,
                    display: m.format.format(value),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedMetric {
    pub name: String,
    pub label: String,
    pub value: f64,
    pub display: String,
}

/// Compute every metric over `records`.
pub fn summarize<T: Record>(records: &[T], metrics: &[SummaryMetric]) -> Summary {
    Summary(
        metrics
            .iter()
            .map(|m| (m.name.clone(), m.reducer.reduce(records)))
            .collect(),
    )
}
