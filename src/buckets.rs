//! Tab/facet buckets.
//!
//! Bucket names come from the raw collection so a tab never disappears
//! because a filter hid its last member; counts come from the filtered
//! collection so badges agree with what is on screen.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::aggregate::count_any;
use crate::filter::Criterion;
use crate::record::{FieldValue, Record};

pub const ALL_BUCKET: &str = "all";
pub const ISSUES_BUCKET: &str = "issues";

/// True for `all`/`issues` in any ASCII case. Tab selection uses the same
/// rule, so data values spelled like this never get a bucket of their own.
pub fn is_synthetic_bucket(name: &str) -> bool {
    name.eq_ignore_ascii_case(ALL_BUCKET) || name.eq_ignore_ascii_case(ISSUES_BUCKET)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub count: usize,
}

impl Bucket {
    fn new(name: &str, count: usize) -> Self {
        Bucket {
            name: name.to_string(),
            count,
        }
    }
}

/// Which field drives the tabs, and what counts as an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketSpec {
    pub field: String,
    /// Present when the page shows an "issues" tab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Criterion>>,
}

impl BucketSpec {
    pub fn new(field: &str) -> Self {
        BucketSpec {
            field: field.to_string(),
            issues: None,
        }
    }

    pub fn with_issues(mut self, criteria: Vec<Criterion>) -> Self {
        self.issues = Some(criteria);
        self
    }
}

/// Distinct text values of `field` in first-appearance order. List fields
/// contribute each element; missing fields contribute nothing.
pub fn distinct_values<T: Record>(records: &[T], field: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in records {
        for value in values_of(&record.field(field)) {
            if seen.insert(value.clone()) {
                out.push(value);
            }
        }
    }
    out
}

fn values_of(value: &FieldValue<'_>) -> Vec<String> {
    match value {
        FieldValue::List(items) => items
            .iter()
            .filter_map(|v| v.as_text().map(Cow::into_owned))
            .collect(),
        scalar => scalar.as_text().map(|t| vec![t.into_owned()]).unwrap_or_default(),
    }
}

/// `all`, then `issues` (if configured), then one bucket per distinct raw
/// value counted over `filtered`. Without a `BucketSpec` only `all` is produced.
pub fn build_buckets<T: Record, U: Record>(
    raw: &[T],
    filtered: &[U],
    spec: Option<&BucketSpec>,
) -> Vec<Bucket> {
    let mut out = vec![Bucket::new(ALL_BUCKET, filtered.len())];
    let Some(spec) = spec else {
        return out;
    };

    if let Some(issues) = spec.issues.as_ref() {
        out.push(Bucket::new(ISSUES_BUCKET, count_any(filtered, issues)));
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in filtered {
        let mut values = values_of(&record.field(&spec.field));
        values.sort();
        values.dedup();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    for name in distinct_values(raw, &spec.field) {
        if is_synthetic_bucket(&name) {
            log::warn!("Bucket value '{}' collides with a synthetic tab, skipping", name);
            continue;
        }
        let count = counts.get(&name).copied().unwrap_or(0);
        out.push(Bucket { name, count });
    }

    out
}
