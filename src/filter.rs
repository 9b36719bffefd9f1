//! Faceted record filtering.
//!
//! A [`FilterSet`] is a conjunction of independent [`Criterion`]s. An empty
//! set passes every record. "Show everything" for a control is the absence
//! of a criterion: build criteria through the `Option`-returning
//! constructors and push the result, so an `"all"` selection or a blank
//! search box simply never becomes a criterion.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::helpers::fold_text;
use crate::record::{FieldValue, Record};

/// UI value meaning "no filter on this control".
pub const ALL_SENTINEL: &str = "all";

/// One independent filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Criterion {
    /// Case-insensitive substring match against any of `fields`.
    Search { fields: Vec<String>, query: String },
    /// Categorical equality. List fields match if any element is equal.
    Equals { field: String, value: String },
    /// Tag membership: passes if any record tag is one of `values`.
    AnyTag { field: String, values: Vec<String> },
    /// Numeric field strictly below `threshold`.
    Below { field: String, threshold: f64 },
    /// Numeric field strictly above `threshold`.
    Above { field: String, threshold: f64 },
    /// List field with at least one element, or a non-blank scalar.
    NonEmpty { field: String },
    /// Disjunction, e.g. the "issues" tab.
    AnyOf { criteria: Vec<Criterion> },
}

impl Criterion {
    /// Text search over `fields`. A blank query is no criterion.
    pub fn search<S: AsRef<str>>(fields: &[S], query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() || fields.is_empty() {
            return None;
        }
        Some(Criterion::Search {
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            query: query.to_string(),
        })
    }

    /// Categorical equality, or no criterion for `"all"` and empty values.
    pub fn equals_or_all(field: &str, value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
            return None;
        }
        Some(Criterion::Equals {
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    /// Tag membership, or no criterion when nothing is selected.
    pub fn any_tag<S: AsRef<str>>(field: &str, values: &[S]) -> Option<Self> {
        let values: Vec<String> = values
            .iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(Criterion::AnyTag {
            field: field.to_string(),
            values,
        })
    }

    /// Evaluate this criterion against a record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Criterion::Search { fields, query } => {
                let needle = fold_text(query);
                if needle.is_empty() {
                    return true;
                }
                fields.iter().any(|field| {
                    record
                        .field(field)
                        .any(|v| v.as_text().is_some_and(|t| fold_text(&t).contains(&needle)))
                })
            }
            Criterion::Equals { field, value } => record
                .field(field)
                .any(|v| v.as_text().is_some_and(|t| t == value.as_str())),
            Criterion::AnyTag { field, values } => {
                if values.is_empty() {
                    return true;
                }
                record.field(field).any(|tag| {
                    tag.as_text()
                        .is_some_and(|t| values.iter().any(|v| v.as_str() == t))
                })
            }
            Criterion::Below { field, threshold } => {
                numeric(&record.field(field)).is_some_and(|n| n < *threshold)
            }
            Criterion::Above { field, threshold } => {
                numeric(&record.field(field)).is_some_and(|n| n > *threshold)
            }
            Criterion::NonEmpty { field } => match record.field(field) {
                FieldValue::Missing => false,
                FieldValue::List(items) => items.iter().any(|v| !v.is_missing()),
                FieldValue::Bool(b) => b,
                FieldValue::Number(n) => n != 0.0 && !n.is_nan(),
                FieldValue::Text(t) => !t.trim().is_empty(),
            },
            Criterion::AnyOf { criteria } => criteria.iter().any(|c| c.matches(record)),
        }
    }
}

fn numeric(value: &FieldValue<'_>) -> Option<f64> {
    value.as_number()
}

/// True if the record passes at least one criterion.
pub fn matches_any<R: Record + ?Sized>(criteria: &[Criterion], record: &R) -> bool {
    criteria.iter().any(|c| c.matches(record))
}

/// Conjunction of criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    criteria: Vec<Criterion>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion. `None` ("all") is dropped.
    pub fn push(&mut self, criterion: Option<Criterion>) -> &mut Self {
        if let Some(c) = criterion {
            self.criteria.push(c);
        }
        self
    }

    /// Builder form of [`FilterSet::push`].
    pub fn with(mut self, criterion: Option<Criterion>) -> Self {
        self.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.criteria.iter().all(|c| c.matches(record))
    }

    /// Records passing every criterion, in input order.
    pub fn apply<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}

impl FromIterator<Criterion> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        FilterSet {
            criteria: iter.into_iter().collect(),
        }
    }
}

/// Records passing every criterion in `filters`.
pub fn apply<'a, R: Record>(records: &'a [R], filters: &FilterSet) -> Vec<&'a R> {
    filters.apply(records)
}
