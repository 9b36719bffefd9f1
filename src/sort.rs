//! Comparator registry for single-key view sorting.
//!
//! Sort keys are the names the presentation layer uses for its columns
//! (`revenue`, `name`, `lastOrder`); each is registered against a record
//! field and a [`SortKind`]. Missing numbers order as 0 and missing or
//! unparseable dates order as the oldest instant.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::helpers::fold_text;
use crate::record::{FieldValue, Record};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Pure sign flip of an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Invalid sort direction: {}", other)),
        }
    }
}

/// The single active sort. An empty key preserves input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct SortSpec {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: &str, direction: SortDirection) -> Self {
        SortSpec {
            key: key.to_string(),
            direction,
        }
    }

    /// No ordering; the filtered order is kept.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.key.is_empty()
    }

    /// Column-header click: the active key flips direction, a new key
    /// starts descending.
    pub fn clicked(&self, key: &str) -> Self {
        if self.key == key {
            SortSpec::new(key, self.direction.toggle())
        } else {
            SortSpec::new(key, SortDirection::Desc)
        }
    }
}

/// Parses `key` or `key:asc|desc`.
impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((key, dir)) => Ok(SortSpec::new(key.trim(), dir.parse()?)),
            None => Ok(SortSpec::new(s.trim(), SortDirection::Asc)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub kind: SortKind,
}

/// Maps sort key names to typed record fields.
#[derive(Debug, Clone, Default)]
pub struct ComparatorRegistry {
    entries: Vec<(String, SortField)>,
}

impl ComparatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a sort key.
    pub fn register(&mut self, key: &str, field: &str, kind: SortKind) -> &mut Self {
        let entry = SortField {
            field: field.to_string(),
            kind,
        };
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((key.to_string(), entry)),
        }
        self
    }

    /// Builder form of [`ComparatorRegistry::register`].
    pub fn with(mut self, key: &str, field: &str, kind: SortKind) -> Self {
        self.register(key, field, kind);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SortField> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Comparator for `key` in `direction`. Unknown keys compare everything
    /// as equal, which leaves a stable sort untouched.
    pub fn compare<R: Record + ?Sized>(
        &self,
        key: &str,
        direction: SortDirection,
    ) -> impl Fn(&R, &R) -> Ordering {
        let field = self.get(key).cloned();
        if field.is_none() && !key.is_empty() {
            log::warn!("Unknown sort key '{}', keeping input order", key);
        }
        move |a: &R, b: &R| match &field {
            Some(f) => direction.apply(compare_values(f.kind, &a.field(&f.field), &b.field(&f.field))),
            None => Ordering::Equal,
        }
    }

    /// Stable in-place sort of borrowed records.
    pub fn sort<R: Record>(&self, records: &mut [&R], spec: &SortSpec) {
        if spec.is_none() {
            return;
        }
        let cmp = self.compare::<R>(&spec.key, spec.direction);
        records.sort_by(|a, b| cmp(*a, *b));
    }
}

/// Ascending comparison of two field values of the given kind.
pub fn compare_values(kind: SortKind, a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match kind {
        SortKind::Number => {
            let x = a.as_number().unwrap_or(0.0);
            let y = b.as_number().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        SortKind::Text => compare_text(
            a.as_text().as_deref().unwrap_or(""),
            b.as_text().as_deref().unwrap_or(""),
        ),
        // None < Some: missing dates are the oldest.
        SortKind::Date => parse_instant(a).cmp(&parse_instant(b)),
    }
}

/// Case- and width-insensitive ordering, raw text as the tiebreaker.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    fold_text(a).cmp(&fold_text(b)).then_with(|| a.cmp(b))
}

/// Parse a date field: RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`, or
/// epoch milliseconds.
pub fn parse_instant(value: &FieldValue<'_>) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Number(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
        FieldValue::Text(text) => {
            let text = text.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(ndt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
                return Some(ndt.and_utc());
            }
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|ndt| ndt.and_utc())
        }
        _ => None,
    }
}
