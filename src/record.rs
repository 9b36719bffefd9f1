//! Schema-agnostic record access.
//!
//! The view pipeline never looks at concrete business fields. Everything it
//! needs goes through [`Record::field`], which returns a [`FieldValue`] for a
//! named field. Absent or null fields come back as [`FieldValue::Missing`]
//! and each stage applies its own default for them.

use std::borrow::Cow;

use serde_json::Value;

const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// A single field read from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Text(Cow<'a, str>),
    Number(f64),
    Bool(bool),
    List(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Finite numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Text form of a scalar value. Lists and missing values have none.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(t) => Some(Cow::Borrowed(t.as_ref())),
            // Inside the i64 range so the cast is exact and -0.0 reads "0".
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < I64_LIMIT => {
                Some(Cow::Owned(format!("{}", *n as i64)))
            }
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            FieldValue::Missing | FieldValue::List(_) => None,
        }
    }

    /// Existential test: for a list, true if any element passes; for a
    /// scalar, the test itself; for a missing value, false.
    pub fn any(&self, mut test: impl FnMut(&FieldValue<'a>) -> bool) -> bool {
        match self {
            FieldValue::Missing => false,
            FieldValue::List(items) => items.iter().any(|item| !item.is_missing() && test(item)),
            scalar => test(scalar),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Text(Cow::Borrowed(value.as_str()))
    }
}

impl<'a> From<&'a Option<String>> for FieldValue<'a> {
    fn from(value: &'a Option<String>) -> Self {
        value.as_ref().map(FieldValue::from).unwrap_or(FieldValue::Missing)
    }
}

impl<'a> From<&'a [String]> for FieldValue<'a> {
    fn from(value: &'a [String]) -> Self {
        FieldValue::List(value.iter().map(FieldValue::from).collect())
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Option<f64>> for FieldValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map(FieldValue::Number).unwrap_or(FieldValue::Missing)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Field accessor implemented by everything that flows through a view.
pub trait Record {
    /// Read a field by name. Unknown names return [`FieldValue::Missing`].
    fn field(&self, name: &str) -> FieldValue<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> FieldValue<'_> {
        (**self).field(name)
    }
}

/// JSON objects are addressed by dotted paths (`entity.id`).
impl Record for Value {
    fn field(&self, name: &str) -> FieldValue<'_> {
        let mut current = self;
        for segment in name.split('.') {
            match current.get(segment) {
                Some(next) => current = next,
                None => return FieldValue::Missing,
            }
        }
        from_json(current)
    }
}

fn from_json(value: &Value) -> FieldValue<'_> {
    match value {
        Value::Null | Value::Object(_) => FieldValue::Missing,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Missing),
        Value::String(s) => FieldValue::Text(Cow::Borrowed(s.as_str())),
        Value::Array(items) => FieldValue::List(items.iter().map(from_json).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_dotted_path_reads_nested_field() {
        let rec = json!({"entity": {"id": "acct-1"}, "name": "Acme"});
        assert_eq!(rec.field("entity.id"), FieldValue::from("acct-1"));
        assert_eq!(rec.field("name").as_text().as_deref(), Some("Acme"));
    }

    #[test]
    fn json_missing_and_null_are_missing() {
        let rec = json!({"goal": null});
        assert!(rec.field("goal").is_missing());
        assert!(rec.field("nope").is_missing());
        assert!(rec.field("goal.deeper").is_missing());
    }

    #[test]
    fn json_arrays_become_lists() {
        let rec = json!({"tags": ["retail", "b2c"]});
        let tags = rec.field("tags");
        assert!(tags.any(|t| t.as_text().as_deref() == Some("b2c")));
        assert!(!tags.any(|t| t.as_text().as_deref() == Some("wholesale")));
    }

    #[test]
    fn number_text_form_drops_integer_fraction() {
        assert_eq!(FieldValue::Number(8000.0).as_text().as_deref(), Some("8000"));
        assert_eq!(FieldValue::Number(4.5).as_text().as_deref(), Some("4.5"));
        assert_eq!(FieldValue::Number(-0.0).as_text().as_deref(), Some("0"));
    }

    #[test]
    fn huge_numbers_keep_their_digits() {
        assert_eq!(
            FieldValue::Number(1e20).as_text().as_deref(),
            Some("100000000000000000000")
        );
        assert_eq!(
            FieldValue::Number(-1e19).as_text().as_deref(),
            Some("-10000000000000000000")
        );
    }

    #[test]
    fn non_finite_numbers_are_not_numbers() {
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(FieldValue::from("3").as_number(), None);
    }

    #[test]
    fn missing_never_satisfies_any() {
        assert!(!FieldValue::Missing.any(|_| true));
    }
}
