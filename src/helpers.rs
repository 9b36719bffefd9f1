use unicode_normalization::UnicodeNormalization;

/// Fold a string for case-insensitive matching: NFKC + lowercase.
///
/// Example: "ＡＣＭＥ Corp" → "acme corp"
pub fn fold_text(value: &str) -> String {
    value.nfkc().collect::<String>().to_lowercase()
}

/// Insert thousands separators into the integer part of an unsigned
/// decimal string.
///
/// Example: "1234567.5" → "1,234,567.5"
pub fn group_digits(digits: &str) -> String {
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    let mut out = String::with_capacity(digits.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Format a number with `decimals` places and thousands separators. Never
/// goes through an integer cast, so large values keep every digit.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let body = group_digits(&format!("{:.*}", decimals, value.abs()));
    let is_zero = body.chars().all(|c| matches!(c, '0' | ',' | '.'));
    if value < 0.0 && !is_zero {
        format!("-{}", body)
    } else {
        body
    }
}

/// Short name of a JSON value's kind, for error messages.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
