//! Turns loosely-keyed upload records into `Student`s.
//!
//! Nothing here fails: a missing name becomes `""` and a missing or garbled
//! grade becomes `0`.

use serde_json::{Map, Value};

use crate::models::Student;

/// One untyped upload row, keyed by column header.
pub type RawRecord = Map<String, Value>;

pub const NAME_ALIASES: &[&str] = &["Name", "name"];
pub const GRADE_ALIASES: &[&str] = &["Grade", "grade"];

pub const DEFAULT_BATCH_SIZE: usize = 1000;

pub fn normalize_rows(records: &[RawRecord]) -> Vec<Student> {
    normalize_rows_batched(records, DEFAULT_BATCH_SIZE)
}

/// Same output as `normalize_rows`; `batch_size` only controls how the work is
/// sliced, and a zero size is treated as one.
pub fn normalize_rows_batched(records: &[RawRecord], batch_size: usize) -> Vec<Student> {
    let batch_size = batch_size.max(1);
    let mut students = Vec::with_capacity(records.len());

    for (batch_index, batch) in records.chunks(batch_size).enumerate() {
        students.extend(batch.iter().map(normalize_record));
        tracing::debug!(
            batch = batch_index,
            rows = batch.len(),
            total = students.len(),
            "normalized batch"
        );
    }

    students
}

pub fn normalize_record(record: &RawRecord) -> Student {
    Student::new(extract_name(record), extract_grade(record))
}

fn first_present<'a>(record: &'a RawRecord, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| record.get(*alias))
        .find(|value| is_truthy(value))
}

fn extract_name(record: &RawRecord) -> String {
    match first_present(record, NAME_ALIASES) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn extract_grade(record: &RawRecord) -> f64 {
    let grade = match first_present(record, GRADE_ALIASES) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => parse_leading_float(text),
        _ => None,
    };

    grade.filter(|value| value.is_finite()).unwrap_or(0.0)
}

/// Empty strings, zero, `false` and null all fall through to the next alias.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parses the longest numeric prefix of `text`, so `"85%"` reads as 85.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn missing_name_defaults_to_empty() {
        let student = normalize_record(&record(json!({ "Grade": 70 })));
        assert_eq!(student.name, "");
        assert_eq!(student.grade, 70.0);
    }

    #[test]
    fn unparsable_grade_defaults_to_zero() {
        let student = normalize_record(&record(json!({ "name": "Ada", "grade": "abc" })));
        assert_eq!(student.name, "Ada");
        assert_eq!(student.grade, 0.0);
    }

    #[test]
    fn capitalized_keys_win_over_lowercase() {
        let student = normalize_record(&record(json!({
            "Name": "Upper",
            "name": "lower",
            "Grade": "91",
            "grade": 12
        })));
        assert_eq!(student.name, "Upper");
        assert_eq!(student.grade, 91.0);
    }

    #[test]
    fn empty_capitalized_value_falls_through() {
        let student = normalize_record(&record(json!({
            "Name": "",
            "name": "Fallback",
            "Grade": 0,
            "grade": "64.5"
        })));
        assert_eq!(student.name, "Fallback");
        assert_eq!(student.grade, 64.5);
    }

    #[test]
    fn numeric_names_render_as_text() {
        let student = normalize_record(&record(json!({ "Name": 1042, "Grade": 50 })));
        assert_eq!(student.name, "1042");
    }

    #[test]
    fn leading_float_prefix_is_used() {
        assert_eq!(parse_leading_float("85%"), Some(85.0));
        assert_eq!(parse_leading_float("  72.5 points"), Some(72.5));
        assert_eq!(parse_leading_float("-3"), Some(-3.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("1e2x"), Some(100.0));
        assert_eq!(parse_leading_float("4e"), Some(4.0));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn batching_preserves_order_and_values() {
        let records: Vec<RawRecord> = (0..25)
            .map(|i| record(json!({ "Name": format!("s{i}"), "Grade": i })))
            .collect();

        let whole = normalize_rows_batched(&records, records.len());
        let sliced = normalize_rows_batched(&records, 4);
        let zero = normalize_rows_batched(&records, 0);

        assert_eq!(whole, sliced);
        assert_eq!(whole, zero);
        assert_eq!(sliced[7].name, "s7");
        assert_eq!(sliced[24].grade, 24.0);
    }
}
