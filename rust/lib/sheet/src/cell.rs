//! Cell values.
//!
//! A cell holds a JSON scalar: string, number or boolean. Blank cells are the
//! empty string, never `null`.

use serde_json::Value;

/// A single stored cell.
pub type Cell = Value;

/// Coerce an incoming JSON value into a storable cell.
///
/// `null` becomes `""`. Arrays and objects are stored as their compact JSON
/// text. Scalars pass through unchanged.
pub fn normalize_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        other => other.clone(),
    }
}

/// String form of a cell, used for id comparison.
///
/// Integral numbers render without a fractional part, so `1`, `1.0` and
/// `"1"` all compare equal.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", f as i64)
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_null_to_empty() {
        assert_eq!(normalize_cell(&Value::Null), json!(""));
    }

    #[test]
    fn normalize_keeps_scalars() {
        assert_eq!(normalize_cell(&json!(10)), json!(10));
        assert_eq!(normalize_cell(&json!(0)), json!(0));
        assert_eq!(normalize_cell(&json!(false)), json!(false));
        assert_eq!(normalize_cell(&json!("A1")), json!("A1"));
    }

    #[test]
    fn normalize_flattens_compound_values() {
        assert_eq!(normalize_cell(&json!([1, 2])), json!("[1,2]"));
        assert_eq!(normalize_cell(&json!({"a": 1})), json!("{\"a\":1}"));
    }

    #[test]
    fn string_form_of_numbers() {
        assert_eq!(cell_to_string(&json!(1)), "1");
        assert_eq!(cell_to_string(&json!(1.0)), "1");
        assert_eq!(cell_to_string(&json!(-3)), "-3");
        assert_eq!(cell_to_string(&json!(2.5)), "2.5");
    }

    #[test]
    fn string_form_of_other_scalars() {
        assert_eq!(cell_to_string(&json!("abc")), "abc");
        assert_eq!(cell_to_string(&json!(true)), "true");
        assert_eq!(cell_to_string(&Value::Null), "");
    }
}
