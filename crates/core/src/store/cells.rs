//! Typing of raw CSV cells.
//!
//! Reference tables are plain CSV, so every cell arrives as text. Cells are typed the way a
//! dataframe reader would type them: NA tokens become `null`, integers and floats become numbers,
//! `True`/`False` become booleans and everything else is kept verbatim as a string.

use crate::constants::NA_TOKENS;
use serde_json::Value;

pub(crate) fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();

    if NA_TOKENS.contains(&trimmed) {
        return Value::Null;
    }

    match trimmed {
        "True" | "TRUE" | "true" => return Value::Bool(true),
        "False" | "FALSE" | "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }

    if let Ok(float) = trimmed.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }

    Value::String(raw.to_string())
}

/// True when the cell holds no value.
pub(crate) fn is_blank(raw: &str) -> bool {
    NA_TOKENS.contains(&raw.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn na_tokens_become_null() {
        assert_eq!(parse_cell(""), Value::Null);
        assert_eq!(parse_cell("  "), Value::Null);
        assert_eq!(parse_cell("NaN"), Value::Null);
        assert_eq!(parse_cell("N/A"), Value::Null);
    }

    #[test]
    fn numbers_and_booleans_are_typed() {
        assert_eq!(parse_cell("12"), json!(12));
        assert_eq!(parse_cell("-1"), json!(-1));
        assert_eq!(parse_cell("4.5"), json!(4.5));
        assert_eq!(parse_cell("True"), json!(true));
        assert_eq!(parse_cell("false"), json!(false));
    }

    #[test]
    fn text_is_kept_verbatim() {
        assert_eq!(parse_cell("Drink fluids"), json!("Drink fluids"));
        assert_eq!(parse_cell(" padded "), json!(" padded "));
        assert_eq!(parse_cell("inf"), json!("inf"));
    }
}
