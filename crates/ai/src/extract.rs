//! Defensive extraction of a structured payload from free-form prose.
//!
//! The generation service gives no structured-output guarantee; the
//! payload arrives informally embedded in text, sometimes inside a
//! markdown fence, sometimes surrounded by commentary. We take the first
//! balanced brace-delimited region, tracking string literals and escapes
//! so braces inside JSON strings do not end the region early.

use serde::de::DeserializeOwned;

use crate::llm::BridgeError;

/// Locate the first balanced `{...}` region in `text`.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract and decode the embedded payload, or fail with a `Parse` error.
pub fn decode_embedded<T: DeserializeOwned>(text: &str) -> Result<T, BridgeError> {
    let region = first_json_object(text).ok_or_else(|| {
        BridgeError::Parse("no brace-delimited region in response text".to_string())
    })?;
    serde_json::from_str(region).map_err(|error| BridgeError::Parse(error.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::llm::BridgeError;

    use super::{decode_embedded, first_json_object};

    #[test]
    fn finds_an_object_wrapped_in_prose_and_fences() {
        let text = "Sure! Here is the analysis:\n```json\n{\"score\": 4}\n```\nHope it helps.";
        assert_eq!(first_json_object(text), Some("{\"score\": 4}"));
    }

    #[test]
    fn balances_nested_objects() {
        let text = "prefix {\"outer\": {\"inner\": 1}} suffix {\"second\": 2}";
        assert_eq!(first_json_object(text), Some("{\"outer\": {\"inner\": 1}}"));
    }

    #[test]
    fn braces_inside_string_literals_do_not_close_the_region() {
        let text = r#"{"note": "a } inside", "ok": true}"#;
        assert_eq!(first_json_object(text), Some(text));
    }

    #[test]
    fn escaped_quotes_do_not_end_the_string() {
        let text = r#"{"note": "she said \"}\"", "ok": true}"#;
        assert_eq!(first_json_object(text), Some(text));
    }

    #[test]
    fn braceless_text_yields_none() {
        assert_eq!(first_json_object("no structured content here"), None);
    }

    #[test]
    fn unterminated_object_yields_none() {
        assert_eq!(first_json_object("{\"open\": true"), None);
    }

    #[test]
    fn decode_surfaces_parse_error_for_missing_payload() {
        let result: Result<HashMap<String, i64>, _> = decode_embedded("plain prose");
        assert!(matches!(result, Err(BridgeError::Parse(_))));
    }

    #[test]
    fn decode_surfaces_parse_error_for_mismatched_shape() {
        let result: Result<HashMap<String, i64>, _> = decode_embedded("{\"x\": \"not a number\"}");
        assert!(matches!(result, Err(BridgeError::Parse(_))));
    }
}
