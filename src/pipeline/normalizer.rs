//! Turns raw model text into a JSON object.
//!
//! Hosted models wrap JSON in markdown fences or chatty prose even when told
//! not to. Cleanup is two-staged: strip fences and parse strictly, then fall
//! back to the slice between the first `{` and the last `}`. This assumes at
//! most one object in the text; it is not a general JSON extractor.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::ExtractedFields;
use crate::error::GatewayError;

static CODE_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*```(?:json)?|```\s*$").ok());

/// Parses raw model output into [`ExtractedFields`].
///
/// # Errors
///
/// Returns [`GatewayError::UnparseableExtraction`] when neither the cleaned
/// text nor its outermost brace slice is a JSON object.
pub fn normalize_response(raw: &str) -> Result<ExtractedFields, GatewayError> {
    let cleaned = strip_code_fences(raw);

    if let Some(map) = parse_object(&cleaned) {
        return Ok(ExtractedFields::from_map(map));
    }

    let slice = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => cleaned.get(start..=end),
        _ => None,
    }
    .ok_or_else(|| {
        GatewayError::UnparseableExtraction("no JSON object found in model response".to_string())
    })?;

    parse_object(slice).map(ExtractedFields::from_map).ok_or_else(|| {
        GatewayError::UnparseableExtraction(
            "model response contains braces but no valid JSON object".to_string(),
        )
    })
}

/// Removes a leading fence (optionally tagged `json`) and a trailing fence,
/// then trims whitespace.
fn strip_code_fences(raw: &str) -> String {
    match CODE_FENCE.as_ref() {
        Some(re) => re.replace_all(raw, "").trim().to_string(),
        None => raw.trim().to_string(),
    }
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_unwrapped() {
        let Ok(fields) = normalize_response("```json\n{\"event_name\":\"X\"}\n```") else {
            panic!("fenced JSON should parse");
        };
        assert_eq!(fields.event_name(), Some("X"));
        assert_eq!(fields.as_map().len(), 1);
    }

    #[test]
    fn untagged_and_uppercase_fences_are_unwrapped() {
        for raw in ["```\n{\"venue\":\"Dock\"}\n```", "```JSON {\"venue\":\"Dock\"}```"] {
            let Ok(fields) = normalize_response(raw) else {
                panic!("should parse: {raw}");
            };
            assert_eq!(fields.venue(), Some("Dock"));
        }
    }

    #[test]
    fn prose_around_object_uses_brace_slice() {
        let Ok(fields) = normalize_response("Sure! {\"event_name\":\"X\"} enjoy") else {
            panic!("brace slice should parse");
        };
        assert_eq!(fields.event_name(), Some("X"));
    }

    #[test]
    fn nested_objects_survive_brace_slice() {
        let raw = "Here you go: {\"event_name\":\"X\",\"extra\":{\"a\":1}} cheers";
        let Ok(fields) = normalize_response(raw) else {
            panic!("outermost braces should parse");
        };
        assert!(fields.as_map().contains_key("extra"));
    }

    #[test]
    fn text_without_braces_is_unparseable() {
        assert!(matches!(
            normalize_response("I could not read this flyer."),
            Err(GatewayError::UnparseableExtraction(_))
        ));
    }

    #[test]
    fn reversed_or_broken_braces_are_unparseable() {
        assert!(matches!(
            normalize_response("} nope {"),
            Err(GatewayError::UnparseableExtraction(_))
        ));
        assert!(matches!(
            normalize_response("{\"event_name\": }"),
            Err(GatewayError::UnparseableExtraction(_))
        ));
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(normalize_response("[1, 2, 3]").is_err());
    }

    #[test]
    fn missing_fields_are_not_an_error() {
        let Ok(fields) = normalize_response("{}") else {
            panic!("empty object is valid");
        };
        assert!(fields.as_map().is_empty());
        assert!(fields.vibe().is_empty());
    }
}
