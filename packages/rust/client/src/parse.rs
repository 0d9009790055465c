//! Extraction of structured JSON from free-form model responses.
//!
//! Models are asked to return bare JSON, but in practice responses arrive
//! wrapped in code fences or surrounded by prose. Extraction tries, in
//! order: direct parse, fence stripping, then the first JSON-looking span.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use coursegen_shared::{CourseGenError, Result};

/// First `{...}` or `[...]` span, greedy across newlines.
static JSON_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}|\[.*\]").expect("valid regex"));

/// Extract a JSON value from a model response.
pub fn extract_json(text: &str) -> Result<Value> {
    let trimmed = text.trim();

    // Direct parse first — the happy path for well-behaved responses.
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    // Strip markdown code fences and retry.
    let unfenced = strip_fences(trimmed);
    if let Ok(value) = serde_json::from_str::<Value>(unfenced.trim()) {
        return Ok(value);
    }

    // Last resort: first JSON-looking span anywhere in the text.
    if let Some(m) = JSON_SPAN.find(&unfenced) {
        if let Ok(value) = serde_json::from_str::<Value>(m.as_str()) {
            return Ok(value);
        }
    }

    let preview: String = trimmed.chars().take(200).collect();
    Err(CourseGenError::Generation(format!(
        "response is not valid JSON (got: {preview})"
    )))
}

/// Remove ```json / ``` fence markers, keeping the content between them.
fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let value = extract_json(r#"{"modules": []}"#).unwrap();
        assert!(value["modules"].as_array().unwrap().is_empty());
    }

    #[test]
    fn parses_fenced_json() {
        let text = "```json\n{\"quiz\": [\"q1\"]}\n```";
        let value = extract_json(text).unwrap();
        assert_eq!(value["quiz"][0], "q1");
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let text = "Here is the course outline you asked for:\n\n{\"modules\": [{\"title\": \"Intro\"}]}\n\nLet me know if you need changes.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["modules"][0]["title"], "Intro");
    }

    #[test]
    fn parses_top_level_array() {
        let value = extract_json("Insights:\n[\"a\", \"b\"]").unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn rejects_non_json() {
        let err = extract_json("I'm sorry, I can't help with that.").unwrap_err();
        assert!(matches!(err, CourseGenError::Generation(_)));
    }

    #[test]
    fn rejects_empty_response() {
        assert!(extract_json("").is_err());
        assert!(extract_json("   \n").is_err());
    }
}
