//! Tolerant JSON extraction from model completions.
//!
//! Completions are not contractually JSON-only: models wrap objects in code
//! fences, prepend prose, or return no JSON at all. This module locates the
//! most plausible JSON object inside a completion and exposes best-effort
//! field access with caller-supplied defaults. It never fails: a completion
//! that cannot be parsed degrades to defaults, and a truncated snippet of
//! the raw text is retained for diagnostics.

use serde_json::{Map, Value};

/// Maximum number of characters of raw completion text kept when a
/// completion cannot be parsed.
const RAW_SNIPPET_LIMIT: usize = 500;

/// Strips a leading ```json or ``` fence marker and a trailing ``` marker.
/// Unterminated fences lose only their opening marker.
fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Slices the most plausible JSON object out of a completion.
///
/// After fence stripping, the candidate is the span from the first `{` to
/// the last `}` when both exist in that order; otherwise the whole remaining
/// text. Surrounding prose ("Sure! Here's the data: {...} Hope that helps.")
/// is discarded by the slice.
pub fn locate_json_candidate(raw: &str) -> &str {
    let text = strip_code_fences(raw);
    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if last > first => &text[first..=last],
        _ => text,
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Best-effort view of the JSON object embedded in one completion.
///
/// Field accessors return the caller's default (empty list, `None`) when the
/// completion is degraded or the field is missing or has the wrong shape.
#[derive(Debug, Clone)]
pub struct Extraction {
    object: Option<Map<String, Value>>,
    snippet: Option<String>,
}

impl Extraction {
    pub fn from_completion(raw: &str) -> Self {
        let candidate = locate_json_candidate(raw);
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(object)) => Self {
                object: Some(object),
                snippet: None,
            },
            _ => Self {
                object: None,
                snippet: Some(truncate_chars(strip_code_fences(raw), RAW_SNIPPET_LIMIT)),
            },
        }
    }

    /// True when no JSON object could be recovered from the completion.
    pub fn is_degraded(&self) -> bool {
        self.object.is_none()
    }

    /// Truncated raw completion text, present only on the degraded path.
    pub fn raw_snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.object.as_ref()?.get(name)
    }

    /// String items of an array field. Non-string items are skipped; a
    /// missing or non-array field yields an empty list.
    pub fn string_list(&self, name: &str) -> Vec<String> {
        self.field(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A string field, if present. Numbers are rendered as strings since
    /// models frequently answer `"years_experience": 5`.
    pub fn optional_string(&self, name: &str) -> Option<String> {
        match self.field(name)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}
