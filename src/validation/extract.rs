//! Best-effort extraction of an embedded function call from free text.
//!
//! Heuristic only. Candidates are tried in a fixed marker order and the first
//! JSON object shaped like `{name, parameters}` or
//! `{function: {name, parameters}}` wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*\n(.*?)```").expect("valid regex"));
static PLAIN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```\s*\n(\{.*?)```").expect("valid regex"));

const CALL_MARKERS: [&str; 2] = ["function_call(", "tool_call("];

/// Find the first call-shaped JSON object in `text`.
///
/// Returns the inner `{name, parameters}` object (unwrapping a `function`
/// envelope), or `None` when nothing parses.
pub fn extract_function_call_from_text(text: &str) -> Option<Value> {
    candidates(text)
        .into_iter()
        .find_map(|candidate| parse_call(&candidate))
}

fn candidates(text: &str) -> Vec<String> {
    let mut found = Vec::new();

    if let Some(captures) = JSON_FENCE.captures(text) {
        found.push(captures[1].to_string());
    }

    if let Some(start) = text.find('{') {
        let at_boundary = text[..start]
            .chars()
            .next_back()
            .map(char::is_whitespace)
            .unwrap_or(true);
        if at_boundary {
            if let Some(object) = balanced_object(&text[start..]) {
                found.push(object.to_string());
            }
        }
    }

    if let Some(captures) = PLAIN_FENCE.captures(text) {
        found.push(captures[1].to_string());
    }

    for marker in CALL_MARKERS {
        if let Some(start) = text.find(marker) {
            let rest = &text[start + marker.len()..];
            let inner = match rest.trim_start().starts_with('{') {
                true => balanced_object(rest.trim_start()),
                false => rest.find(')').map(|end| &rest[..end]),
            };
            if let Some(inner) = inner {
                found.push(inner.to_string());
            }
        }
    }

    found
}

/// Slice of `text` (which starts with `{`) up to its matching `}`.
///
/// Braces inside JSON strings are ignored.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_call(candidate: &str) -> Option<Value> {
    let trimmed = candidate.trim().trim_matches('`').trim();
    let value: Value = serde_json::from_str(trimmed).ok()?;
    if is_call(&value) {
        return Some(value);
    }
    value.get("function").filter(|f| is_call(f)).cloned()
}

fn is_call(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.contains_key("name") && o.contains_key("parameters"))
}
