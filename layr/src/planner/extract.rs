//! JSON extraction and repair for raw model output
//!
//! Models return JSON buried in prose, wrapped in code fences, or with
//! small syntax defects. Extraction tries an ordered sequence of
//! locators and stops at the first candidate; repair is one bounded pass
//! of textual rewrites before the final parse attempt - never iterative.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

fn json_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap())
}

fn generic_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```\s*(.*?)\s*```").unwrap())
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*[}\]])").unwrap())
}

fn missing_comma_objects_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\}(\s*)\{").unwrap())
}

fn missing_comma_arrays_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\](\s*)\[").unwrap())
}

fn unquoted_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap())
}

/// Locate a JSON object candidate within raw model output
///
/// Tries, in order: a fenced block tagged `json`; any fenced block whose
/// trimmed content starts `{` and ends `}`; the first-`{`-to-last-`}`
/// span; the entire trimmed text if it parses as JSON outright. The
/// first locator that yields a candidate wins.
pub fn extract_json(text: &str) -> Option<String> {
    if let Some(caps) = json_fence_re().captures(text) {
        debug!("extract_json: found JSON in tagged code fence");
        return Some(caps[1].trim().to_string());
    }

    if let Some(caps) = generic_fence_re().captures(text) {
        let candidate = caps[1].trim();
        if candidate.starts_with('{') && candidate.ends_with('}') {
            debug!("extract_json: found JSON in generic code fence");
            return Some(candidate.to_string());
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && start < end
    {
        debug!("extract_json: found brace-delimited span");
        return Some(text[start..=end].to_string());
    }

    let trimmed = text.trim();
    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        debug!("extract_json: entire response is valid JSON");
        return Some(trimmed.to_string());
    }

    debug!("extract_json: no candidate found");
    None
}

/// Apply one bounded pass of textual repairs to JSON-ish text
///
/// Rewrites, in order: trailing commas before closing brackets/braces,
/// missing commas between adjacent closes/opens, unquoted object keys.
pub fn repair_json(text: &str) -> String {
    let repaired = trailing_comma_re().replace_all(text, "$1");
    let repaired = missing_comma_objects_re().replace_all(&repaired, "},${1}{");
    let repaired = missing_comma_arrays_re().replace_all(&repaired, "],${1}[");
    let repaired = unquoted_key_re().replace_all(&repaired, "${1}\"${2}\":");
    repaired.into_owned()
}

/// Parse candidate JSON, repairing once on failure
pub fn parse_json(text: &str) -> Result<serde_json::Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(first_error) => {
            debug!(error = %first_error, "parse_json: parse failed, attempting repair");
            let repaired = repair_json(text);
            serde_json::from_str(&repaired).inspect(|_| {
                debug!("parse_json: successfully repaired and parsed");
            })
        }
    }
}
