//! Input sanitisation and request-shape bounding (C13, spec §4.15).
//!
//! Applied before any caller-facing input reaches the orchestrator or the
//! bulk runner. Each rule below is independently unit-tested, per spec §8.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

const MAX_LEN: usize = 254;
const DEFAULT_ARRAY_CAP: usize = 1000;
const MIN_ARRAY_ENTRY_LEN: usize = 5;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static DANGEROUS_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(javascript|vbscript|data|file):").unwrap());
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)on\w+\s*=").unwrap());
static CSS_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)expression\(").unwrap());
static CONTROL_BYTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{0000}-\u{0008}\u{000B}\u{000C}\u{000E}-\u{001F}\u{007F}]").unwrap());

/// Treat a dynamically-typed value (e.g. from an untyped JSON payload) as a
/// string, per spec §4.15: "Non-strings become empty string."
pub fn value_to_input(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

/// Sanitise a single raw string per the scalar rules in spec §4.15.
pub fn sanitize(raw: &str) -> String {
    let no_control = CONTROL_BYTES.replace_all(raw, "");
    let no_tags = HTML_TAG.replace_all(&no_control, "");
    let no_scheme = DANGEROUS_SCHEME.replace_all(&no_tags, "");
    let no_handler = EVENT_HANDLER.replace_all(&no_scheme, "");
    let no_expr = CSS_EXPRESSION.replace_all(&no_handler, "");
    let normalized: String = no_expr.nfc().collect();

    let truncated: String = normalized.chars().take(MAX_LEN).collect();
    truncated.to_lowercase().trim().to_string()
}

/// Report produced by [`sanitize_array`].
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedArray {
    pub emails: Vec<String>,
    pub duplicates_removed: usize,
    pub invalid_removed: usize,
}

/// Sanitise a bulk list: scalar-sanitise each entry, drop entries lacking
/// `@` or shorter than 5 characters, deduplicate (stable, first-seen order),
/// and cap the result at `cap` entries (spec §4.15 array variant).
pub fn sanitize_array<I, S>(raw: I, cap: usize) -> SanitizedArray
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut emails = Vec::new();
    let mut duplicates_removed = 0;
    let mut invalid_removed = 0;

    for entry in raw {
        let cleaned = sanitize(entry.as_ref());
        if !cleaned.contains('@') || cleaned.len() < MIN_ARRAY_ENTRY_LEN {
            invalid_removed += 1;
            continue;
        }
        if !seen.insert(cleaned.clone()) {
            duplicates_removed += 1;
            continue;
        }
        emails.push(cleaned);
    }

    if emails.len() > cap {
        let dropped = emails.len() - cap;
        invalid_removed += dropped;
        emails.truncate(cap);
    }

    SanitizedArray {
        emails,
        duplicates_removed,
        invalid_removed,
    }
}

/// Default array cap used when the embedder doesn't override it (spec §4.15: "default 1000").
pub const fn default_array_cap() -> usize {
    DEFAULT_ARRAY_CAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_string_becomes_empty() {
        assert_eq!(value_to_input(&Value::Null), "");
        assert_eq!(value_to_input(&Value::Bool(true)), "");
        assert_eq!(value_to_input(&Value::from(42)), "");
    }

    #[test]
    fn strips_control_bytes_but_keeps_tab_lf_cr() {
        let input = "a\u{0000}b\u{001F}c\tD\nE\rF\u{007F}";
        assert_eq!(sanitize(input), "abc\td\ne\rf");
    }

    #[test]
    fn strips_html_tags() {
        assert_eq!(sanitize("<b>bob</b>@example.com"), "bob@example.com");
    }

    #[test]
    fn strips_dangerous_schemes_and_handlers() {
        assert_eq!(sanitize("javascript:alert(1)@x.com"), "alert(1)@x.com");
        assert_eq!(sanitize("onload=evil()@x.com"), "evil()@x.com");
        assert_eq!(sanitize("expression(evil)@x.com"), "evil)@x.com");
    }

    #[test]
    fn truncates_lowercases_trims() {
        let long = "A".repeat(300);
        let result = sanitize(&format!("  {long}@Example.COM  "));
        assert_eq!(result.len(), MAX_LEN);
        assert_eq!(result, result.to_lowercase());
    }

    #[test]
    fn array_dedup_and_invalid_removal() {
        let input = ["a@gmail.com", "a@gmail.com", "", "b@yahoo.com"];
        let result = sanitize_array(input, default_array_cap());
        assert_eq!(result.emails, vec!["a@gmail.com", "b@yahoo.com"]);
        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(result.invalid_removed, 1);
    }

    #[test]
    fn array_cap_enforced() {
        let input: Vec<String> = (0..10).map(|i| format!("user{i}@example.com")).collect();
        let result = sanitize_array(input, 5);
        assert_eq!(result.emails.len(), 5);
        assert_eq!(result.invalid_removed, 5);
    }
}
