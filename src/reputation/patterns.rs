//! Domain-shape heuristics feeding the reputation score (spec §4.11):
//! a long leading label, excessive hyphens, or excessive digits are each
//! weak signals of an auto-generated or throwaway domain.

pub fn leading_label(domain: &str) -> &str {
    domain.split('.').next().unwrap_or(domain)
}

pub fn has_long_leading_label(domain: &str) -> bool {
    leading_label(domain).len() > 25
}

pub fn has_excessive_hyphens(domain: &str) -> bool {
    leading_label(domain).matches('-').count() >= 3
}

pub fn has_excessive_digits(domain: &str) -> bool {
    leading_label(domain).chars().filter(char::is_ascii_digit).count() >= 5
}

/// Human-readable flags for whichever heuristics fired, surfaced on
/// [`crate::result::ReputationCheck::pattern_flags`].
pub fn flags(domain: &str) -> Vec<String> {
    let mut flags = vec![];
    if has_long_leading_label(domain) {
        flags.push("Unusually long domain label".to_string());
    }
    if has_excessive_hyphens(domain) {
        flags.push("Excessive hyphens in domain".to_string());
    }
    if has_excessive_digits(domain) {
        flags.push("Excessive digits in domain".to_string());
    }
    flags
}
