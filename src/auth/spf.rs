//! SPF record parsing (spec §4.10), grounded on `kumo-spf::record`'s
//! qualifier model (`+ - ~ ?`) but scoped to what spec §4.10 actually asks
//! for: finding the `all` mechanism's qualifier to classify strength,
//! not full directive evaluation against a sending IP.

use crate::result::{AuthStrength, SpfResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Qualifier {
    Pass,
    Fail,
    SoftFail,
    Neutral,
}

impl Qualifier {
    fn parse(prefix: &str) -> Self {
        match prefix {
            "-" => Qualifier::Fail,
            "~" => Qualifier::SoftFail,
            "?" => Qualifier::Neutral,
            _ => Qualifier::Pass,
        }
    }
}

/// Parses one TXT record; returns `None` if it isn't an SPF record at all
/// (doesn't start with `v=spf1`).
pub fn parse(txt: &str) -> Option<SpfResult> {
    if !txt.starts_with("v=spf1") {
        return None;
    }

    let all_qualifier = txt
        .split_whitespace()
        .skip(1)
        .find_map(|token| {
            let (qualifier_str, mechanism) = match token.chars().next() {
                Some(c @ ('+' | '-' | '~' | '?')) => (c.to_string(), &token[1..]),
                _ => (String::new(), token),
            };
            if mechanism == "all" {
                Some(Qualifier::parse(&qualifier_str))
            } else {
                None
            }
        });

    let strength = match all_qualifier {
        Some(Qualifier::Fail) => AuthStrength::Strong,
        Some(Qualifier::SoftFail) => AuthStrength::Moderate,
        Some(Qualifier::Neutral | Qualifier::Pass) | None => AuthStrength::Weak,
    };

    Some(SpfResult {
        present: true,
        strength,
        record: Some(txt.to_string()),
    })
}

pub fn absent() -> SpfResult {
    SpfResult {
        present: false,
        strength: AuthStrength::None,
        record: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k9::assert_equal;

    #[test]
    fn hard_fail_is_strong() {
        let r = parse("v=spf1 include:_spf.example.com -all").unwrap();
        assert_equal!(
            r,
            SpfResult {
                present: true,
                strength: AuthStrength::Strong,
                record: Some("v=spf1 include:_spf.example.com -all".to_string()),
            }
        );
    }

    #[test]
    fn soft_fail_is_moderate() {
        let r = parse("v=spf1 a mx ~all").unwrap();
        assert_eq!(r.strength, AuthStrength::Moderate);
    }

    #[test]
    fn neutral_and_pass_and_missing_all_are_weak() {
        assert_eq!(parse("v=spf1 a mx ?all").unwrap().strength, AuthStrength::Weak);
        assert_eq!(parse("v=spf1 a mx +all").unwrap().strength, AuthStrength::Weak);
        assert_eq!(parse("v=spf1 a mx").unwrap().strength, AuthStrength::Weak);
    }

    #[test]
    fn non_spf_txt_is_none() {
        assert!(parse("google-site-verification=abc123").is_none());
    }

    #[test]
    fn absent_record_has_none_strength() {
        let r = absent();
        assert!(!r.present);
        assert_eq!(r.strength, AuthStrength::None);
    }
}
