//! DMARC record parsing (spec §4.10), grounded on `kumo-dmarc::types::Policy`
//! for the `none`/`quarantine`/`reject` vocabulary, using a plain
//! `key=value` tag split since the full record grammar (RFC 7489 §6.4)
//! has more tags than spec §4.10 needs.

use crate::result::{AuthStrength, DmarcResult};

fn tags(txt: &str) -> impl Iterator<Item = (&str, &str)> {
    txt.split(';').filter_map(|part| {
        let part = part.trim();
        let (k, v) = part.split_once('=')?;
        Some((k.trim(), v.trim()))
    })
}

pub fn parse(txt: &str) -> Option<DmarcResult> {
    if !txt.starts_with("v=DMARC1") {
        return None;
    }

    let mut policy = None;
    let mut subdomain_policy = None;
    let mut percentage = None;
    let mut aggregate_reports = Vec::new();
    let mut forensic_reports = Vec::new();

    for (key, value) in tags(txt) {
        match key {
            "p" => policy = Some(value.to_string()),
            "sp" => subdomain_policy = Some(value.to_string()),
            "pct" => percentage = value.parse::<u8>().ok(),
            "rua" => aggregate_reports = split_uri_list(value),
            "ruf" => forensic_reports = split_uri_list(value),
            _ => {}
        }
    }

    let has_reports = !aggregate_reports.is_empty() || !forensic_reports.is_empty();
    let strength = match policy.as_deref() {
        Some("reject") => AuthStrength::Strong,
        Some("quarantine") => AuthStrength::Moderate,
        Some("none") if has_reports => AuthStrength::Weak,
        Some("none") => AuthStrength::None,
        _ => AuthStrength::None,
    };

    Some(DmarcResult {
        present: true,
        strength,
        policy,
        subdomain_policy,
        percentage,
        aggregate_reports,
        forensic_reports,
    })
}

pub fn absent() -> DmarcResult {
    DmarcResult {
        present: false,
        strength: AuthStrength::None,
        policy: None,
        subdomain_policy: None,
        percentage: None,
        aggregate_reports: vec![],
        forensic_reports: vec![],
    }
}

fn split_uri_list(value: &str) -> Vec<String> {
    value.split(',').map(|uri| uri.trim().to_string()).filter(|uri| !uri.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k9::assert_equal;

    #[test]
    fn reject_policy_is_strong() {
        let r = parse("v=DMARC1; p=reject; rua=mailto:dmarc@example.com").unwrap();
        assert_equal!(
            r,
            DmarcResult {
                present: true,
                strength: AuthStrength::Strong,
                policy: Some("reject".to_string()),
                subdomain_policy: None,
                percentage: None,
                aggregate_reports: vec!["mailto:dmarc@example.com".to_string()],
                forensic_reports: vec![],
            }
        );
    }

    #[test]
    fn quarantine_is_moderate() {
        let r = parse("v=DMARC1; p=quarantine").unwrap();
        assert_eq!(r.strength, AuthStrength::Moderate);
    }

    #[test]
    fn none_with_reports_is_weak() {
        let r = parse("v=DMARC1; p=none; rua=mailto:a@b.com").unwrap();
        assert_eq!(r.strength, AuthStrength::Weak);
    }

    #[test]
    fn none_without_reports_has_no_strength() {
        let r = parse("v=DMARC1; p=none").unwrap();
        assert_eq!(r.strength, AuthStrength::None);
    }

    #[test]
    fn extracts_pct_and_subdomain_policy() {
        let r = parse("v=DMARC1; p=reject; sp=quarantine; pct=50").unwrap();
        assert_eq!(r.subdomain_policy.as_deref(), Some("quarantine"));
        assert_eq!(r.percentage, Some(50));
    }
}
