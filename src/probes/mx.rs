//! MX probe: settles the existence question the domain-format probe only
//! answers optimistically (spec §4.3/§4.4). Falls back to an A-record
//! lookup when the domain has no MX records of its own, recording the
//! synthetic `"[A record fallback]"` entry.

use crate::dns::{RecordType, Resolver};
use crate::result::MxCheck;
use std::time::Duration;

pub async fn check(resolver: &dyn Resolver, domain: &str, timeout: Duration) -> MxCheck {
    match resolver.query(domain, RecordType::Mx, timeout).await {
        Ok(answer) if answer.success && !answer.records.is_empty() => MxCheck {
            valid: true,
            records: answer.records,
            skipped: false,
            message: "MX records found".into(),
        },
        Ok(answer) if answer.success => fall_back_to_a_record(resolver, domain, timeout).await,
        Ok(_) => MxCheck {
            valid: false,
            records: vec![],
            skipped: false,
            message: "MX lookup failed for all providers".into(),
        },
        Err(err) => MxCheck {
            valid: false,
            records: vec![],
            skipped: false,
            message: format!("MX lookup error: {err}"),
        },
    }
}

async fn fall_back_to_a_record(resolver: &dyn Resolver, domain: &str, timeout: Duration) -> MxCheck {
    match resolver.query(domain, RecordType::A, timeout).await {
        Ok(answer) if answer.success && !answer.records.is_empty() => MxCheck {
            valid: true,
            records: vec!["[A record fallback]".to_string()],
            skipped: false,
            message: "No MX records; domain resolves via A record".into(),
        },
        _ => MxCheck {
            valid: false,
            records: vec![],
            skipped: false,
            message: "No MX or A records found".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::test_client::TestDnsClient;

    #[tokio::test]
    async fn mx_records_found() {
        let dns = TestDnsClient::new().with_mx("example.com", 10, "mail.example.com");
        let result = check(&dns, "example.com", Duration::from_secs(1)).await;
        assert!(result.valid);
        assert_eq!(result.records, vec!["mail.example.com".to_string()]);
    }

    #[tokio::test]
    async fn falls_back_to_a_record_when_no_mx() {
        let dns = TestDnsClient::new().with_a("example.com", "93.184.216.34");
        let result = check(&dns, "example.com", Duration::from_secs(1)).await;
        assert!(result.valid);
        assert_eq!(result.records, vec!["[A record fallback]".to_string()]);
    }

    #[tokio::test]
    async fn invalid_when_no_records_at_all() {
        let dns = TestDnsClient::new();
        let result = check(&dns, "ghost.example", Duration::from_secs(1)).await;
        assert!(!result.valid);
    }
}
