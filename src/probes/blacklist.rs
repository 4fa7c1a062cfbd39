//! Blacklist/DNSBL probe consulted directly by the orchestrator (spec §4.2
//! component list, cached in C4's 1000-entry/30-min `blacklist` cache).
//! Same zone set and lookup shape as [`crate::reputation::dnsbl`], kept as
//! a separate probe because it feeds the base score/verdict rather than
//! the reputation sub-score.

use futures::future::join_all;
use std::time::Duration;

use crate::dns::{RecordType, Resolver};
use crate::result::BlacklistCheck;
use crate::static_data::dnsbl::ZONES;

pub async fn check(resolver: &dyn Resolver, domain: &str, timeout: Duration) -> BlacklistCheck {
    let lookups = ZONES.iter().map(|(zone, label)| async move {
        let query = format!("{domain}.{zone}");
        match resolver.query(&query, RecordType::A, timeout).await {
            Ok(answer) if answer.success && !answer.records.is_empty() => Some((*label).to_string()),
            _ => None,
        }
    });

    let lists: Vec<String> = join_all(lookups).await.into_iter().flatten().collect();
    let is_blacklisted = !lists.is_empty();
    let message = if is_blacklisted {
        format!("Domain found on {} blocklist(s)", lists.len())
    } else {
        "Domain not found on any blocklist".into()
    };

    BlacklistCheck {
        is_blacklisted,
        lists,
        skipped: false,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::test_client::TestDnsClient;

    #[tokio::test]
    async fn flags_domain_listed_on_a_zone() {
        let dns = TestDnsClient::new().with_a("bad.example.zen.spamhaus.org", "127.0.0.2");
        let result = check(&dns, "bad.example", Duration::from_secs(1)).await;
        assert!(result.is_blacklisted);
        assert_eq!(result.lists, vec!["Spamhaus DBL".to_string()]);
    }

    #[tokio::test]
    async fn clean_domain_is_not_blacklisted() {
        let dns = TestDnsClient::new();
        let result = check(&dns, "clean.example", Duration::from_secs(1)).await;
        assert!(!result.is_blacklisted);
        assert!(result.lists.is_empty());
    }
}
