//! DNSBL blocklist checks (spec §4.11): an A answer for `<domain>.<zone>`
//! means the domain is listed on that zone.

use futures::future::join_all;
use std::time::Duration;

use crate::dns::{RecordType, Resolver};
use crate::static_data::dnsbl::ZONES;

pub async fn check(resolver: &dyn Resolver, domain: &str, timeout: Duration) -> Vec<String> {
    let lookups = ZONES.iter().map(|(zone, label)| async move {
        let query = format!("{domain}.{zone}");
        let listed = matches!(
            resolver.query(&query, RecordType::A, timeout).await,
            Ok(answer) if answer.success && !answer.records.is_empty()
        );
        listed.then(|| (*label).to_string())
    });

    join_all(lookups).await.into_iter().flatten().collect()
}
