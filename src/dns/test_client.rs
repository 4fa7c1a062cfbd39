//! In-memory [`Resolver`] double for probe/orchestrator tests, grounded on
//! `dns-resolver::TestResolver`'s builder pattern but keyed directly on
//! `(domain, RecordType)` pairs since there's no zone file to parse here.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::{DnsAnswer, RecordType, Resolver};
use crate::error::Error;

#[derive(Default)]
pub struct TestDnsClient {
    records: HashMap<(String, RecordType), Vec<String>>,
    nxdomain: std::collections::HashSet<(String, RecordType)>,
}

impl TestDnsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_a(mut self, domain: &str, ip: &str) -> Self {
        self.records
            .entry((domain.to_lowercase(), RecordType::A))
            .or_default()
            .push(ip.to_string());
        self
    }

    pub fn with_mx(mut self, domain: &str, priority: u16, host: &str) -> Self {
        self.records
            .entry((domain.to_lowercase(), RecordType::Mx))
            .or_default()
            .push(format!("{priority} {host}."));
        self
    }

    pub fn with_txt(mut self, domain: &str, value: &str) -> Self {
        self.records
            .entry((domain.to_lowercase(), RecordType::Txt))
            .or_default()
            .push(value.to_string());
        self
    }

    /// Marks a `(domain, type)` pair as an explicit negative answer, as
    /// opposed to simply being absent from the map (which would also
    /// resolve as empty/not-listed, but this makes intent explicit in tests).
    pub fn with_nxdomain(mut self, domain: &str, record_type: RecordType) -> Self {
        self.nxdomain.insert((domain.to_lowercase(), record_type));
        self
    }
}

#[async_trait]
impl Resolver for TestDnsClient {
    async fn query(&self, domain: &str, record_type: RecordType, _timeout: Duration) -> Result<DnsAnswer, Error> {
        let key = (domain.to_lowercase(), record_type);
        if self.nxdomain.contains(&key) {
            return Ok(DnsAnswer {
                success: true,
                records: vec![],
            });
        }
        match self.records.get(&key) {
            Some(records) => {
                let records = if record_type == RecordType::Mx {
                    records.iter().filter_map(|r| super::parse_mx_host(r)).collect()
                } else {
                    records.clone()
                };
                Ok(DnsAnswer { success: true, records })
            }
            None => Ok(DnsAnswer {
                success: true,
                records: vec![],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k9::assert_equal;

    #[tokio::test]
    async fn returns_configured_mx_records() {
        let client = TestDnsClient::new().with_mx("example.com", 10, "mail.example.com");
        let answer = client
            .query("example.com", RecordType::Mx, Duration::from_secs(1))
            .await
            .unwrap();
        assert_equal!(
            answer,
            DnsAnswer {
                success: true,
                records: vec!["mail.example.com".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn unknown_domain_resolves_empty() {
        let client = TestDnsClient::new();
        let answer = client
            .query("nowhere.invalid", RecordType::A, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(answer.success);
        assert!(answer.records.is_empty());
    }
}
