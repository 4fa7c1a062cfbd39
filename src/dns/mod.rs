//! DNS client with provider fallback (C2, spec §4.4), wrapped by the
//! circuit breaker (C3, spec §4.5). Queries DNS-over-HTTPS JSON endpoints
//! directly via `reqwest` rather than a stub resolver, per spec §8's
//! external-interface contract (`GET /resolve?name=&type=` with
//! `Accept: application/dns-json`).
//!
//! Grounded on `dns-resolver::Resolver`/`TestResolver` for the
//! trait-plus-test-double shape, adapted to DoH JSON instead of a full
//! recursive resolver since that's the wire protocol spec §8 names.

pub mod test_client;

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::circuit::CircuitBreaker;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Mx,
    Txt,
}

impl RecordType {
    fn as_query_param(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
        }
    }
}

/// One resolved record. For MX records `data` is the hostname with the
/// trailing dot already stripped; for A/TXT it's the raw answer data.
///
/// `success` means "some provider returned a well-formed, definitive
/// answer" — that includes NXDOMAIN (empty `records`), which is a valid
/// negative answer, not a failure. It is `false` only when every provider
/// failed at the transport level (timeout, non-2xx, malformed body, or an
/// unrecognised DNS status). Only that case should ever count against the
/// circuit breaker (spec §4.4/§4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub success: bool,
    pub records: Vec<String>,
}

impl DnsAnswer {
    /// Every provider failed at the transport level; this is the one
    /// shape the circuit breaker's `is_failure` predicate should flag.
    fn empty_failure() -> Self {
        Self {
            success: false,
            records: vec![],
        }
    }
}

#[async_trait]
pub trait Resolver: Send + Sync {
    async fn query(&self, domain: &str, record_type: RecordType, timeout: Duration) -> Result<DnsAnswer, Error>;
}

/// DNS response code for NXDOMAIN. A well-formed answer with this status
/// is a definitive negative, not grounds to try the next provider.
const NXDOMAIN: i32 = 3;

#[derive(Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: i32,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohRecord>,
}

#[derive(Deserialize)]
struct DohRecord {
    data: String,
}

/// Parses an MX answer's `data` field, shaped `"<priority> <host>."`
/// (spec §4.4/§8), returning the hostname with the trailing dot stripped.
pub(crate) fn parse_mx_host(data: &str) -> Option<String> {
    let host = data.split_whitespace().nth(1)?;
    Some(host.trim_end_matches('.').to_string())
}

pub struct DnsClient {
    http: reqwest::Client,
    providers: Vec<&'static str>,
    breaker: Arc<CircuitBreaker>,
}

impl DnsClient {
    pub fn new(breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            http: reqwest::Client::new(),
            providers: vec!["dns.google", "cloudflare-dns.com"],
            breaker,
        }
    }

    async fn query_provider(
        &self,
        provider: &str,
        domain: &str,
        record_type: RecordType,
        timeout: Duration,
    ) -> Option<DnsAnswer> {
        let url = format!(
            "https://{provider}/resolve?name={}&type={}",
            urlencoding_lite(domain),
            record_type.as_query_param()
        );

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/dns-json")
            .timeout(timeout)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let body: DohResponse = response.json().await.ok()?;
        // Status 0 (success) and 3 (NXDOMAIN) are both well-formed answers;
        // anything else (SERVFAIL, REFUSED, ...) is a provider-level
        // problem, so fall through to the next provider instead.
        if body.status != 0 && body.status != NXDOMAIN {
            return None;
        }

        let records = match record_type {
            RecordType::Mx => body.answer.iter().filter_map(|r| parse_mx_host(&r.data)).collect(),
            _ => body.answer.iter().map(|r| r.data.clone()).collect(),
        };

        Some(DnsAnswer {
            success: true,
            records,
        })
    }
}

/// Minimal percent-encoding for the `name` query parameter; domains only
/// ever contain ASCII label characters and dots, which are already
/// URL-safe, so this only needs to guard against stray whitespace.
fn urlencoding_lite(domain: &str) -> String {
    domain.replace(' ', "%20")
}

#[async_trait]
impl Resolver for DnsClient {
    async fn query(&self, domain: &str, record_type: RecordType, timeout: Duration) -> Result<DnsAnswer, Error> {
        let providers = self.providers.clone();
        let domain = domain.to_string();

        let result = self
            .breaker
            .call::<DnsAnswer, anyhow::Error, _>(
                |answer| !answer.success,
                || async move {
                    for provider in providers.iter().copied() {
                        if let Some(answer) = self.query_provider(provider, &domain, record_type, timeout).await {
                            return Ok(answer);
                        }
                    }
                    Ok(DnsAnswer::empty_failure())
                },
            )
            .await?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mx_host_and_strips_trailing_dot() {
        assert_eq!(parse_mx_host("10 mail.example.com."), Some("mail.example.com".to_string()));
        assert_eq!(parse_mx_host("malformed"), None);
    }
}
