//! Domain reputation probe (C9, spec §4.11): age, blocklist and pattern
//! sub-probes run in parallel, then fold into one factor-based score.

pub mod dnsbl;
pub mod patterns;
pub mod rdap;

use std::sync::Arc;
use std::time::Duration;

use crate::dns::Resolver;
use crate::result::{ReputationCheck, ReputationRisk};
use crate::static_data::reputation_tlds::{HIGH_RISK_TLDS, PREMIUM_TLDS};

pub struct ReputationProber {
    http: reqwest::Client,
    resolver: Arc<dyn Resolver>,
    /// Fixed per spec §4.11, sourced from `config::ProbeTimeouts` at
    /// construction — independent of whatever overall `timeout` a caller
    /// passes to [`Self::check`].
    dnsbl_timeout: Duration,
    rdap_timeout: Duration,
}

impl ReputationProber {
    pub fn new(http: reqwest::Client, resolver: Arc<dyn Resolver>, dnsbl_timeout: Duration, rdap_timeout: Duration) -> Self {
        Self {
            http,
            resolver,
            dnsbl_timeout,
            rdap_timeout,
        }
    }

    /// `timeout` bounds the probe as a whole; the DNSBL and RDAP sub-calls
    /// always use their own fixed timeouts regardless of its value. If the
    /// overall deadline is hit before both sub-probes finish, the probe
    /// degrades to a neutral result rather than blocking past `timeout`.
    pub async fn check(&self, domain: &str, timeout: Duration) -> ReputationCheck {
        let age_fut = rdap::lookup(&self.http, domain, self.rdap_timeout);
        let dnsbl_fut = dnsbl::check(self.resolver.as_ref(), domain, self.dnsbl_timeout);

        let (age, blocklisted_on) = match tokio::time::timeout(timeout, async { tokio::join!(age_fut, dnsbl_fut) }).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(domain = %domain, "reputation probe exceeded its overall timeout");
                (rdap::unsupported(), vec![])
            }
        };
        let pattern_flags = patterns::flags(domain);

        let tld = domain.rsplit('.').next().unwrap_or(domain);
        let high_risk_tld = HIGH_RISK_TLDS.contains(&tld);
        let premium_tld = PREMIUM_TLDS.contains(&tld);

        let score = synthesize_score(age.age_in_days, blocklisted_on.len(), high_risk_tld, premium_tld, domain);
        let risk = risk_for(score);

        ReputationCheck {
            age,
            blocklisted_on,
            pattern_flags,
            high_risk_tld,
            premium_tld,
            score,
            risk,
        }
    }
}

fn synthesize_score(age_in_days: Option<i64>, blocklist_count: usize, high_risk_tld: bool, premium_tld: bool, domain: &str) -> u8 {
    let mut score: i32 = 70;

    if let Some(days) = age_in_days {
        score += if days < 7 {
            -40
        } else if days < 30 {
            -25
        } else if days < 180 {
            -10
        } else if days > 730 {
            20
        } else if days > 365 {
            10
        } else {
            0
        };
    }

    if blocklist_count > 0 {
        score -= 30 * blocklist_count as i32;
    } else {
        score += 15;
    }

    if high_risk_tld {
        score -= 15;
    }
    if premium_tld {
        score += 10;
    }

    if patterns::has_long_leading_label(domain) {
        score -= 5;
    }
    if patterns::has_excessive_hyphens(domain) {
        score -= 5;
    }
    if patterns::has_excessive_digits(domain) {
        score -= 5;
    }

    score.clamp(0, 100) as u8
}

fn risk_for(score: u8) -> ReputationRisk {
    if score >= 80 {
        ReputationRisk::Low
    } else if score >= 60 {
        ReputationRisk::Medium
    } else if score >= 40 {
        ReputationRisk::High
    } else {
        ReputationRisk::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_established_premium_domain_scores_high() {
        let score = synthesize_score(Some(1000), 0, false, true, "example.com");
        assert_eq!(score, 70 + 20 + 15 + 10);
        assert_eq!(risk_for(score), ReputationRisk::Low);
    }

    #[test]
    fn brand_new_blocklisted_domain_scores_critical() {
        let score = synthesize_score(Some(2), 2, true, false, "example.xyz");
        assert_eq!(risk_for(score), ReputationRisk::Critical);
    }

    #[test]
    fn score_never_exceeds_bounds() {
        let score = synthesize_score(Some(10_000), 0, false, true, "a.com");
        assert!(score <= 100);
        let score = synthesize_score(Some(1), 5, true, false, "aaaaaaaaaaaaaaaaaaaaaaaaaaa-b-c-d12345.xyz");
        assert_eq!(score, 0);
    }

    #[tokio::test]
    async fn check_uses_fixed_sub_timeouts_regardless_of_overall_timeout() {
        use crate::dns::test_client::TestDnsClient;

        let resolver: Arc<dyn Resolver> = Arc::new(TestDnsClient::new());
        let prober = ReputationProber::new(
            reqwest::Client::new(),
            resolver,
            Duration::from_secs(3),
            Duration::from_secs(5),
        );
        assert_eq!(prober.dnsbl_timeout, Duration::from_secs(3));
        assert_eq!(prober.rdap_timeout, Duration::from_secs(5));

        // example.zz has no RDAP server in the fixed table, so the age
        // sub-probe resolves without touching the network, and the DNSBL
        // lookups go through the in-memory test resolver; both finish well
        // inside a short overall timeout.
        let result = prober.check("example.zz", Duration::from_millis(50)).await;
        assert!(result.age.age_in_days.is_none());
        assert!(result.blocklisted_on.is_empty());
    }
}
