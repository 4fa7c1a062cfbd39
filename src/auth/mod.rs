//! Authentication probe (C8, spec §4.10): SPF, DMARC and DKIM TXT lookups
//! run in parallel, then fused into a single 0-100 score.

pub mod dkim;
pub mod dmarc;
pub mod spf;

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::dns::{RecordType, Resolver};
use crate::result::{AuthCheck, AuthStrength, DkimResult};

pub struct AuthProber {
    resolver: Arc<dyn Resolver>,
}

impl AuthProber {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self { resolver }
    }

    pub async fn check(&self, domain: &str, timeout: Duration) -> AuthCheck {
        let spf_fut = self.lookup_spf(domain, timeout);
        let dmarc_fut = self.lookup_dmarc(domain, timeout);
        let dkim_fut = self.lookup_dkim(domain, timeout);

        let (spf_result, dmarc_result, dkim_result) = tokio::join!(spf_fut, dmarc_fut, dkim_fut);

        let score = strength_score(spf_result.strength).min(35)
            + strength_score(dmarc_result.strength).min(35)
            + dkim_score(&dkim_result);

        AuthCheck {
            spf: spf_result,
            dmarc: dmarc_result,
            dkim: dkim_result,
            score: score.min(100) as u8,
        }
    }

    async fn lookup_spf(&self, domain: &str, timeout: Duration) -> crate::result::SpfResult {
        match self.resolver.query(domain, RecordType::Txt, timeout).await {
            Ok(answer) if answer.success => answer
                .records
                .iter()
                .find_map(|txt| spf::parse(txt))
                .unwrap_or_else(spf::absent),
            _ => spf::absent(),
        }
    }

    async fn lookup_dmarc(&self, domain: &str, timeout: Duration) -> crate::result::DmarcResult {
        let name = format!("_dmarc.{domain}");
        match self.resolver.query(&name, RecordType::Txt, timeout).await {
            Ok(answer) if answer.success => answer
                .records
                .iter()
                .find_map(|txt| dmarc::parse(txt))
                .unwrap_or_else(dmarc::absent),
            _ => dmarc::absent(),
        }
    }

    async fn lookup_dkim(&self, domain: &str, timeout: Duration) -> DkimResult {
        let lookups = dkim::SELECTORS.iter().map(|selector| {
            let name = format!("{selector}._domainkey.{domain}");
            async move {
                let state = match self.resolver.query(&name, RecordType::Txt, timeout).await {
                    Ok(answer) if answer.success => dkim::classify(&answer.records),
                    _ => dkim::SelectorState::Absent,
                };
                (*selector, state)
            }
        });

        let outcomes = join_all(lookups).await;

        let mut found = vec![];
        let mut revoked = vec![];
        for (selector, state) in outcomes {
            match state {
                dkim::SelectorState::Found => found.push(selector.to_string()),
                dkim::SelectorState::Revoked => revoked.push(selector.to_string()),
                dkim::SelectorState::Absent => {}
            }
        }

        DkimResult {
            found_selectors: found,
            revoked_selectors: revoked,
        }
    }
}

fn strength_score(strength: AuthStrength) -> u32 {
    match strength {
        AuthStrength::Strong => 35,
        AuthStrength::Moderate => 25,
        AuthStrength::Weak => 10,
        AuthStrength::None => 0,
    }
}

/// 15 points per valid (found, non-revoked) selector, capped at 30.
fn dkim_score(dkim: &DkimResult) -> u32 {
    (dkim.found_selectors.len() as u32 * 15).min(30)
}
