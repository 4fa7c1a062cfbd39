//! Bulk runner (C12, spec §4.14): pre-warms the domain/MX caches, then
//! drives ordered batches of addresses through the orchestrator under a
//! global wall-clock deadline.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use crate::config::BulkConfig;
use crate::error::Error;
use crate::orchestrator::{Orchestrator, ValidateOptions};
use crate::result::{
    BlacklistCheck, CheckResults, Deliverability, DisposableCheck, DomainCheck, FreeProviderCheck, MxCheck, RiskLevel,
    RoleCheck, SyntaxCheck, TypoCheck, ValidationResult,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct BulkMetadata {
    pub total: usize,
    pub completed: usize,
    pub timed_out: bool,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone)]
pub struct BulkResult {
    pub results: Vec<ValidationResult>,
    pub metadata: BulkMetadata,
}

/// Invoked with `(completed_count, total)` after every batch completes
/// (spec §4.14's optional progress callback).
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

pub struct BulkRunner {
    orchestrator: Arc<Orchestrator>,
    config: BulkConfig,
}

impl BulkRunner {
    pub fn new(orchestrator: Arc<Orchestrator>, config: BulkConfig) -> Self {
        Self { orchestrator, config }
    }

    pub async fn validate_bulk(
        &self,
        emails: &[String],
        options: ValidateOptions,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<BulkResult, Error> {
        if emails.len() > self.config.max_bulk_size {
            return Err(Error::InvalidBulkSize {
                max: self.config.max_bulk_size,
                got: emails.len(),
            });
        }

        let start = Instant::now();
        let deadline = start + self.config.max_timeout;
        let total = emails.len();

        self.prewarm(emails).await;

        let mut results: Vec<Option<ValidationResult>> = (0..total).map(|_| None).collect();
        let mut completed = 0;
        let mut timed_out = false;

        for (batch_idx, batch) in emails.chunks(self.config.batch_size).enumerate() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining < self.config.min_time_buffer {
                timed_out = true;
                break;
            }

            let batch_results = join_all(batch.iter().map(|email| {
                let orchestrator = self.orchestrator.clone();
                let email = email.clone();
                async move { orchestrator.validate(&email, options).await }
            }))
            .await;

            let offset = batch_idx * self.config.batch_size;
            for (i, result) in batch_results.into_iter().enumerate() {
                results[offset + i] = Some(result);
            }
            completed += batch.len();

            if let Some(callback) = progress {
                callback(completed, total);
            }

            let batch_end = offset + batch.len();
            if batch_end < total {
                tokio::time::sleep(self.config.batch_delay).await;
            }
        }

        let results = emails
            .iter()
            .zip(results)
            .map(|(email, slot)| slot.unwrap_or_else(|| timeout_placeholder(email)))
            .collect();

        Ok(BulkResult {
            results,
            metadata: BulkMetadata {
                total,
                completed,
                timed_out,
                processing_time_ms: start.elapsed().as_millis() as u64,
            },
        })
    }

    /// Primes the domain-format and MX caches for every unique domain in
    /// `emails`, in batches of `prewarm_batch_size` run concurrently, per
    /// spec §4.14. Per-domain failures are dropped on the floor; pre-warming
    /// is a cache hint, not a validation result.
    async fn prewarm(&self, emails: &[String]) {
        let mut domains = Vec::new();
        let mut seen = HashSet::new();
        for email in emails {
            if let Some(domain) = email.rsplit('@').next() {
                let domain = domain.to_lowercase();
                if !domain.is_empty() && seen.insert(domain.clone()) {
                    domains.push(domain);
                }
            }
        }

        for chunk in domains.chunks(self.config.prewarm_batch_size) {
            join_all(chunk.iter().map(|domain| self.orchestrator.prewarm_domain(domain))).await;
        }
    }
}

/// Placeholder substituted for an address whose batch never started before
/// the global deadline tripped (spec §4.14: "deliverability=unknown,
/// risk=high, message='Validation timed out'").
fn timeout_placeholder(email: &str) -> ValidationResult {
    let message = "Validation timed out".to_string();
    ValidationResult {
        email: email.to_string(),
        is_valid: false,
        score: 0,
        deliverability: Deliverability::Unknown,
        risk: RiskLevel::High,
        checks: CheckResults {
            syntax: SyntaxCheck {
                valid: false,
                message: message.clone(),
            },
            domain: DomainCheck {
                valid: false,
                exists: false,
                skipped: true,
                message: message.clone(),
            },
            mx: MxCheck {
                valid: false,
                records: vec![],
                skipped: true,
                message: message.clone(),
            },
            disposable: DisposableCheck::skipped(),
            role: RoleCheck::skipped(),
            free_provider: FreeProviderCheck::skipped(),
            typo: TypoCheck::skipped(),
            blacklist: BlacklistCheck {
                is_blacklisted: false,
                lists: vec![],
                skipped: true,
                message,
            },
            smtp: None,
            authentication: None,
            reputation: None,
            gravatar: None,
        },
        timestamp: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Caches;
    use crate::config::{CacheConfig, RateLimitConfig};
    use crate::dns::test_client::TestDnsClient;
    use crate::ratelimit::RateLimiter;

    fn runner(bulk_config: BulkConfig) -> BulkRunner {
        let dns = Arc::new(
            TestDnsClient::new()
                .with_mx("example.com", 10, "mail.example.com")
                .with_mx("other.example", 10, "mail.other.example"),
        );
        let caches = Arc::new(Caches::new(&CacheConfig::default()));
        let rate_limiter = RateLimiter::new(&RateLimitConfig::default());
        let orchestrator = Arc::new(Orchestrator::new(
            dns,
            caches,
            rate_limiter,
            reqwest::Client::new(),
            crate::config::ProbeTimeouts::default(),
        ));
        BulkRunner::new(orchestrator, bulk_config)
    }

    #[tokio::test]
    async fn validates_every_address_in_order() {
        let emails = vec!["a@example.com".to_string(), "b@other.example".to_string(), "not-an-email".to_string()];
        let runner = runner(BulkConfig {
            batch_size: 2,
            prewarm_batch_size: 2,
            ..BulkConfig::default()
        });
        let bulk = runner.validate_bulk(&emails, ValidateOptions::default(), None).await.unwrap();
        assert_eq!(bulk.results.len(), 3);
        assert_eq!(bulk.metadata.total, 3);
        assert_eq!(bulk.metadata.completed, 3);
        assert!(!bulk.metadata.timed_out);
        assert_eq!(bulk.results[0].email, "a@example.com");
        assert!(bulk.results[0].is_valid);
        assert!(!bulk.results[2].is_valid);
    }

    #[tokio::test]
    async fn rejects_oversized_bulk_requests() {
        let runner = runner(BulkConfig {
            max_bulk_size: 2,
            ..BulkConfig::default()
        });
        let emails = vec!["a@example.com".to_string(), "b@example.com".to_string(), "c@example.com".to_string()];
        let result = runner.validate_bulk(&emails, ValidateOptions::default(), None).await;
        assert!(matches!(result, Err(Error::InvalidBulkSize { max: 2, got: 3 })));
    }

    #[tokio::test]
    async fn deadline_already_elapsed_times_out_immediately() {
        let runner = runner(BulkConfig {
            max_timeout: Duration::from_millis(1),
            min_time_buffer: Duration::from_secs(5),
            ..BulkConfig::default()
        });
        let emails = vec!["a@example.com".to_string()];
        let bulk = runner.validate_bulk(&emails, ValidateOptions::default(), None).await.unwrap();
        assert!(bulk.metadata.timed_out);
        assert_eq!(bulk.results.len(), 1);
        assert_eq!(bulk.results[0].deliverability, Deliverability::Unknown);
    }

    #[tokio::test]
    async fn progress_callback_fires_per_batch() {
        let emails: Vec<String> = (0..5).map(|i| format!("user{i}@example.com")).collect();
        let runner = runner(BulkConfig {
            batch_size: 2,
            ..BulkConfig::default()
        });
        let calls = std::sync::Mutex::new(Vec::new());
        let callback = |completed: usize, total: usize| {
            calls.lock().unwrap().push((completed, total));
        };
        let bulk = runner.validate_bulk(&emails, ValidateOptions::default(), Some(&callback)).await.unwrap();
        assert_eq!(bulk.metadata.completed, 5);
        let recorded = calls.into_inner().unwrap();
        assert_eq!(recorded, vec![(2, 5), (4, 5), (5, 5)]);
    }
}
