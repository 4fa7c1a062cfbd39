//! mailscore-core - email deliverability validation engine.
//!
//! Lexical, DNS, SMTP and reputation probes fused into a single score and
//! verdict per address, plus a bulk runner for batched validation. The
//! engine never installs a global `tracing` subscriber and never owns any
//! process-wide mutable state beyond what an embedder hands it through
//! [`EngineConfig`].

#![warn(clippy::all, clippy::pedantic)]

pub mod auth;
pub mod bulk;
pub mod cache;
pub mod circuit;
pub mod coalesce;
pub mod config;
pub mod dns;
pub mod error;
pub mod gravatar;
pub mod orchestrator;
pub mod probes;
pub mod ratelimit;
pub mod reputation;
pub mod result;
pub mod sanitize;
pub mod scoring;
pub mod smtp;
pub mod static_data;
pub mod telemetry;

use std::sync::Arc;

use config::EngineConfig;
use dns::DnsClient;
use ratelimit::RateLimiter;

pub use bulk::{BulkMetadata, BulkResult, BulkRunner};
pub use error::Error;
pub use orchestrator::{Orchestrator, ValidateOptions};
pub use result::ValidationResult;

/// Wires together the DNS client, circuit breaker, caches and rate limiter
/// behind a ready-to-use [`Orchestrator`]/[`BulkRunner`] pair. This is the
/// entry point most embedders want; anything assembled by hand here can
/// also be constructed directly from the individual modules.
pub struct Engine {
    pub orchestrator: Arc<Orchestrator>,
    pub bulk: BulkRunner,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let breaker = Arc::new(circuit::CircuitBreaker::new("dns-providers", config.circuit_breaker));
        let resolver: Arc<dyn dns::Resolver> = Arc::new(DnsClient::new(breaker));
        let caches = Arc::new(cache::Caches::new(&config.cache));
        let rate_limiter = RateLimiter::new(&config.rate_limit);
        let http = reqwest::Client::new();

        let orchestrator = Arc::new(Orchestrator::new(resolver, caches, rate_limiter, http, config.timeouts));
        let bulk = BulkRunner::new(orchestrator.clone(), config.bulk);

        Self { orchestrator, bulk }
    }

    /// Validates a single address (spec §4.13); see [`Orchestrator::validate`].
    pub async fn validate(&self, email: &str, options: ValidateOptions) -> ValidationResult {
        self.orchestrator.validate(email, options).await
    }

    /// Validates a batch of addresses under a shared deadline (spec §4.14);
    /// see [`BulkRunner::validate_bulk`].
    pub async fn validate_bulk(
        &self,
        emails: &[String],
        options: ValidateOptions,
        progress: Option<bulk::ProgressCallback<'_>>,
    ) -> Result<BulkResult, Error> {
        self.bulk.validate_bulk(emails, options, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn engine_validates_a_malformed_address_without_any_network() {
        let engine = Engine::new(EngineConfig::default());
        let result = engine.validate("not-an-email", ValidateOptions::default()).await;
        assert!(!result.is_valid);
        assert_eq!(result.score, 0);
    }
}
