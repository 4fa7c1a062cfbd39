//! Process-level configuration knobs (spec §6).
//!
//! Grounded on `rfc5321::SmtpClientTimeouts`: a single, serde-serializable
//! struct per concern with a `Default` impl that reproduces the documented
//! defaults, so an embedder can load overrides from TOML/JSON without the
//! engine owning any global mutable state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn millis(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Capacity and TTL for one named cache (spec §4.6).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheSpec {
    pub capacity: usize,
    #[serde(with = "duration_secs")]
    pub ttl: Duration,
}

impl CacheSpec {
    const fn new(capacity: usize, ttl_secs: u64) -> Self {
        Self {
            capacity,
            ttl: Duration::from_secs(ttl_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheConfig {
    pub mx: CacheSpec,
    pub domain_format: CacheSpec,
    pub full_result: CacheSpec,
    pub catch_all: CacheSpec,
    pub blacklist: CacheSpec,
    pub smtp: CacheSpec,
    pub authentication: CacheSpec,
    pub reputation: CacheSpec,
    pub gravatar: CacheSpec,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mx: CacheSpec::new(2000, 300),
            domain_format: CacheSpec::new(2000, 600),
            full_result: CacheSpec::new(1000, 300),
            catch_all: CacheSpec::new(500, 3600),
            blacklist: CacheSpec::new(1000, 1800),
            smtp: CacheSpec::new(1000, 300),
            authentication: CacheSpec::new(500, 600),
            reputation: CacheSpec::new(500, 1800),
            gravatar: CacheSpec::new(500, 3600),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub success_threshold: u32,
    #[serde(with = "duration_millis")]
    pub reset_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 2,
            reset_timeout: millis(30_000),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub single_per_minute: u32,
    pub bulk_per_minute: u32,
    pub smtp_per_domain_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            single_per_minute: 100,
            bulk_per_minute: 10,
            smtp_per_domain_per_minute: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BulkConfig {
    pub max_bulk_size: usize,
    pub batch_size: usize,
    #[serde(with = "duration_millis")]
    pub batch_delay: Duration,
    #[serde(with = "duration_millis")]
    pub max_timeout: Duration,
    #[serde(with = "duration_millis")]
    pub min_time_buffer: Duration,
    pub prewarm_batch_size: usize,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            max_bulk_size: 1000,
            batch_size: 50,
            batch_delay: millis(50),
            max_timeout: millis(30_000),
            min_time_buffer: millis(5_000),
            prewarm_batch_size: 20,
        }
    }
}

/// Default per-probe timeouts, mirrored as [`crate::orchestrator::ValidateOptions`] defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbeTimeouts {
    #[serde(with = "duration_millis")]
    pub dns: Duration,
    #[serde(with = "duration_millis")]
    pub dnsbl: Duration,
    #[serde(with = "duration_millis")]
    pub smtp: Duration,
    #[serde(with = "duration_millis")]
    pub auth: Duration,
    #[serde(with = "duration_millis")]
    pub reputation: Duration,
    #[serde(with = "duration_millis")]
    pub gravatar: Duration,
    #[serde(with = "duration_millis")]
    pub rdap: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            dns: secs(5),
            dnsbl: secs(3),
            smtp: millis(10_000),
            auth: millis(10_000),
            reputation: millis(15_000),
            gravatar: millis(5_000),
            rdap: secs(5),
        }
    }
}

/// Top-level configuration object. Constructed once by the embedder and
/// shared via `Arc` with the orchestrator and bulk runner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    pub cache: CacheConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub rate_limit: RateLimitConfig,
    pub bulk: BulkConfig,
    pub timeouts: ProbeTimeouts,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.bulk.max_bulk_size, 1000);
        assert_eq!(cfg.bulk.batch_size, 50);
        assert_eq!(cfg.circuit_breaker.failure_threshold, 5);
        assert_eq!(cfg.circuit_breaker.success_threshold, 2);
        assert_eq!(cfg.rate_limit.single_per_minute, 100);
        assert_eq!(cfg.rate_limit.bulk_per_minute, 10);
        assert_eq!(cfg.cache.mx.capacity, 2000);
        assert_eq!(cfg.cache.full_result.ttl, Duration::from_secs(300));
    }
}
