//! Validation orchestrator (C11, spec §4.13): fans out the probes, folds
//! the result through [`crate::scoring`], and owns the coalescer/caches
//! that make repeated validations of the same address cheap.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthProber;
use crate::cache::Caches;
use crate::coalesce::Coalescer;
use crate::config::ProbeTimeouts;
use crate::dns::Resolver;
use crate::error::Error;
use crate::gravatar;
use crate::probes::{blacklist, domain_format, lists, mx, syntax};
use crate::ratelimit::{RateLimiter, Scope};
use crate::reputation::ReputationProber;
use crate::result::{CheckResults, DomainCheck, MxCheck, SyntaxCheck, TypoCheck, ValidationResult};
use crate::scoring::{self, ScoreInputs};
use crate::smtp::SmtpProber;

/// Per-call knobs for the optional probes (spec §4.13). Every field has the
/// documented default, so an embedder only sets what it wants to turn on.
#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    pub smtp_check: bool,
    pub smtp_timeout: Duration,
    pub auth_check: bool,
    pub auth_timeout: Duration,
    pub reputation_check: bool,
    pub reputation_timeout: Duration,
    pub gravatar_check: bool,
    pub gravatar_timeout: Duration,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            smtp_check: false,
            smtp_timeout: Duration::from_millis(10_000),
            auth_check: false,
            auth_timeout: Duration::from_millis(10_000),
            reputation_check: false,
            reputation_timeout: Duration::from_millis(15_000),
            gravatar_check: false,
            gravatar_timeout: Duration::from_millis(5_000),
        }
    }
}

impl ValidateOptions {
    /// Cache-key suffix reflecting which optional probes are enabled, per
    /// spec §4.13 step 1's `<lowered email>[':smtp'][':auth'][':rep'][':grav']`.
    fn cache_suffix(&self) -> String {
        let mut suffix = String::new();
        if self.smtp_check {
            suffix.push_str(":smtp");
        }
        if self.auth_check {
            suffix.push_str(":auth");
        }
        if self.reputation_check {
            suffix.push_str(":rep");
        }
        if self.gravatar_check {
            suffix.push_str(":grav");
        }
        suffix
    }

    fn any_optional_enabled(&self) -> bool {
        self.smtp_check || self.auth_check || self.reputation_check || self.gravatar_check
    }
}

pub struct Orchestrator {
    resolver: Arc<dyn Resolver>,
    caches: Arc<Caches>,
    coalescer: Coalescer<ValidationResult>,
    rate_limiter: RateLimiter,
    smtp: SmtpProber,
    auth: AuthProber,
    reputation: ReputationProber,
    http: reqwest::Client,
}

impl Orchestrator {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        caches: Arc<Caches>,
        rate_limiter: RateLimiter,
        http: reqwest::Client,
        timeouts: ProbeTimeouts,
    ) -> Self {
        let smtp = SmtpProber::new(caches.clone(), rate_limiter.clone());
        let auth = AuthProber::new(resolver.clone());
        let reputation = ReputationProber::new(http.clone(), resolver.clone(), timeouts.dnsbl, timeouts.rdap);
        Self {
            resolver,
            caches,
            coalescer: Coalescer::new(),
            rate_limiter,
            smtp,
            auth,
            reputation,
            http,
        }
    }

    /// Rejects an over-budget call before it ever reaches the coalescer;
    /// single-validation throttling is identified by `client_id` (spec §4.8).
    pub fn check_rate_limit(&self, client_id: &str) -> Result<(), Error> {
        let result = self.rate_limiter.check(Scope::Single, client_id);
        if !result.allowed {
            return Err(Error::RateLimited {
                retry_after: Duration::from_secs(result.retry_after_seconds.unwrap_or(60)),
            });
        }
        Ok(())
    }

    /// Takes `self` behind an `Arc` because the coalesced computation must
    /// be `'static`: the same constraint that lets an attached caller detach
    /// early (spec §4.7) without taking the shared future's state with it.
    pub async fn validate(self: &Arc<Self>, email: &str, options: ValidateOptions) -> ValidationResult {
        let trimmed = email.trim().to_string();
        let normalized = trimmed.to_lowercase();
        let key = format!("{normalized}{}", options.cache_suffix());

        if !options.any_optional_enabled() {
            if let Some(cached) = self.caches.full_result.get(&key) {
                return cached.with_refreshed_timestamp();
            }
        }

        let owner = self.clone();
        let compute_key = key.clone();
        self.coalescer
            .run(key, move || async move { owner.compute(&trimmed, options, compute_key).await })
            .await
    }

    async fn compute(&self, email: &str, options: ValidateOptions, cache_key: String) -> ValidationResult {
        let parsed = syntax::check(email);
        if !parsed.check.valid {
            let result = invalid_result(email, parsed.check);
            self.caches.full_result.set(cache_key, result.clone());
            return result;
        }
        let local = parsed.local.clone();
        let domain = parsed.domain.clone();
        tracing::debug!(domain = %domain, "validating address");

        let domain_format_fut = self.domain_format_cached(&domain);
        let mx_fut = self.mx_cached(&domain);
        let blacklist_fut = self.blacklist_cached(&domain);

        let (domain_check, mx_check, blacklist_check) = tokio::join!(domain_format_fut, mx_fut, blacklist_fut);

        let disposable_check = lists::disposable(&domain);
        let role_check = lists::role(&local);
        let free_provider_check = lists::free_provider(&domain);
        let typo_check = lists::typo(&domain);
        let cached_catch_all = self.caches.catch_all.get(&domain).unwrap_or(false);

        let smtp_check = if options.smtp_check && mx_check.valid {
            Some(
                self.smtp
                    .check(&normalized_email(email), &domain, &mx_check.records, options.smtp_timeout)
                    .await,
            )
        } else {
            None
        };
        if let Some(ref smtp) = smtp_check {
            if smtp.catch_all {
                self.caches.catch_all.set(domain.clone(), true);
            }
        }

        let auth_check = if options.auth_check && domain_check.valid {
            Some(self.auth.check(&domain, options.auth_timeout).await)
        } else {
            None
        };

        let reputation_check = if options.reputation_check && domain_check.valid {
            Some(self.reputation.check(&domain, options.reputation_timeout).await)
        } else {
            None
        };

        let gravatar_check = if options.gravatar_check {
            Some(gravatar::check(&self.http, email, options.gravatar_timeout).await)
        } else {
            None
        };

        let outcome = scoring::compute(&ScoreInputs {
            syntax: &parsed.check,
            domain: &domain_check,
            mx: &mx_check,
            disposable: &disposable_check,
            role: &role_check,
            typo: &typo_check,
            blacklist: &blacklist_check,
            smtp: smtp_check.as_ref(),
            authentication: auth_check.as_ref(),
            reputation: reputation_check.as_ref(),
            catch_all_hint: cached_catch_all,
        });

        let result = ValidationResult {
            email: email.to_string(),
            is_valid: outcome.is_valid,
            score: outcome.score,
            deliverability: outcome.deliverability,
            risk: outcome.risk,
            checks: CheckResults {
                syntax: parsed.check,
                domain: domain_check,
                mx: mx_check,
                disposable: disposable_check,
                role: role_check,
                free_provider: free_provider_check,
                typo: typo_check,
                blacklist: blacklist_check,
                smtp: smtp_check,
                authentication: auth_check,
                reputation: reputation_check,
                gravatar: gravatar_check,
            },
            timestamp: chrono::Utc::now(),
        };

        self.caches.full_result.set(cache_key, result.clone());
        result
    }

    /// Primes the domain-format and MX caches for `domain`, ignoring
    /// whatever they find; used by the bulk runner's pre-warm pass (spec
    /// §4.14), which only wants later batches to hit a warm cache.
    pub async fn prewarm_domain(&self, domain: &str) {
        let _ = tokio::join!(self.domain_format_cached(domain), self.mx_cached(domain));
    }

    async fn domain_format_cached(&self, domain: &str) -> DomainCheck {
        if let Some(cached) = self.caches.domain_format.get(&domain.to_string()) {
            return cached;
        }
        let result = domain_format::check(domain);
        self.caches.domain_format.set(domain.to_string(), result.clone());
        result
    }

    async fn mx_cached(&self, domain: &str) -> MxCheck {
        if let Some(cached) = self.caches.mx.get(&domain.to_string()) {
            return cached;
        }
        let result = mx::check(self.resolver.as_ref(), domain, Duration::from_secs(5)).await;
        self.caches.mx.set(domain.to_string(), result.clone());
        result
    }

    async fn blacklist_cached(&self, domain: &str) -> crate::result::BlacklistCheck {
        if let Some(cached) = self.caches.blacklist.get(&domain.to_string()) {
            return cached;
        }
        let result = blacklist::check(self.resolver.as_ref(), domain, Duration::from_secs(3)).await;
        self.caches.blacklist.set(domain.to_string(), result.clone());
        result
    }
}

fn normalized_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Builds the fixed "invalid" shape required by spec §3's invariant: a
/// syntax failure zeroes the score, marks every other probe skipped, and
/// never touches the network.
fn invalid_result(email: &str, syntax: SyntaxCheck) -> ValidationResult {
    ValidationResult {
        email: email.to_string(),
        is_valid: false,
        score: 0,
        deliverability: crate::result::Deliverability::Undeliverable,
        risk: crate::result::RiskLevel::High,
        checks: CheckResults {
            syntax,
            domain: DomainCheck::skipped(),
            mx: MxCheck::skipped(),
            disposable: crate::result::DisposableCheck::skipped(),
            role: crate::result::RoleCheck::skipped(),
            free_provider: crate::result::FreeProviderCheck::skipped(),
            typo: TypoCheck::skipped(),
            blacklist: crate::result::BlacklistCheck::skipped(),
            smtp: None,
            authentication: None,
            reputation: None,
            gravatar: None,
        },
        timestamp: chrono::Utc::now(),
    }
}
