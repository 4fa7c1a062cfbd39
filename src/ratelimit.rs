//! Fixed-window rate limiter (C6, spec §4.8). Three independent scopes —
//! single-validation, bulk-validation, and per-domain SMTP — share one
//! sweeper but never share counters, since the SMTP limiter is keyed on
//! the remote domain rather than the caller (spec §9's Design Note: "keep
//! separate from the client-facing limiter... it protects upstream mail
//! servers, not the caller").

use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Single,
    Bulk,
    SmtpDomain,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: Instant,
    pub retry_after_seconds: Option<u64>,
}

struct Window {
    count: u32,
    reset_at: Instant,
}

struct Inner {
    windows: DashMap<(Scope, String), Window>,
    single_per_minute: u32,
    bulk_per_minute: u32,
    smtp_per_domain_per_minute: u32,
}

impl Inner {
    fn limit_for(&self, scope: Scope) -> u32 {
        match scope {
            Scope::Single => self.single_per_minute,
            Scope::Bulk => self.bulk_per_minute,
            Scope::SmtpDomain => self.smtp_per_domain_per_minute,
        }
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.windows.retain(|_, window| window.reset_at > now);
    }
}

/// Owns the counters; cloning is cheap (it's a thin `Arc` handle) so the
/// SMTP prober and the orchestrator can each hold one without fighting
/// over a shared reference.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let inner = Arc::new(Inner {
            windows: DashMap::new(),
            single_per_minute: config.single_per_minute,
            bulk_per_minute: config.bulk_per_minute,
            smtp_per_domain_per_minute: config.smtp_per_domain_per_minute,
        });
        spawn_sweeper(Arc::downgrade(&inner));
        Self { inner }
    }

    /// Checks and, if allowed, consumes one unit of `(scope, identifier)`'s
    /// budget for the current window.
    pub fn check(&self, scope: Scope, identifier: &str) -> RateLimitResult {
        let limit = self.inner.limit_for(scope);
        let now = Instant::now();
        let mut window = self
            .inner
            .windows
            .entry((scope, identifier.to_string()))
            .or_insert_with(|| Window {
                count: 0,
                reset_at: now + WINDOW,
            });

        if window.reset_at <= now {
            window.count = 0;
            window.reset_at = now + WINDOW;
        }

        if window.count >= limit {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at: window.reset_at,
                retry_after_seconds: Some((window.reset_at - now).as_secs().max(1)),
            };
        }

        window.count += 1;
        RateLimitResult {
            allowed: true,
            remaining: limit - window.count,
            reset_at: window.reset_at,
            retry_after_seconds: None,
        }
    }
}

/// Holds only a [`Weak`] reference, so the sweeper task never keeps the
/// limiter (or the runtime it's spawned on) alive past the last strong
/// reference dropping.
fn spawn_sweeper(inner: Weak<Inner>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            match inner.upgrade() {
                Some(inner) => inner.sweep(),
                None => break,
            }
        }
    });
}
