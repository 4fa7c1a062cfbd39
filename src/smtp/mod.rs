//! SMTP mailbox prober (C7, spec §4.9).

pub mod dialog;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::Caches;
use crate::ratelimit::{RateLimiter, Scope};
use crate::result::{Existence, SmtpCheck};

const PORTS: [u16; 2] = [25, 587];
const ATTEMPTS_PER_HOST_PORT: u32 = 3; // 1 attempt + up to 2 retries, per spec §4.9 step 3

pub struct SmtpProber {
    caches: Arc<Caches>,
    rate_limiter: RateLimiter,
    probe_sender: String,
    helo_domain: String,
}

impl SmtpProber {
    pub fn new(caches: Arc<Caches>, rate_limiter: RateLimiter) -> Self {
        Self {
            caches,
            rate_limiter,
            probe_sender: "probe@mailscore.invalid".to_string(),
            helo_domain: "mailscore.invalid".to_string(),
        }
    }

    /// Verifies mailbox existence for `email` against `mx_hosts` (already
    /// ordered by MX preference; only the first three are tried).
    pub async fn check(&self, email: &str, domain: &str, mx_hosts: &[String], timeout: Duration) -> SmtpCheck {
        let key = email.to_lowercase();
        if let Some(cached) = self.caches.smtp.get(&key) {
            return cached;
        }

        let limit = self.rate_limiter.check(Scope::SmtpDomain, domain);
        if !limit.allowed {
            return SmtpCheck {
                exists: Existence::Unknown,
                catch_all: false,
                greylisted: false,
                message: "Rate limited for this domain".into(),
            };
        }

        let deadline = Instant::now() + timeout;

        for host in mx_hosts.iter().take(3) {
            for port in PORTS {
                for _attempt in 0..ATTEMPTS_PER_HOST_PORT {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return self.unreachable_result();
                    }

                    let outcome = tokio::time::timeout(remaining, dialog::run(host, port, &self.helo_domain, &self.probe_sender, &key)).await;

                    let Ok(Ok(outcome)) = outcome else {
                        continue;
                    };

                    let check = interpret(outcome.random_code, outcome.real_code);
                    if is_definitive(&check) {
                        self.caches.smtp.set(key, check.clone());
                        return check;
                    }
                }
            }
        }

        self.unreachable_result()
    }

    fn unreachable_result(&self) -> SmtpCheck {
        SmtpCheck {
            exists: Existence::Unknown,
            catch_all: false,
            greylisted: false,
            message: "Could not reach any MX host for this domain".into(),
        }
    }
}

fn interpret(random_code: u16, real_code: u16) -> SmtpCheck {
    let random_positive = matches!(random_code, 250 | 251);
    match real_code {
        250 | 251 if random_positive => SmtpCheck {
            exists: Existence::Unknown,
            catch_all: true,
            greylisted: false,
            message: "Server accepts all recipients for this domain (catch-all)".into(),
        },
        250 | 251 => SmtpCheck {
            exists: Existence::True,
            catch_all: false,
            greylisted: false,
            message: "Mailbox exists".into(),
        },
        550 | 551 | 553 | 554 => SmtpCheck {
            exists: Existence::False,
            catch_all: false,
            greylisted: false,
            message: "Mailbox does not exist".into(),
        },
        450 | 451 | 452 => SmtpCheck {
            exists: Existence::Unknown,
            catch_all: false,
            greylisted: true,
            message: "Greylisted by the remote server".into(),
        },
        252 => SmtpCheck {
            exists: Existence::Unknown,
            catch_all: false,
            greylisted: false,
            message: "Server accepts the recipient but will not verify".into(),
        },
        other => SmtpCheck {
            exists: Existence::Unknown,
            catch_all: false,
            greylisted: false,
            message: format!("Unclassified SMTP response ({other})"),
        },
    }
}

/// Spec §4.9 step 6: cache only a definitive answer, or one explicitly
/// marked catch-all/greylisted.
fn is_definitive(check: &SmtpCheck) -> bool {
    !matches!(check.exists, Existence::Unknown) || check.catch_all || check.greylisted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_code_is_definitive_exists() {
        let check = interpret(550, 250);
        assert_eq!(check.exists, Existence::True);
        assert!(!check.catch_all);
        assert!(is_definitive(&check));
    }

    #[test]
    fn positive_random_marks_catch_all() {
        let check = interpret(250, 250);
        assert_eq!(check.exists, Existence::Unknown);
        assert!(check.catch_all);
        assert!(is_definitive(&check));
    }

    #[test]
    fn mailbox_unavailable_codes_are_definitive_absence() {
        for code in [550u16, 551, 553, 554] {
            let check = interpret(550, code);
            assert_eq!(check.exists, Existence::False);
            assert!(is_definitive(&check));
        }
    }

    #[test]
    fn greylist_codes_are_cacheable_but_unknown() {
        for code in [450u16, 451, 452] {
            let check = interpret(550, code);
            assert_eq!(check.exists, Existence::Unknown);
            assert!(check.greylisted);
            assert!(is_definitive(&check));
        }
    }

    #[test]
    fn code_252_is_unknown_and_not_definitive() {
        let check = interpret(550, 252);
        assert_eq!(check.exists, Existence::Unknown);
        assert!(!is_definitive(&check));
    }

    #[test]
    fn other_codes_are_unknown_and_not_definitive() {
        let check = interpret(550, 421);
        assert_eq!(check.exists, Existence::Unknown);
        assert!(!is_definitive(&check));
    }
}
