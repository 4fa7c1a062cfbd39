//! Domain-format probe (C1c, spec §4.3).
//!
//! Format validation only, no I/O: `exists` is reported optimistically
//! (`true` whenever the format is valid) and is settled later by the MX
//! probe. Callers are expected to cache this under the domain-format cache
//! (2000 entries, 10 min TTL).

use super::syntax::domain_format_valid;
use crate::result::DomainCheck;

pub fn check(domain: &str) -> DomainCheck {
    let domain = domain.to_lowercase();
    if domain_format_valid(&domain) {
        DomainCheck {
            valid: true,
            exists: true,
            skipped: false,
            message: "Domain format is valid".into(),
        }
    } else {
        DomainCheck {
            valid: false,
            exists: false,
            skipped: false,
            message: "Domain format is invalid".into(),
        }
    }
}
