//! Disposable/temporary mailbox domains (spec §4.2).

use super::DatasetMeta;
use std::sync::LazyLock;

/// Exact-match disposable domains (case folded to lowercase at build time).
pub static DOMAINS: &[&str] = &[
    "mailinator.com",
    "guerrillamail.com",
    "guerrillamail.org",
    "guerrillamail.net",
    "10minutemail.com",
    "10minutemail.net",
    "tempmail.com",
    "temp-mail.org",
    "throwawaymail.com",
    "yopmail.com",
    "yopmail.fr",
    "trashmail.com",
    "getnada.com",
    "sharklasers.com",
    "dispostable.com",
    "fakeinbox.com",
    "mailnesia.com",
    "mintemail.com",
    "mohmal.com",
    "spamgourmet.com",
    "maildrop.cc",
    "moakt.cc",
    "emailondeck.com",
    "mailcatch.com",
];

/// Fallback glob-ish patterns matched against the whole domain, used after
/// the exact-match set misses (spec §4.2: "a fallback pattern set").
pub static PATTERNS: &[&str] = &[
    "temp*",
    "fake*",
    "throw*",
    "mailinator",
    "guerrilla",
    "minute.*mail",
    "trash*mail",
    "disposable*",
];

pub static META: LazyLock<DatasetMeta> = LazyLock::new(|| DatasetMeta {
    version: "2026.1",
    last_updated: "2026-01-15",
    count: DOMAINS.len(),
    source: Some("community-maintained disposable-domain lists"),
    description: "Domains known to provide disposable/temporary mailboxes",
});
