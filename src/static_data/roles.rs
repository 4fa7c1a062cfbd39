//! Role-account local-part prefixes (spec §4.2).

use super::DatasetMeta;
use std::sync::LazyLock;

pub static PREFIXES: &[&str] = &[
    "admin",
    "administrator",
    "webmaster",
    "hostmaster",
    "postmaster",
    "info",
    "support",
    "sales",
    "contact",
    "help",
    "billing",
    "abuse",
    "noreply",
    "no-reply",
    "donotreply",
    "marketing",
    "office",
    "team",
    "security",
    "privacy",
    "legal",
    "hr",
    "jobs",
    "careers",
    "press",
    "media",
    "root",
    "news",
    "newsletter",
    "feedback",
];

pub static META: LazyLock<DatasetMeta> = LazyLock::new(|| DatasetMeta {
    version: "2026.1",
    last_updated: "2026-01-15",
    count: PREFIXES.len(),
    source: None,
    description: "Local-part prefixes that denote a shared/role mailbox rather than a person",
});
