//! Common domain misspellings (spec §4.2).

use super::DatasetMeta;
use std::sync::LazyLock;

/// Direct misspelling → canonical domain map.
pub static MISSPELLINGS: &[(&str, &str)] = &[
    ("gmial.com", "gmail.com"),
    ("gmal.com", "gmail.com"),
    ("gmai.com", "gmail.com"),
    ("gmaill.com", "gmail.com"),
    ("gmil.com", "gmail.com"),
    ("gnail.com", "gmail.com"),
    ("gmail.con", "gmail.com"),
    ("gmail.cm", "gmail.com"),
    ("yaho.com", "yahoo.com"),
    ("yahooo.com", "yahoo.com"),
    ("yhoo.com", "yahoo.com"),
    ("hotmial.com", "hotmail.com"),
    ("hotmal.com", "hotmail.com"),
    ("hotmil.com", "hotmail.com"),
    ("hotmai.com", "hotmail.com"),
    ("outlok.com", "outlook.com"),
    ("outlook.con", "outlook.com"),
    ("iclould.com", "icloud.com"),
    ("iclou.com", "icloud.com"),
    ("aoll.com", "aol.com"),
    ("protonmial.com", "protonmail.com"),
    ("liv.com", "live.com"),
    ("ymial.com", "ymail.com"),
];

/// Canonical domains used for the edit-distance fallback and for the
/// bare-TLD rewrite (spec §4.2: "a bare TLD typo ... rewrites only the TLD").
pub static CANONICAL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "icloud.com",
    "aol.com",
    "protonmail.com",
    "live.com",
    "ymail.com",
];

pub static META: LazyLock<DatasetMeta> = LazyLock::new(|| DatasetMeta {
    version: "2026.1",
    last_updated: "2026-01-15",
    count: MISSPELLINGS.len(),
    source: None,
    description: "Known misspellings of popular mailbox-provider domains",
});
