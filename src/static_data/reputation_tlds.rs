//! TLD classification and RDAP server table used by the reputation probe
//! (spec §4.11).

use super::DatasetMeta;
use std::sync::LazyLock;

pub static HIGH_RISK_TLDS: &[&str] = &[
    "xyz", "top", "work", "click", "link", "gq", "ml", "cf", "tk", "ga", "buzz", "icu", "loan",
    "ooo",
];

pub static PREMIUM_TLDS: &[&str] = &[
    "com", "net", "org", "edu", "gov", "io", "co", "dev", "app",
];

/// `tld -> rdap server root` (spec §4.11: "Servers are keyed by TLD for a
/// fixed table").
pub static RDAP_SERVERS: &[(&str, &str)] = &[
    ("com", "https://rdap.verisign.com/com/v1/domain"),
    ("net", "https://rdap.verisign.com/net/v1/domain"),
    ("org", "https://rdap.pir.org/rdap/domain"),
    ("io", "https://rdap.nic.io/domain"),
    ("co", "https://rdap.nic.co/domain"),
    ("me", "https://rdap.nic.me/domain"),
    ("dev", "https://rdap.nic.google/domain"),
    ("app", "https://rdap.nic.google/domain"),
];

pub static META: LazyLock<DatasetMeta> = LazyLock::new(|| DatasetMeta {
    version: "2026.1",
    last_updated: "2026-01-15",
    count: RDAP_SERVERS.len(),
    source: Some("IANA RDAP bootstrap registry (fixed subset)"),
    description: "TLD risk classification and per-TLD RDAP server roots",
});
