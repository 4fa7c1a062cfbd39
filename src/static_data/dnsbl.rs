//! DNSBL zones consulted by the blacklist and reputation probes (spec §4.2, §4.11).

use super::DatasetMeta;
use std::sync::LazyLock;

pub static ZONES: &[(&str, &str)] = &[
    ("zen.spamhaus.org", "Spamhaus DBL"),
    ("multi.surbl.org", "SURBL"),
    ("multi.uribl.com", "URIBL"),
];

pub static META: LazyLock<DatasetMeta> = LazyLock::new(|| DatasetMeta {
    version: "2026.1",
    last_updated: "2026-01-15",
    count: ZONES.len(),
    source: Some("public DNSBL operators"),
    description: "DNS-based blocklist zones queried as <domain>.<zone> A lookups",
});
