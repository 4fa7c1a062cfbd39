//! Bundled static datasets (spec §6: "Static data collaborators").
//!
//! Each dataset ships versioned metadata so an embedder can report dataset
//! freshness without the engine needing any persistence layer.

pub mod disposable;
pub mod dnsbl;
pub mod free_providers;
pub mod reputation_tlds;
pub mod roles;
pub mod typo;

use serde::Serialize;

/// `{version, lastUpdated, count, source?, description}` per spec §6.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetMeta {
    pub version: &'static str,
    pub last_updated: &'static str,
    pub count: usize,
    pub source: Option<&'static str>,
    pub description: &'static str,
}
