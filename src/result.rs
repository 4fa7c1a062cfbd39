//! The public, JSON-serialisable result shape (spec §3, §6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Qualitative deliverability verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deliverability {
    Deliverable,
    Risky,
    Undeliverable,
    Unknown,
}

/// Coarse risk bucket surfaced on [`ValidationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// The four-level risk bucket used internally by the reputation probe
/// (spec §4.11), distinct from the coarser [`RiskLevel`] on the overall result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReputationRisk {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxCheck {
    pub valid: bool,
    pub message: String,
}

/// Mandatory probes still carry a `skipped` flag rather than disappearing,
/// so that `checks` always has a fixed, self-describing shape (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCheck {
    pub valid: bool,
    pub exists: bool,
    pub skipped: bool,
    pub message: String,
}

impl DomainCheck {
    pub fn skipped() -> Self {
        Self {
            valid: false,
            exists: false,
            skipped: true,
            message: "skipped: syntax invalid".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MxCheck {
    pub valid: bool,
    pub records: Vec<String>,
    pub skipped: bool,
    pub message: String,
}

impl MxCheck {
    pub fn skipped() -> Self {
        Self {
            valid: false,
            records: vec![],
            skipped: true,
            message: "skipped: syntax invalid".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisposableCheck {
    pub is_disposable: bool,
    pub skipped: bool,
}

impl DisposableCheck {
    pub fn skipped() -> Self {
        Self {
            is_disposable: false,
            skipped: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCheck {
    pub is_role_based: bool,
    pub role: Option<String>,
    pub skipped: bool,
}

impl RoleCheck {
    pub fn skipped() -> Self {
        Self {
            is_role_based: false,
            role: None,
            skipped: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeProviderCheck {
    pub is_free: bool,
    pub provider: Option<String>,
    pub skipped: bool,
}

impl FreeProviderCheck {
    pub fn skipped() -> Self {
        Self {
            is_free: false,
            provider: None,
            skipped: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypoCheck {
    pub has_typo: bool,
    pub suggestion: Option<String>,
    pub skipped: bool,
}

impl TypoCheck {
    pub fn skipped() -> Self {
        Self {
            has_typo: false,
            suggestion: None,
            skipped: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistCheck {
    pub is_blacklisted: bool,
    pub lists: Vec<String>,
    pub skipped: bool,
    pub message: String,
}

impl BlacklistCheck {
    pub fn skipped() -> Self {
        Self {
            is_blacklisted: false,
            lists: vec![],
            skipped: true,
            message: "skipped: syntax invalid".into(),
        }
    }
}

/// Tri-state existence verdict produced by the SMTP prober (spec §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Existence {
    True,
    False,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmtpCheck {
    pub exists: Existence,
    pub catch_all: bool,
    pub greylisted: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrength {
    Strong,
    Moderate,
    Weak,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpfResult {
    pub present: bool,
    pub strength: AuthStrength,
    pub record: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmarcResult {
    pub present: bool,
    pub strength: AuthStrength,
    pub policy: Option<String>,
    pub subdomain_policy: Option<String>,
    pub percentage: Option<u8>,
    pub aggregate_reports: Vec<String>,
    pub forensic_reports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DkimResult {
    pub found_selectors: Vec<String>,
    pub revoked_selectors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthCheck {
    pub spf: SpfResult,
    pub dmarc: DmarcResult,
    pub dkim: DkimResult,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainAgeClass {
    New,
    Young,
    Established,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAge {
    pub age_in_days: Option<i64>,
    pub class: DomainAgeClass,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationCheck {
    pub age: DomainAge,
    pub blocklisted_on: Vec<String>,
    pub pattern_flags: Vec<String>,
    pub high_risk_tld: bool,
    pub premium_tld: bool,
    pub score: u8,
    pub risk: ReputationRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravatarCheck {
    pub checked: bool,
    pub exists: bool,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
}

/// The fixed tuple of probe sub-results (spec §3's `checks`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResults {
    pub syntax: SyntaxCheck,
    pub domain: DomainCheck,
    pub mx: MxCheck,
    pub disposable: DisposableCheck,
    pub role: RoleCheck,
    pub free_provider: FreeProviderCheck,
    pub typo: TypoCheck,
    pub blacklist: BlacklistCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp: Option<SmtpCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reputation: Option<ReputationCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravatar: Option<GravatarCheck>,
}

/// Immutable validation outcome (spec §3's `ValidationResult`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub email: String,
    pub is_valid: bool,
    pub score: u8,
    pub deliverability: Deliverability,
    pub risk: RiskLevel,
    pub checks: CheckResults,
    pub timestamp: DateTime<Utc>,
}

impl ValidationResult {
    /// Returns a copy with a freshly minted `timestamp`, used when serving a
    /// full-result cache hit (spec §4.13 step 1: "return a copy with
    /// refreshed timestamp").
    pub fn with_refreshed_timestamp(&self) -> Self {
        let mut copy = self.clone();
        copy.timestamp = Utc::now();
        copy
    }
}
