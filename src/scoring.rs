//! Score, verdict and risk computation (spec §4.13 steps 7-11), factored
//! out of the orchestrator as an explicit fold over weighted contributors
//! per the Design Note in spec §9, so the pipeline's arithmetic is
//! testable without spinning up any probe.

use crate::result::{
    AuthCheck, BlacklistCheck, Deliverability, DisposableCheck, DomainCheck, Existence, MxCheck, ReputationCheck, RiskLevel,
    RoleCheck, SmtpCheck, SyntaxCheck, TypoCheck,
};

pub struct ScoreInputs<'a> {
    pub syntax: &'a SyntaxCheck,
    pub domain: &'a DomainCheck,
    pub mx: &'a MxCheck,
    pub disposable: &'a DisposableCheck,
    pub role: &'a RoleCheck,
    pub typo: &'a TypoCheck,
    pub blacklist: &'a BlacklistCheck,
    pub smtp: Option<&'a SmtpCheck>,
    pub authentication: Option<&'a AuthCheck>,
    pub reputation: Option<&'a ReputationCheck>,
    /// Known-catch-all signal for this domain, whether sourced from a
    /// fresh SMTP probe this call or the catch-all cache from an earlier
    /// one (spec §4.13 step 5 consults it as a synchronous lookup
    /// regardless of whether SMTP runs again this call).
    pub catch_all_hint: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOutcome {
    pub is_valid: bool,
    pub score: u8,
    pub deliverability: Deliverability,
    pub risk: RiskLevel,
}

/// Step 7: base score is the sum of weights for probes whose "positive"
/// condition holds.
fn base_score(inputs: &ScoreInputs) -> i32 {
    let contributors: [(bool, i32); 7] = [
        (inputs.syntax.valid, 20),
        (inputs.domain.valid, 20),
        (inputs.mx.valid, 25),
        (!inputs.disposable.is_disposable, 15),
        (!inputs.role.is_role_based, 5),
        (!inputs.typo.has_typo, 10),
        (!inputs.blacklist.is_blacklisted, 5),
    ];
    contributors.iter().filter(|(holds, _)| *holds).map(|(_, weight)| *weight).sum()
}

pub fn compute(inputs: &ScoreInputs) -> ScoreOutcome {
    let mut score = base_score(inputs);
    let mut is_valid = inputs.syntax.valid && inputs.domain.valid && inputs.mx.valid && !inputs.typo.has_typo;

    let mut deliverability = if !inputs.syntax.valid || !inputs.domain.valid {
        Deliverability::Undeliverable
    } else if !inputs.mx.valid {
        Deliverability::Unknown
    } else if inputs.disposable.is_disposable || inputs.blacklist.is_blacklisted {
        Deliverability::Risky
    } else {
        Deliverability::Deliverable
    };

    let catch_all = inputs.catch_all_hint || inputs.smtp.map(|s| s.catch_all).unwrap_or(false);
    let mut risk = if score < 50 || inputs.typo.has_typo || inputs.blacklist.is_blacklisted {
        RiskLevel::High
    } else if inputs.disposable.is_disposable || inputs.role.is_role_based || catch_all || score < 80 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    // Step 11: optional-probe adjustments, applied in the fixed order
    // SMTP, authentication, reputation — these are the only rules allowed
    // to run after the syntax short-circuit, per spec §5's ordering note.
    if let Some(smtp) = inputs.smtp {
        if smtp.exists == Existence::False {
            is_valid = false;
            score = score.min(20);
            deliverability = Deliverability::Undeliverable;
            risk = RiskLevel::High;
        }
        if smtp.catch_all {
            score = (score - 10).max(0);
            if risk == RiskLevel::Low {
                risk = RiskLevel::Medium;
            }
        }
    }

    if let Some(auth) = inputs.authentication {
        if auth.score >= 80 {
            score = (score + 5).min(100);
        } else if auth.score == 0 {
            score = (score - 5).max(0);
        }
    }

    if let Some(reputation) = inputs.reputation {
        if reputation.score < 40 {
            score = score.min(40);
            risk = RiskLevel::High;
        } else if reputation.score < 60 {
            score = (score - 15).max(0);
            if risk == RiskLevel::Low {
                risk = RiskLevel::Medium;
            }
        } else if reputation.score >= 80 {
            score = (score + 3).min(100);
        }
    }

    ScoreOutcome {
        is_valid,
        score: score.clamp(0, 100) as u8,
        deliverability,
        risk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_syntax() -> SyntaxCheck {
        SyntaxCheck { valid: true, message: "Valid email address".into() }
    }
    fn valid_domain() -> DomainCheck {
        DomainCheck { valid: true, exists: true, skipped: false, message: "ok".into() }
    }
    fn valid_mx() -> MxCheck {
        MxCheck { valid: true, records: vec!["mail.example.com".into()], skipped: false, message: "ok".into() }
    }
    fn clean_disposable() -> DisposableCheck {
        DisposableCheck { is_disposable: false, skipped: false }
    }
    fn clean_role() -> RoleCheck {
        RoleCheck { is_role_based: false, role: None, skipped: false }
    }
    fn clean_typo() -> TypoCheck {
        TypoCheck { has_typo: false, suggestion: None, skipped: false }
    }
    fn clean_blacklist() -> BlacklistCheck {
        BlacklistCheck { is_blacklisted: false, lists: vec![], skipped: false, message: "ok".into() }
    }

    #[test]
    fn clean_address_is_deliverable_low_risk_full_score() {
        let syntax = valid_syntax();
        let domain = valid_domain();
        let mx = valid_mx();
        let disposable = clean_disposable();
        let role = clean_role();
        let typo = clean_typo();
        let blacklist = clean_blacklist();
        let inputs = ScoreInputs {
            syntax: &syntax,
            domain: &domain,
            mx: &mx,
            disposable: &disposable,
            role: &role,
            typo: &typo,
            blacklist: &blacklist,
            smtp: None,
            authentication: None,
            reputation: None,
            catch_all_hint: false,
        };
        let outcome = compute(&inputs);
        assert_eq!(outcome.score, 100);
        assert!(outcome.is_valid);
        assert_eq!(outcome.deliverability, Deliverability::Deliverable);
        assert_eq!(outcome.risk, RiskLevel::Low);
    }

    #[test]
    fn bad_syntax_is_undeliverable_regardless_of_other_probes() {
        let syntax = SyntaxCheck { valid: false, message: "bad".into() };
        let domain = DomainCheck::skipped();
        let mx = MxCheck::skipped();
        let disposable = DisposableCheck::skipped();
        let role = RoleCheck::skipped();
        let typo = TypoCheck::skipped();
        let blacklist = BlacklistCheck::skipped();
        let inputs = ScoreInputs {
            syntax: &syntax,
            domain: &domain,
            mx: &mx,
            disposable: &disposable,
            role: &role,
            typo: &typo,
            blacklist: &blacklist,
            smtp: None,
            authentication: None,
            reputation: None,
            catch_all_hint: false,
        };
        let outcome = compute(&inputs);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.deliverability, Deliverability::Undeliverable);
    }

    #[test]
    fn smtp_nonexistent_overrides_everything_else() {
        let syntax = valid_syntax();
        let domain = valid_domain();
        let mx = valid_mx();
        let disposable = clean_disposable();
        let role = clean_role();
        let typo = clean_typo();
        let blacklist = clean_blacklist();
        let smtp = SmtpCheck { exists: Existence::False, catch_all: false, greylisted: false, message: "gone".into() };
        let inputs = ScoreInputs {
            syntax: &syntax,
            domain: &domain,
            mx: &mx,
            disposable: &disposable,
            role: &role,
            typo: &typo,
            blacklist: &blacklist,
            smtp: Some(&smtp),
            authentication: None,
            reputation: None,
            catch_all_hint: false,
        };
        let outcome = compute(&inputs);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.deliverability, Deliverability::Undeliverable);
        assert_eq!(outcome.risk, RiskLevel::High);
        assert!(outcome.score <= 20);
    }

    #[test]
    fn catch_all_escalates_low_risk_to_medium_and_deducts_ten() {
        let syntax = valid_syntax();
        let domain = valid_domain();
        let mx = valid_mx();
        let disposable = clean_disposable();
        let role = clean_role();
        let typo = clean_typo();
        let blacklist = clean_blacklist();
        let smtp = SmtpCheck { exists: Existence::Unknown, catch_all: true, greylisted: false, message: "catch-all".into() };
        let inputs = ScoreInputs {
            syntax: &syntax,
            domain: &domain,
            mx: &mx,
            disposable: &disposable,
            role: &role,
            typo: &typo,
            blacklist: &blacklist,
            smtp: Some(&smtp),
            authentication: None,
            reputation: None,
            catch_all_hint: false,
        };
        let outcome = compute(&inputs);
        assert_eq!(outcome.score, 90);
        assert_eq!(outcome.risk, RiskLevel::Medium);
    }

    #[test]
    fn low_reputation_caps_score_and_forces_high_risk() {
        let syntax = valid_syntax();
        let domain = valid_domain();
        let mx = valid_mx();
        let disposable = clean_disposable();
        let role = clean_role();
        let typo = clean_typo();
        let blacklist = clean_blacklist();
        let reputation = ReputationCheck {
            age: crate::result::DomainAge { age_in_days: Some(2), class: crate::result::DomainAgeClass::New, message: "new".into() },
            blocklisted_on: vec![],
            pattern_flags: vec![],
            high_risk_tld: false,
            premium_tld: false,
            score: 20,
            risk: crate::result::ReputationRisk::Critical,
        };
        let inputs = ScoreInputs {
            syntax: &syntax,
            domain: &domain,
            mx: &mx,
            disposable: &disposable,
            role: &role,
            typo: &typo,
            blacklist: &blacklist,
            smtp: None,
            authentication: None,
            reputation: Some(&reputation),
            catch_all_hint: false,
        };
        let outcome = compute(&inputs);
        assert!(outcome.score <= 40);
        assert_eq!(outcome.risk, RiskLevel::High);
    }
}
