//! Disposable, role-based, free-provider and typo probes (C1b, spec §4.2).
//! Pure lookups against in-process static sets loaded at startup, all
//! case-insensitive.

use crate::result::{DisposableCheck, FreeProviderCheck, RoleCheck, TypoCheck};
use crate::static_data::{disposable, free_providers, roles, typo};

pub fn disposable(domain: &str) -> DisposableCheck {
    let domain = domain.to_lowercase();
    let is_disposable = disposable::DOMAINS.iter().any(|d| {
        domain == *d || domain.ends_with(&format!(".{d}"))
    }) || disposable::PATTERNS.iter().any(|p| match_pattern(&domain, p));

    DisposableCheck {
        is_disposable,
        skipped: false,
    }
}

pub fn role(local_part: &str) -> RoleCheck {
    let local = local_part.to_lowercase();
    for prefix in roles::PREFIXES {
        if local == *prefix {
            return RoleCheck {
                is_role_based: true,
                role: Some((*prefix).to_string()),
                skipped: false,
            };
        }
        for sep in ['.', '-', '_'] {
            let needle = format!("{prefix}{sep}");
            if let Some(rest) = local.strip_prefix(&needle) {
                if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                    return RoleCheck {
                        is_role_based: true,
                        role: Some((*prefix).to_string()),
                        skipped: false,
                    };
                }
            }
        }
    }
    RoleCheck {
        is_role_based: false,
        role: None,
        skipped: false,
    }
}

pub fn free_provider(domain: &str) -> FreeProviderCheck {
    let domain = domain.to_lowercase();
    match free_providers::PROVIDERS.iter().find(|(d, _)| *d == domain) {
        Some((_, name)) => FreeProviderCheck {
            is_free: true,
            provider: Some((*name).to_string()),
            skipped: false,
        },
        None => FreeProviderCheck {
            is_free: false,
            provider: None,
            skipped: false,
        },
    }
}

pub fn typo(domain: &str) -> TypoCheck {
    let domain = domain.to_lowercase();

    if let Some((_, canonical)) = typo::MISSPELLINGS.iter().find(|(d, _)| *d == domain) {
        return TypoCheck {
            has_typo: true,
            suggestion: Some((*canonical).to_string()),
            skipped: false,
        };
    }

    if let Some((base, tld)) = domain.rsplit_once('.') {
        for canonical in typo::CANONICAL_DOMAINS {
            if let Some((cbase, ctld)) = canonical.rsplit_once('.') {
                if base == cbase && tld != ctld && edit_distance(tld, ctld) <= 2 {
                    return TypoCheck {
                        has_typo: true,
                        suggestion: Some(format!("{cbase}.{ctld}")),
                        skipped: false,
                    };
                }
            }
        }
    }

    if let Some(best) = typo::CANONICAL_DOMAINS
        .iter()
        .map(|c| (*c, edit_distance(&domain, c)))
        .filter(|(c, dist)| *dist > 0 && *dist <= 2 && *c != domain)
        .min_by_key(|(_, dist)| *dist)
    {
        return TypoCheck {
            has_typo: true,
            suggestion: Some(best.0.to_string()),
            skipped: false,
        };
    }

    TypoCheck {
        has_typo: false,
        suggestion: None,
        skipped: false,
    }
}

/// Small glob/regex-ish matcher for the disposable fallback pattern set.
/// `foo*` is a prefix match, `a.*b`-shaped entries are treated as regex,
/// anything else is a plain substring match.
fn match_pattern(domain: &str, pattern: &str) -> bool {
    if pattern.contains(".*") {
        regex::Regex::new(pattern)
            .map(|re| re.is_match(domain))
            .unwrap_or(false)
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        domain.starts_with(prefix)
    } else {
        domain.contains(pattern)
    }
}

/// Damerau-Levenshtein edit distance (insert/delete/substitute/transpose),
/// used for the typo probe's fallback fuzzy match (spec §4.2).
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());
    let mut d = vec![vec![0usize; m + 1]; n + 1];
    for i in 0..=n {
        d[i][0] = i;
    }
    for j in 0..=m {
        d[0][j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            d[i][j] = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                d[i][j] = d[i][j].min(d[i - 2][j - 2] + cost);
            }
        }
    }
    d[n][m]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposable_exact_and_subdomain() {
        assert!(disposable("mailinator.com").is_disposable);
        assert!(disposable("sub.mailinator.com").is_disposable);
        assert!(!disposable("gmail.com").is_disposable);
    }

    #[test]
    fn disposable_pattern_fallback() {
        assert!(disposable("tempmail123.net").is_disposable);
        assert!(disposable("fakebox.io").is_disposable);
    }

    #[test]
    fn role_exact_and_suffixed() {
        let r = role("admin");
        assert!(r.is_role_based);
        assert_eq!(r.role.as_deref(), Some("admin"));

        assert!(role("admin.123").is_role_based);
        assert!(role("admin-7").is_role_based);
        assert!(role("admin_42").is_role_based);
        assert!(!role("admin-notdigits").is_role_based);
        assert!(!role("administrative").is_role_based);
    }

    #[test]
    fn free_provider_lookup() {
        let r = free_provider("gmail.com");
        assert!(r.is_free);
        assert_eq!(r.provider.as_deref(), Some("Gmail"));
        assert!(!free_provider("example.com").is_free);
    }

    #[test]
    fn typo_direct_map() {
        let r = typo("gmial.com");
        assert!(r.has_typo);
        assert_eq!(r.suggestion.as_deref(), Some("gmail.com"));
    }

    #[test]
    fn typo_bare_tld() {
        let r = typo("gmail.comm");
        assert!(r.has_typo);
        assert_eq!(r.suggestion.as_deref(), Some("gmail.com"));
    }

    #[test]
    fn typo_none_for_canonical() {
        assert!(!typo("gmail.com").has_typo);
    }
}
