//! RDAP domain-age lookup (spec §4.11). `GET <rdap-root>/<domain>` with
//! `Accept: application/rdap+json`; only the `registration` event's date
//! is consulted.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

use crate::result::{DomainAge, DomainAgeClass};
use crate::static_data::reputation_tlds::RDAP_SERVERS;

#[derive(Deserialize)]
struct RdapResponse {
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    event_action: String,
    #[serde(rename = "eventDate")]
    event_date: String,
}

fn rdap_root_for(domain: &str) -> Option<&'static str> {
    let tld = domain.rsplit('.').next()?;
    RDAP_SERVERS.iter().find(|(t, _)| *t == tld).map(|(_, root)| *root)
}

pub async fn lookup(http: &reqwest::Client, domain: &str, timeout: Duration) -> DomainAge {
    let Some(root) = rdap_root_for(domain) else {
        return unsupported();
    };

    let url = format!("{root}/{domain}");
    let response = http
        .get(&url)
        .header("Accept", "application/rdap+json")
        .timeout(timeout)
        .send()
        .await;

    let Ok(response) = response else {
        return unsupported();
    };
    if !response.status().is_success() {
        return unsupported();
    }
    let Ok(body) = response.json::<RdapResponse>().await else {
        return unsupported();
    };

    let registration = body.events.iter().find(|e| e.event_action == "registration");
    let Some(registration) = registration else {
        return unsupported();
    };
    let Ok(registered_at) = DateTime::parse_from_rfc3339(&registration.event_date) else {
        return unsupported();
    };

    classify(registered_at.with_timezone(&Utc))
}

fn classify(registered_at: DateTime<Utc>) -> DomainAge {
    let age_in_days = (Utc::now() - registered_at).num_days();
    let class = if age_in_days < 30 {
        DomainAgeClass::New
    } else if age_in_days < 180 {
        DomainAgeClass::Young
    } else {
        DomainAgeClass::Established
    };
    DomainAge {
        age_in_days: Some(age_in_days),
        class,
        message: format!("Registered {age_in_days} days ago"),
    }
}

pub(crate) fn unsupported() -> DomainAge {
    DomainAge {
        age_in_days: None,
        class: DomainAgeClass::Unknown,
        message: "Domain age could not be determined".into(),
    }
}
