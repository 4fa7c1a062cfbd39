//! Free email service domains mapped to a display provider name (spec §4.2).

use super::DatasetMeta;
use std::sync::LazyLock;

pub static PROVIDERS: &[(&str, &str)] = &[
    ("gmail.com", "Gmail"),
    ("googlemail.com", "Gmail"),
    ("yahoo.com", "Yahoo"),
    ("yahoo.co.uk", "Yahoo"),
    ("ymail.com", "Yahoo"),
    ("hotmail.com", "Outlook"),
    ("outlook.com", "Outlook"),
    ("live.com", "Outlook"),
    ("msn.com", "Outlook"),
    ("icloud.com", "iCloud"),
    ("me.com", "iCloud"),
    ("mac.com", "iCloud"),
    ("aol.com", "AOL"),
    ("protonmail.com", "ProtonMail"),
    ("proton.me", "ProtonMail"),
    ("pm.me", "ProtonMail"),
    ("gmx.com", "GMX"),
    ("gmx.net", "GMX"),
    ("zoho.com", "Zoho"),
    ("mail.com", "Mail.com"),
    ("yandex.com", "Yandex"),
    ("yandex.ru", "Yandex"),
];

pub static META: LazyLock<DatasetMeta> = LazyLock::new(|| DatasetMeta {
    version: "2026.1",
    last_updated: "2026-01-15",
    count: PROVIDERS.len(),
    source: None,
    description: "Domains operated by major free email services",
});
