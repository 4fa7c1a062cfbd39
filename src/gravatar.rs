//! Gravatar presence probe (C10, spec §4.12): MD5 of the normalized email,
//! then a HEAD request against the avatar endpoint with `d=404` so a
//! missing avatar reports as a clean 404 rather than a generated default.

use md5::{Digest, Md5};
use std::time::Duration;

use crate::result::GravatarCheck;

fn hash_email(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Md5::digest(normalized.as_bytes());
    hex::encode(digest)
}

pub async fn check(http: &reqwest::Client, email: &str, timeout: Duration) -> GravatarCheck {
    let hash = hash_email(email);
    let url = format!("https://www.gravatar.com/avatar/{hash}?d=404&s=1");

    let response = http.head(&url).timeout(timeout).send().await;

    match response {
        Ok(response) if response.status().is_success() => GravatarCheck {
            checked: true,
            exists: true,
            avatar_url: Some(format!("https://www.gravatar.com/avatar/{hash}")),
            profile_url: Some(format!("https://www.gravatar.com/{hash}")),
        },
        Ok(response) if response.status().as_u16() == 404 => GravatarCheck {
            checked: true,
            exists: false,
            avatar_url: None,
            profile_url: None,
        },
        _ => GravatarCheck {
            checked: false,
            exists: false,
            avatar_url: None,
            profile_url: None,
        },
    }
}
