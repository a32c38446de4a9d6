//! Canonical page paths used for redirects and cache keys.

use uuid::Uuid;

pub const fn home() -> &'static str {
    "/"
}

pub fn topic_show(slug: &str) -> String {
    format!("/topics/{slug}")
}

pub fn post_show(slug: &str, post_id: Uuid) -> String {
    format!("/topics/{slug}/posts/{post_id}")
}
