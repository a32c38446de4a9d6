use std::sync::LazyLock;

use regex::Regex;

/// Topic slugs: lowercase ASCII letters and dashes only
pub static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z-]+$").expect("slug pattern is a valid regex"));

pub const SLUG_MESSAGE: &str = "Must be lowercase letters or dashes without spaces";
/// Reported for a field missing from the submitted form
pub const MISSING_FIELD_MESSAGE: &str = "Expected string, received null";

/// Message reported when a string is shorter than `min` characters
///
/// # Examples
/// ```
/// use forum_api::validation::min_length_message;
///
/// assert_eq!(min_length_message(3), "String must contain at least 3 character(s)");
/// ```
pub fn min_length_message(min: u64) -> String {
    format!("String must contain at least {min} character(s)")
}

/// Whether `slug` is a syntactically valid topic slug
pub fn is_valid_slug(slug: &str) -> bool {
    slug.chars().count() >= 3 && SLUG_REGEX.is_match(slug)
}
