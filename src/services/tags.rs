//! Hashtag extraction
//!
//! Pulls #hashtags out of post text at creation time. Tags are derived
//! once and immutable afterwards.

use regex::Regex;
use std::sync::LazyLock;

/// Matches #tag where tag is alphanumeric or underscore
static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([a-zA-Z0-9_]+)").expect("Invalid hashtag regex"));

/// Extract hashtags from content text (without the # symbol), lowercase,
/// deduplicated while preserving first occurrence order.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let tags: Vec<String> = HASHTAG_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_lowercase()))
        .collect();

    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|tag| seen.insert(tag.clone())).collect()
}
