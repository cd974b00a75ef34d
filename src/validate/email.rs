// ABOUTME: Built-in validation rules for email content items.
// ABOUTME: Subject/body presence, subject length, placeholder links, spam phrases.

use crate::types::ContentItem;

use super::ValidationResult;

/// Subject lines longer than this draw a warning; many clients truncate them.
const SUBJECT_WARN_LENGTH: usize = 150;

/// Substrings that mark a link as left-over placeholder content.
const PLACEHOLDER_MARKERS: &[&str] = &["example.com", "placeholder"];

pub(super) fn validate(item: &ContentItem, spam_phrases: &[String]) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let id = Some(&item.id);

    let subject = item.subject.as_deref().unwrap_or("");
    if subject.trim().is_empty() {
        result.push_error("Email subject is required", id);
    } else if subject.chars().count() > SUBJECT_WARN_LENGTH {
        result.push_warning(
            format!("Email subject exceeds {SUBJECT_WARN_LENGTH} characters"),
            id,
        );
    }

    let body = item.body.as_deref().unwrap_or("");
    if body.trim().is_empty() {
        result.push_error("Email body is required", id);
    } else {
        for link in extract_links(body) {
            if is_placeholder(link) {
                result.push_warning(format!("Link looks like a placeholder: {link}"), id);
            }
        }

        let haystack = body.to_lowercase();
        for phrase in spam_phrases {
            let needle = phrase.to_lowercase();
            for _ in 0..count_occurrences(&haystack, &needle) {
                result.push_warning(format!("Possible spam trigger phrase: \"{phrase}\""), id);
            }
        }
    }

    result
}

fn is_placeholder(link: &str) -> bool {
    let lower = link.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}

/// Pull `http(s)://...` links out of a body without a full HTML parse.
/// A link runs until whitespace or a quote/angle-bracket delimiter.
fn extract_links(body: &str) -> Vec<&str> {
    let mut links = Vec::new();
    let mut rest = body;
    loop {
        // Take whichever scheme occurs first from here.
        let start = match (rest.find("http://"), rest.find("https://")) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => break,
        };
        let tail = &rest[start..];
        let end = tail
            .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | ')'))
            .unwrap_or(tail.len());
        links.push(&tail[..end]);
        rest = &tail[end..];
    }
    links
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut rest = haystack;
    while let Some(pos) = rest.find(needle) {
        count += 1;
        rest = &rest[pos + needle.len()..];
    }
    count
}
