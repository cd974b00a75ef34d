// ABOUTME: Built-in validation rules for SMS content items.
// ABOUTME: Message presence, length ceiling, multi-part warning, opt-out phrase check.

use crate::types::ContentItem;

use super::ValidationResult;

/// Hard ceiling the delivery platform enforces.
const MAX_LENGTH: usize = 1600;

/// Above this length carriers split the message into multiple parts.
const MULTIPART_LENGTH: usize = 320;

/// Phrases that satisfy the opt-out requirement, matched case-insensitively.
const OPT_OUT_PHRASES: &[&str] = &["stop", "opt-out"];

pub(super) fn validate(item: &ContentItem) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let id = Some(&item.id);

    let text = item.sms_text().unwrap_or("");
    if text.trim().is_empty() {
        result.push_error("SMS message is required", id);
        return result;
    }

    let length = text.chars().count();
    if length > MAX_LENGTH {
        result.push_error(format!("SMS exceeds maximum length ({MAX_LENGTH} chars)"), id);
    } else if length > MULTIPART_LENGTH {
        result.push_warning(
            format!("SMS of {length} chars will be delivered in multiple parts"),
            id,
        );
    }

    let lower = text.to_lowercase();
    if !OPT_OUT_PHRASES.iter().any(|p| lower.contains(p)) {
        result.push_warning("SMS is missing an opt-out phrase (\"STOP\" or \"opt-out\")", id);
    }

    result
}
