// ABOUTME: Integration tests for the content validation rules.
// ABOUTME: Exact rule messages per item kind, plus purity properties.

mod support;

use barua::types::{ContentItem, ItemId, ItemKind};
use barua::validate::{ValidationResult, Validator};
use proptest::prelude::*;

use support::{email_item, sms_item};

fn messages(issues: &[barua::validate::ValidationIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.message.as_str()).collect()
}

#[test]
fn email_requires_subject_and_body() {
    let validator = Validator::new();

    let no_subject = email_item("e1", "Welcome", "", "body");
    let result = validator.validate_item(&no_subject);
    assert!(!result.is_valid);
    assert!(messages(&result.errors).contains(&"Email subject is required"));

    let no_body = email_item("e1", "Welcome", "subject", "");
    let result = validator.validate_item(&no_body);
    assert!(!result.is_valid);
    assert!(messages(&result.errors).contains(&"Email body is required"));

    let mut missing_both = email_item("e1", "Welcome", "", "");
    missing_both.subject = None;
    missing_both.body = None;
    let result = validator.validate_item(&missing_both);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn long_email_subject_warns_without_failing() {
    let validator = Validator::new();
    let item = email_item("e1", "Welcome", &"s".repeat(151), "body");
    let result = validator.validate_item(&item);
    assert!(result.is_valid);
    assert!(messages(&result.warnings).contains(&"Email subject exceeds 150 characters"));

    // Exactly 150 does not warn.
    let item = email_item("e1", "Welcome", &"s".repeat(150), "body");
    assert!(validator.validate_item(&item).warnings.is_empty());
}

#[test]
fn placeholder_links_are_flagged() {
    let validator = Validator::new();
    let item = email_item(
        "e1",
        "Welcome",
        "Hello",
        "Visit https://example.com/start and http://placeholder.test/x",
    );
    let result = validator.validate_item(&item);
    // Placeholder links warn without failing validation.
    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings[0].message.contains("example.com"));
}

#[test]
fn spam_phrases_warn_per_occurrence() {
    let validator = Validator::new();
    let item = email_item(
        "e1",
        "Promo",
        "Big sale",
        "Buy now! Click here before it is gone. CLICK HERE!",
    );
    let result = validator.validate_item(&item);
    assert!(result.is_valid);
    // One "buy now" and two "click here", matched case-insensitively.
    assert_eq!(result.warnings.len(), 3);
}

#[test]
fn custom_spam_phrases_replace_the_defaults() {
    let validator = Validator::new().with_spam_phrases(vec!["winner".to_string()]);

    let default_trigger = email_item("e1", "Promo", "Hello", "Buy now while it lasts");
    assert!(validator.validate_item(&default_trigger).warnings.is_empty());

    let custom_trigger = email_item("e1", "Promo", "Hello", "You are a WINNER today");
    assert_eq!(validator.validate_item(&custom_trigger).warnings.len(), 1);
}

#[test]
fn sms_requires_a_message() {
    let validator = Validator::new();
    let item = sms_item("s1", "Ping", "");
    let result = validator.validate_item(&item);
    assert!(!result.is_valid);
    assert_eq!(messages(&result.errors), vec!["SMS message is required"]);
    // Empty message reports nothing else.
    assert!(result.warnings.is_empty());
}

#[test]
fn sms_length_boundaries() {
    let validator = Validator::new();

    let over = sms_item("s1", "Ping", &"x".repeat(1601));
    let result = validator.validate_item(&over);
    assert!(!result.is_valid);
    assert!(messages(&result.errors).contains(&"SMS exceeds maximum length (1600 chars)"));

    // 1600 is valid but multipart.
    let at_max = sms_item("s1", "Ping", &format!("{} Reply STOP", "x".repeat(1589)));
    let result = validator.validate_item(&at_max);
    assert!(result.is_valid);
    assert!(result.warnings.iter().any(|w| w.message.contains("multiple parts")));

    // 320 fits in two segments without the multipart warning.
    let short = sms_item("s1", "Ping", &format!("{} Reply STOP", "x".repeat(309)));
    let result = validator.validate_item(&short);
    assert!(result.is_valid);
    assert!(!result.warnings.iter().any(|w| w.message.contains("multiple parts")));
}

#[test]
fn sms_without_opt_out_language_warns() {
    let validator = Validator::new();

    let missing = sms_item("s1", "Ping", "Your order shipped.");
    let result = validator.validate_item(&missing);
    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 1);

    for text in ["Reply STOP to unsubscribe", "Text opt-out to leave", "reply stop"] {
        let ok = sms_item("s1", "Ping", text);
        assert!(
            validator.validate_item(&ok).warnings.is_empty(),
            "expected no warning for {text:?}"
        );
    }
}

#[test]
fn sms_falls_back_to_body_when_message_is_absent() {
    let validator = Validator::new();
    let item = ContentItem {
        id: ItemId::new("s1"),
        name: "Ping".to_string(),
        kind: ItemKind::Sms,
        subject: None,
        body: Some("Reply STOP to opt out".to_string()),
        message: None,
        external_id: None,
    };
    assert!(validator.validate_item(&item).is_valid);
}

proptest! {
    // Validation is pure: same input, same output, no matter the content.
    #[test]
    fn validation_is_deterministic(subject in ".{0,200}", body in ".{0,500}") {
        let validator = Validator::new();
        let item = email_item("e1", "Fuzz", &subject, &body);
        prop_assert_eq!(validator.validate_item(&item), validator.validate_item(&item));
    }

    #[test]
    fn merge_identity_and_validity(messages in proptest::collection::vec(".{1,30}", 0..8)) {
        let mut result = ValidationResult::valid();
        for m in &messages {
            result.push_error(m.clone(), None);
        }
        let merged = result.clone().merge(ValidationResult::valid());
        prop_assert_eq!(&merged, &result);
        prop_assert_eq!(merged.is_valid, messages.is_empty());
    }

    #[test]
    fn sms_validity_tracks_length_alone(len in 1usize..2000) {
        let validator = Validator::new();
        let text = format!("{} Reply STOP", "x".repeat(len));
        let item = sms_item("s1", "Fuzz", &text);
        let result = validator.validate_item(&item);
        prop_assert_eq!(result.is_valid, text.len() <= 1600);
    }
}
