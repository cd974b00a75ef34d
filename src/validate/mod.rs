// ABOUTME: Validation engine for journey content items.
// ABOUTME: Pure rule evaluation with structured errors, warnings, and info entries.

mod email;
mod sms;

use serde::{Deserialize, Serialize};

use crate::types::{ContentItem, ItemId, ItemKind};

/// One validation finding, attributed to an item when the rule is per-item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    #[serde(default)]
    pub item_id: Option<ItemId>,
}

impl ValidationIssue {
    pub fn new(message: impl Into<String>, item_id: Option<ItemId>) -> Self {
        Self {
            message: message.into(),
            item_id,
        }
    }
}

/// Outcome of validating an item or a batch.
///
/// Results merge associatively: `a.merge(b)` is valid iff both are, and the
/// issue lists concatenate in order. Multi-rule composition relies on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub info: Vec<ValidationIssue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    /// An empty, passing result.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    pub fn push_error(&mut self, message: impl Into<String>, item_id: Option<&ItemId>) {
        self.is_valid = false;
        self.errors
            .push(ValidationIssue::new(message, item_id.cloned()));
    }

    pub fn push_warning(&mut self, message: impl Into<String>, item_id: Option<&ItemId>) {
        self.warnings
            .push(ValidationIssue::new(message, item_id.cloned()));
    }

    pub fn push_info(&mut self, message: impl Into<String>, item_id: Option<&ItemId>) {
        self.info
            .push(ValidationIssue::new(message, item_id.cloned()));
    }

    /// Combine two results. Associative; `valid()` is the identity.
    #[must_use = "merge returns the combined result"]
    pub fn merge(mut self, other: Self) -> Self {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
        self
    }
}

/// A caller-supplied rule. Returning `None` means the rule has nothing to say.
pub type CustomRule = Box<dyn Fn(&ContentItem) -> Option<ValidationResult> + Send + Sync>;

/// Default phrase list for the spam-trigger warning, matched case-insensitively.
const DEFAULT_SPAM_PHRASES: &[&str] = &[
    "act now",
    "buy now",
    "click here",
    "limited time",
    "free money",
    "100% free",
];

/// Validates content items with built-in per-kind rules plus custom rules.
///
/// Validation is pure: no I/O, no hidden state, identical input yields
/// identical output.
pub struct Validator {
    spam_phrases: Vec<String>,
    custom_rules: Vec<CustomRule>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            spam_phrases: DEFAULT_SPAM_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            custom_rules: Vec::new(),
        }
    }

    /// Replace the spam-trigger phrase list.
    pub fn with_spam_phrases(mut self, phrases: Vec<String>) -> Self {
        self.spam_phrases = phrases;
        self
    }

    /// Register a custom rule, applied after the built-in rules.
    pub fn add_rule(
        &mut self,
        rule: impl Fn(&ContentItem) -> Option<ValidationResult> + Send + Sync + 'static,
    ) {
        self.custom_rules.push(Box::new(rule));
    }

    /// Validate a single item with built-in rules for its kind, then custom rules.
    pub fn validate_item(&self, item: &ContentItem) -> ValidationResult {
        let built_in = match item.kind {
            ItemKind::Email => email::validate(item, &self.spam_phrases),
            ItemKind::Sms => sms::validate(item),
            // Unknown kinds get no built-in checks; only custom rules apply.
            ItemKind::Other(_) => ValidationResult::valid(),
        };

        self.custom_rules
            .iter()
            .filter_map(|rule| rule(item))
            .fold(built_in, ValidationResult::merge)
    }

    /// Validate a batch: merged per-item results plus one info entry for the batch size.
    pub fn validate_batch(&self, items: &[ContentItem]) -> ValidationResult {
        let mut result = items
            .iter()
            .map(|item| self.validate_item(item))
            .fold(ValidationResult::valid(), ValidationResult::merge);

        result.push_info(format!("Validated {} item(s) in batch", items.len()), None);
        result
    }
}
