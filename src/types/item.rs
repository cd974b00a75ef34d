// ABOUTME: Content item types: one touchpoint within a journey.
// ABOUTME: Covers email and SMS kinds plus an open-ended fallback for custom kinds.

use serde::{Deserialize, Serialize};

use super::{ExternalId, ItemId};

/// Kind of content a touchpoint carries.
///
/// Parsed case-insensitively so `"Email"` and `"email"` are the same kind.
/// Unrecognized kinds are preserved verbatim in `Other` rather than rejected:
/// only custom validation rules apply to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    Email,
    Sms,
    Other(String),
}

impl From<String> for ItemKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "email" => ItemKind::Email,
            "sms" => ItemKind::Sms,
            _ => ItemKind::Other(value),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Email => "email".to_string(),
            ItemKind::Sms => "sms".to_string(),
            ItemKind::Other(other) => other,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Email => write!(f, "email"),
            ItemKind::Sms => write!(f, "sms"),
            ItemKind::Other(other) => write!(f, "{other}"),
        }
    }
}

/// One content item (touchpoint) to publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Email subject line.
    #[serde(default)]
    pub subject: Option<String>,

    /// Email body (HTML or plain text).
    #[serde(default)]
    pub body: Option<String>,

    /// SMS message text. SMS items may alternatively put their text in `body`.
    #[serde(default)]
    pub message: Option<String>,

    /// Id assigned by the delivery platform on a previous publish, if known.
    #[serde(default)]
    pub external_id: Option<ExternalId>,
}

impl ContentItem {
    /// The text an SMS item would deliver: `message` wins, `body` is the fallback.
    pub fn sms_text(&self) -> Option<&str> {
        self.message.as_deref().or(self.body.as_deref())
    }
}
