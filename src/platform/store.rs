// ABOUTME: TemplateStore trait and idempotent upsert-by-name resolution.
// ABOUTME: The orchestrator and rollback manager only ever talk to this seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{ContentItem, ExternalId, ItemKind};

use super::error::{ApiErrorKind, ExternalApiError};

/// Content pushed to (or read back from) the platform for one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub body: Option<String>,
}

impl TemplatePayload {
    /// Build the payload an item would publish.
    ///
    /// SMS items deliver their text in the body field; `message` wins over
    /// `body` when both are present.
    pub fn for_item(item: &ContentItem) -> Self {
        let body = match item.kind {
            ItemKind::Sms => item.sms_text().map(str::to_string),
            _ => item.body.clone(),
        };
        Self {
            name: item.name.clone(),
            kind: item.kind.clone(),
            subject: item.subject.clone(),
            body,
        }
    }
}

/// A template record as stored on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: ExternalId,

    #[serde(flatten)]
    pub content: TemplatePayload,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

/// Result of an idempotent upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub external_id: ExternalId,
    pub action: UpsertAction,
}

/// CRUD operations against the external template store.
///
/// Implementations must not retry; failure policy belongs to the caller.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, ExternalApiError>;

    async fn get_template(&self, id: &ExternalId) -> Result<TemplateRecord, ExternalApiError>;

    async fn create_template(
        &self,
        payload: &TemplatePayload,
    ) -> Result<TemplateRecord, ExternalApiError>;

    async fn update_template(
        &self,
        id: &ExternalId,
        payload: &TemplatePayload,
    ) -> Result<TemplateRecord, ExternalApiError>;

    async fn delete_template(&self, id: &ExternalId) -> Result<(), ExternalApiError>;
}

/// Create-or-update a template, preferring id-based lookup over name matching.
///
/// Resolution order:
/// 1. `known_id`, when the caller has one recorded from an earlier publish.
///    A 404 here means the record was deleted out-of-band; fall through.
/// 2. Exact, case-sensitive match on name against `list_templates()`; the
///    first match wins. Duplicate names on the platform make this ambiguous,
///    which is exactly why recorded ids take precedence.
/// 3. Create a new record.
pub async fn upsert_by_name(
    store: &dyn TemplateStore,
    known_id: Option<&ExternalId>,
    payload: &TemplatePayload,
) -> Result<UpsertOutcome, ExternalApiError> {
    if let Some(id) = known_id {
        match store.update_template(id, payload).await {
            Ok(record) => {
                return Ok(UpsertOutcome {
                    external_id: record.id,
                    action: UpsertAction::Updated,
                });
            }
            Err(e) if e.kind() == ApiErrorKind::NotFound => {
                tracing::warn!(
                    external_id = %id,
                    name = %payload.name,
                    "recorded template id no longer exists, falling back to name lookup"
                );
            }
            Err(e) => return Err(e),
        }
    }

    let existing = store.list_templates().await?;
    if let Some(record) = existing.into_iter().find(|r| r.content.name == payload.name) {
        let updated = store.update_template(&record.id, payload).await?;
        return Ok(UpsertOutcome {
            external_id: updated.id,
            action: UpsertAction::Updated,
        });
    }

    let created = store.create_template(payload).await?;
    Ok(UpsertOutcome {
        external_id: created.id,
        action: UpsertAction::Created,
    })
}
