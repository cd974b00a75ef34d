// ABOUTME: HTTP implementation of TemplateStore using reqwest.
// ABOUTME: Bearer auth plus location header, JSON bodies, throttled sequential requests.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, header};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::types::ExternalId;

use super::error::ExternalApiError;
use super::store::{TemplatePayload, TemplateRecord, TemplateStore};
use super::throttle::{FixedDelay, Throttle};

/// Connection settings for the external template store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the platform API, e.g. `https://api.crm.example/v1`.
    pub base_url: String,
    /// Bearer credential.
    pub token: String,
    /// Account/location identifier the platform scopes templates by.
    pub location: String,
    /// Minimum delay before each request.
    pub request_delay: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// Header carrying the account/location identifier.
const LOCATION_HEADER: &str = "X-Location-Id";

/// TemplateStore over HTTP.
///
/// One instance issues requests strictly sequentially (the orchestrator never
/// overlaps calls), so the pre-request delay alone keeps us under the
/// platform's rate ceiling.
pub struct HttpTemplateStore {
    client: Client,
    base_url: String,
    token: String,
    location: String,
    throttle: Box<dyn Throttle>,
}

impl HttpTemplateStore {
    /// Build a client from config with the default fixed-delay throttle.
    ///
    /// # Errors
    ///
    /// Returns `ExternalApiError::Transport` if the underlying HTTP client
    /// cannot be constructed.
    pub fn connect(config: &StoreConfig) -> Result<Self, ExternalApiError> {
        Self::with_throttle(config, Box::new(FixedDelay::new(config.request_delay)))
    }

    /// Build a client with an explicit throttle strategy (tests use `NoDelay`).
    pub fn with_throttle(
        config: &StoreConfig,
        throttle: Box<dyn Throttle>,
    ) -> Result<Self, ExternalApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            location: config.location.clone(),
            throttle,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(LOCATION_HEADER, &self.location)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ExternalApiError> {
        self.throttle.pause().await;

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "template store request failed");
            return Err(ExternalApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TemplateStore for HttpTemplateStore {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, ExternalApiError> {
        tracing::debug!("GET /templates");
        self.send(self.request(Method::GET, "/templates")).await
    }

    async fn get_template(&self, id: &ExternalId) -> Result<TemplateRecord, ExternalApiError> {
        tracing::debug!(%id, "GET /templates/{{id}}");
        self.send(self.request(Method::GET, &format!("/templates/{id}")))
            .await
    }

    async fn create_template(
        &self,
        payload: &TemplatePayload,
    ) -> Result<TemplateRecord, ExternalApiError> {
        tracing::debug!(name = %payload.name, "POST /templates");
        self.send(self.request(Method::POST, "/templates").json(payload))
            .await
    }

    async fn update_template(
        &self,
        id: &ExternalId,
        payload: &TemplatePayload,
    ) -> Result<TemplateRecord, ExternalApiError> {
        tracing::debug!(%id, name = %payload.name, "PUT /templates/{{id}}");
        self.send(
            self.request(Method::PUT, &format!("/templates/{id}"))
                .json(payload),
        )
        .await
    }

    async fn delete_template(&self, id: &ExternalId) -> Result<(), ExternalApiError> {
        tracing::debug!(%id, "DELETE /templates/{{id}}");
        self.throttle.pause().await;

        let response = self
            .request(Method::DELETE, &format!("/templates/{id}"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
