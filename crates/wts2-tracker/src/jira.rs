//! Jira REST client using basic auth

use crate::provider::{TrackerApi, TrackerError, TrackerResult};
use crate::types::{IssueRef, QueueDefinition, SearchPage};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use wts2_core::{FieldConfig, IssueKey, TrackerConfig};

pub struct JiraClient {
    client: Client,
    rest_url: String,
    servicedesk_url: String,
    user: String,
    token: String,
    priority_field: String,
}

impl JiraClient {
    pub fn new(tracker: &TrackerConfig, fields: &FieldConfig) -> TrackerResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(tracker.request_timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            rest_url: tracker.rest_url(),
            servicedesk_url: tracker.servicedesk_url(),
            user: tracker.user.clone(),
            token: tracker.token.clone(),
            priority_field: fields.priority.clone(),
        })
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.user, Some(&self.token))
    }

    /// Send a read and decode its JSON body. Non-success statuses are
    /// protocol errors: the body is not the shape we asked for.
    async fn read_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> TrackerResult<T> {
        let response = self.authed(request).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("Jira {} returned {}: {}", operation, status, text);
            return Err(TrackerError::protocol(format!(
                "{} returned {}: {}",
                operation, status, text
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| TrackerError::protocol(format!("{}: {}", operation, e)))
    }
}

#[async_trait::async_trait]
impl TrackerApi for JiraClient {
    fn name(&self) -> &str {
        "jira"
    }

    async fn fetch_page(
        &self,
        jql: &str,
        fields: &[&str],
        start_at: u32,
        max_results: u32,
    ) -> TrackerResult<SearchPage> {
        debug!("Jira search: startAt={} maxResults={}", start_at, max_results);
        let request = self.client.get(format!("{}/search", self.rest_url)).query(&[
            ("jql", jql.to_string()),
            ("fields", fields.join(",")),
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
        ]);
        self.read_json("search", request).await
    }

    async fn update_priority(&self, key: &IssueKey, value: u32) -> TrackerResult<()> {
        let mut fields = serde_json::Map::new();
        fields.insert(self.priority_field.clone(), value.into());
        let body = serde_json::json!({ "fields": fields });
        let request = self
            .client
            .put(format!("{}/issue/{}", self.rest_url, key))
            .json(&body);
        let response = self.authed(request).send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            debug!("Jira update {}: {}={}", key, self.priority_field, value);
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        warn!("Jira update {} rejected {}: {}", key, status, text);
        Err(TrackerError::Update {
            status_code: status.as_u16(),
            body: text,
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }

    async fn validate_issue_key(&self, key: &IssueKey) -> bool {
        let request = self
            .client
            .get(format!("{}/issue/{}", self.rest_url, key))
            .query(&[("fields", "key")]);
        match self.read_json::<IssueRef>("issue lookup", request).await {
            Ok(found) => found.key == key.as_str(),
            Err(e) => {
                debug!("Key {} did not validate: {}", key, e);
                false
            }
        }
    }

    async fn queue_jql(&self, queue_id: &str) -> TrackerResult<String> {
        let request = self
            .client
            .get(format!("{}/queue/{}", self.servicedesk_url, queue_id));
        let queue: QueueDefinition = self.read_json("queue lookup", request).await?;
        Ok(queue.jql)
    }
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("rest_url", &self.rest_url)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
