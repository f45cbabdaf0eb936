//! Queue resolution: saved queue id to JQL

use crate::provider::{TrackerApi, TrackerError, TrackerResult};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Resolves the top-10 queue to its JQL at most once.
///
/// Build one per renumber run; every page fetch of that run shares the
/// resolved expression. A failed lookup is not remembered.
pub struct QueueResolver {
    tracker: Arc<dyn TrackerApi>,
    queue_id: String,
    jql: OnceCell<String>,
}

impl QueueResolver {
    pub fn new(tracker: Arc<dyn TrackerApi>, queue_id: impl Into<String>) -> Self {
        Self {
            tracker,
            queue_id: queue_id.into(),
            jql: OnceCell::new(),
        }
    }

    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }

    pub async fn resolve_filter_expression(&self) -> TrackerResult<&str> {
        let jql = self
            .jql
            .get_or_try_init(|| async {
                let jql = self.tracker.queue_jql(&self.queue_id).await?;
                info!("Queue {} resolved to: {}", self.queue_id, jql);
                Ok::<_, TrackerError>(jql)
            })
            .await?;
        Ok(jql.as_str())
    }
}
