//! Tracker API trait

use crate::types::SearchPage;
use wts2_core::IssueKey;

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Tracker error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackerError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    /// Update rejected by the tracker. Formats as `<status> <body> <reason>`.
    #[error("{status_code} {body} {reason}")]
    Update {
        status_code: u16,
        body: String,
        reason: String,
    },
}

impl TrackerError {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Protocol(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Remote issue tracker.
///
/// Every call is a single request; nothing is retried.
#[async_trait::async_trait]
pub trait TrackerApi: Send + Sync {
    fn name(&self) -> &str;

    /// One page of a JQL search, returning only `fields`.
    async fn fetch_page(
        &self,
        jql: &str,
        fields: &[&str],
        start_at: u32,
        max_results: u32,
    ) -> TrackerResult<SearchPage>;

    /// Write the sort order field of one issue.
    async fn update_priority(&self, key: &IssueKey, value: u32) -> TrackerResult<()>;

    /// Whether the tracker knows `key` under exactly that spelling. Failures
    /// of any kind count as "not found".
    async fn validate_issue_key(&self, key: &IssueKey) -> bool;

    /// The JQL behind a saved queue.
    async fn queue_jql(&self, queue_id: &str) -> TrackerResult<String>;
}
