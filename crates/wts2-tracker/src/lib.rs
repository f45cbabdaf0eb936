//! WTS2 Tracker - Jira REST client, search pagination, and queue resolution

pub mod jira;
pub mod provider;
pub mod queue;
pub mod types;

pub use jira::JiraClient;
pub use provider::{TrackerApi, TrackerError, TrackerResult};
pub use queue::QueueResolver;
pub use types::*;
