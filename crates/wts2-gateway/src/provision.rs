//! Project directory provisioning
//!
//! Each issue gets `<root>/<bucket>/<key>`, where the bucket groups keys by
//! hundreds: `WTS2-250` lives in `200/`.

use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use wts2_core::{DirectoryConfig, IssueKey};
use wts2_tracker::TrackerApi;

/// Bucket directory for an issue number.
pub fn bucket_for(number: u64) -> u64 {
    number / 100 * 100
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProvisionOutcome {
    pub success: bool,
    /// Public link, present on success.
    pub url: Option<String>,
    pub message: String,
}

impl ProvisionOutcome {
    pub fn success(url: String, message: impl Into<String>) -> Self {
        Self {
            success: true,
            url: Some(url),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "status": if self.success { "success" } else { "error" },
            "message": self.message,
        });
        if let Some(url) = &self.url {
            value["url"] = json!(url);
        }
        value
    }
}

pub struct DirectoryProvisioner {
    tracker: Arc<dyn TrackerApi>,
    dirs: DirectoryConfig,
}

impl DirectoryProvisioner {
    pub fn new(tracker: Arc<dyn TrackerApi>, dirs: &DirectoryConfig) -> Self {
        Self {
            tracker,
            dirs: dirs.clone(),
        }
    }

    /// `<root>/<bucket>/<key>` for a parsed key.
    pub fn target(&self, key: &IssueKey) -> Option<(u64, PathBuf)> {
        let bucket = bucket_for(key.number()?);
        let path = self.dirs.root.join(bucket.to_string()).join(key.as_str());
        Some((bucket, path))
    }

    /// Validate `raw_key` and create its directory if missing. Running it
    /// again for the same key changes nothing on disk.
    pub async fn make_directory(&self, raw_key: &str) -> ProvisionOutcome {
        let invalid = || ProvisionOutcome::error(format!("Invalid key: {}", raw_key));

        let Ok(key) = IssueKey::parse(raw_key) else {
            warn!("Rejected malformed key {:?}", raw_key);
            return invalid();
        };
        if !self.tracker.validate_issue_key(&key).await {
            warn!("Key {} not found in {}", key, self.tracker.name());
            return invalid();
        }
        let Some((bucket, path)) = self.target(&key) else {
            return invalid();
        };
        let url = self.dirs.public_url(bucket, key.as_str());

        if tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return ProvisionOutcome::success(url, "Directory exists.");
        }

        match tokio::fs::create_dir_all(&path).await {
            Ok(()) => {
                info!("Created {}", path.display());
                ProvisionOutcome::success(url, "Directory created.")
            }
            Err(e) => {
                warn!("Cannot create {}: {}", path.display(), e);
                ProvisionOutcome::error(format!("Invalid key: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_for() {
        assert_eq!(bucket_for(0), 0);
        assert_eq!(bucket_for(99), 0);
        assert_eq!(bucket_for(100), 100);
        assert_eq!(bucket_for(250), 200);
        assert_eq!(bucket_for(1999), 1900);
    }

    #[test]
    fn test_outcome_json() {
        let ok = ProvisionOutcome::success("https://x/200/WTS2-250".into(), "Directory created.");
        assert_eq!(
            ok.to_json(),
            json!({"status": "success", "url": "https://x/200/WTS2-250", "message": "Directory created."})
        );
        let err = ProvisionOutcome::error("Invalid key: X");
        assert_eq!(err.to_json(), json!({"status": "error", "message": "Invalid key: X"}));
    }
}
