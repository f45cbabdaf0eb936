//! WTS2 configuration
//!
//! Read once at startup and passed by reference into every component. Values
//! come from an optional TOML file, then from the environment, which wins.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable names understood by [`Wts2Config::apply_env`].
pub mod env {
    pub const JIRA_BASE_URL: &str = "JIRA_BASE_URL";
    pub const JIRA_USER: &str = "JIRA_USER";
    pub const JIRA_TOKEN: &str = "JIRA_TOKEN";
    pub const SERVICE_DESK: &str = "WTS2_SERVICE_DESK";
    pub const REQUEST_TIMEOUT_SECS: &str = "WTS2_REQUEST_TIMEOUT_SECS";
    pub const PI_FIELD: &str = "PI_FIELD";
    pub const PI_PRI_FIELD: &str = "PI_PRI_FIELD";
    pub const WTS_DIR: &str = "WTS_DIR";
    pub const WTS_BASE_URL: &str = "WTS_BASE_URL";
    pub const PROJECTS_PATH: &str = "WTS2_PROJECTS_PATH";
    pub const TOP10_ID: &str = "TOP10_ID";
    pub const PAGE_SIZE: &str = "WTS2_PAGE_SIZE";
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Wts2Config {
    /// Jira connection.
    pub tracker: TrackerConfig,
    /// Custom field identifiers.
    pub fields: FieldConfig,
    /// Project directory tree.
    pub directories: DirectoryConfig,
    /// Top-10 renumbering.
    pub renumber: RenumberConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Jira site, e.g. `https://example.atlassian.net`.
    pub base_url: String,
    pub user: String,
    /// API token used as the basic-auth password.
    pub token: String,
    /// Service desk owning the top-10 queue.
    pub service_desk: String,
    /// Upper bound on any single tracker call.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// PI select field, e.g. `customfield_10200`.
    pub group: String,
    /// PI sort order field.
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Filesystem root holding `<bucket>/<key>` directories.
    pub root: PathBuf,
    /// Public site serving `root`.
    pub public_base_url: String,
    /// Path under `public_base_url` where `root` is mounted.
    pub projects_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenumberConfig {
    /// Top-10 queue identifier.
    pub queue_id: String,
    /// `maxResults` per search page. Jira caps this at 100.
    pub page_size: u32,
}

// ============================================================
// Defaults
// ============================================================

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            user: String::new(),
            token: String::new(),
            service_desk: "WTS2".into(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            public_base_url: String::new(),
            projects_path: "wts2_projects".into(),
        }
    }
}

impl Default for RenumberConfig {
    fn default() -> Self {
        Self {
            queue_id: String::new(),
            page_size: 50,
        }
    }
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .field("service_desk", &self.service_desk)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

// ============================================================
// Loading
// ============================================================

impl Wts2Config {
    /// Load from the process environment only.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay values from `lookup`. Unset or empty variables leave the
    /// current value in place.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::JIRA_BASE_URL) {
            self.tracker.base_url = v;
        }
        if let Some(v) = get(env::JIRA_USER) {
            self.tracker.user = v;
        }
        if let Some(v) = get(env::JIRA_TOKEN) {
            self.tracker.token = v;
        }
        if let Some(v) = get(env::SERVICE_DESK) {
            self.tracker.service_desk = v;
        }
        if let Some(v) = get(env::REQUEST_TIMEOUT_SECS) {
            self.tracker.request_timeout_secs = parse_number(env::REQUEST_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = get(env::PI_FIELD) {
            self.fields.group = v;
        }
        if let Some(v) = get(env::PI_PRI_FIELD) {
            self.fields.priority = v;
        }
        if let Some(v) = get(env::WTS_DIR) {
            self.directories.root = PathBuf::from(v);
        }
        if let Some(v) = get(env::WTS_BASE_URL) {
            self.directories.public_base_url = v;
        }
        if let Some(v) = get(env::PROJECTS_PATH) {
            self.directories.projects_path = v;
        }
        if let Some(v) = get(env::TOP10_ID) {
            self.renumber.queue_id = v;
        }
        if let Some(v) = get(env::PAGE_SIZE) {
            self.renumber.page_size = parse_number(env::PAGE_SIZE, &v)?;
        }
        Ok(())
    }

    /// Check that every value needed at runtime is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            (env::JIRA_BASE_URL, self.tracker.base_url.is_empty()),
            (env::JIRA_USER, self.tracker.user.is_empty()),
            (env::JIRA_TOKEN, self.tracker.token.is_empty()),
            (env::PI_FIELD, self.fields.group.is_empty()),
            (env::PI_PRI_FIELD, self.fields.priority.is_empty()),
            (env::WTS_DIR, self.directories.root.as_os_str().is_empty()),
            (env::WTS_BASE_URL, self.directories.public_base_url.is_empty()),
            (env::TOP10_ID, self.renumber.queue_id.is_empty()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, missing)| *missing) {
            return Err(Error::MissingConfig(*name));
        }
        if self.renumber.page_size == 0 {
            return Err(Error::config(format!("{} must be at least 1", env::PAGE_SIZE)));
        }
        if self.tracker.request_timeout_secs == 0 {
            return Err(Error::config(format!(
                "{} must be at least 1",
                env::REQUEST_TIMEOUT_SECS
            )));
        }
        Ok(())
    }

    /// Write the current config as TOML, token included.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl TrackerConfig {
    /// Base of the Jira platform REST API.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/api/latest", self.base_url.trim_end_matches('/'))
    }

    /// Base of the Jira Service Management REST API.
    pub fn servicedesk_url(&self) -> String {
        format!(
            "{}/rest/servicedeskapi/servicedesk/{}",
            self.base_url.trim_end_matches('/'),
            self.service_desk
        )
    }
}

impl DirectoryConfig {
    /// Public URL of the directory for `key` inside `bucket`.
    pub fn public_url(&self, bucket: u64, key: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.projects_path.trim_matches('/'),
            bucket,
            key
        )
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{} must be a number, got {:?}", name, value)))
}
