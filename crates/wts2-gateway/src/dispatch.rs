//! Request dispatch
//!
//! A form is validated once into an [`Action`]; only then is any component
//! invoked. Every path ends in a [`Reply`].

use crate::provision::{DirectoryProvisioner, ProvisionOutcome};
use crate::reply::Reply;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use wts2_core::Wts2Config;
use wts2_renumber::RenumberJob;
use wts2_tracker::{JiraClient, TrackerApi, TrackerResult};

/// Inbound form fields.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionForm {
    pub cmd: Option<String>,
    pub key: Option<String>,
    /// PI token restricting which groups get updated.
    pub pi: Option<String>,
}

impl ActionForm {
    /// Fill fields missing from `self` with those of `other`.
    pub fn or(self, other: ActionForm) -> Self {
        Self {
            cmd: self.cmd.or(other.cmd),
            key: self.key.or(other.key),
            pi: self.pi.or(other.pi),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Renumber { group_filter: Option<String> },
    NewDirectory { key: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("No action.")]
    NoAction,
    #[error("No key.")]
    NoKey,
}

impl ActionError {
    pub fn into_reply(self) -> Reply {
        match self {
            Self::NoAction => Reply::no_action(),
            Self::NoKey => Reply::Json(ProvisionOutcome::error(self.to_string()).to_json()),
        }
    }
}

impl Action {
    /// `fallback_filter` is used when the form carries no `pi` field.
    pub fn from_form(form: ActionForm, fallback_filter: Option<&str>) -> Result<Self, ActionError> {
        match form.cmd.as_deref().map(str::trim) {
            Some("renumber") => {
                let group_filter = form
                    .pi
                    .as_deref()
                    .or(fallback_filter)
                    .map(|f| f.trim().to_lowercase())
                    .filter(|f| !f.is_empty());
                Ok(Self::Renumber { group_filter })
            }
            Some("new") => match form.key {
                Some(key) if !key.trim().is_empty() => Ok(Self::NewDirectory { key }),
                _ => Err(ActionError::NoKey),
            },
            _ => Err(ActionError::NoAction),
        }
    }
}

/// Routes actions to the renumber job and the directory provisioner.
pub struct Dispatcher {
    renumber: RenumberJob,
    provisioner: DirectoryProvisioner,
}

impl Dispatcher {
    pub fn new(tracker: Arc<dyn TrackerApi>, config: &Wts2Config) -> Self {
        Self {
            renumber: RenumberJob::new(tracker.clone(), config),
            provisioner: DirectoryProvisioner::new(tracker, &config.directories),
        }
    }

    /// Dispatcher talking to the configured Jira site.
    pub fn from_config(config: &Wts2Config) -> TrackerResult<Self> {
        let client = JiraClient::new(&config.tracker, &config.fields)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub async fn dispatch(&self, form: ActionForm, fallback_filter: Option<&str>) -> Reply {
        match Action::from_form(form, fallback_filter) {
            Ok(action) => self.run(action).await,
            Err(e) => {
                info!("Rejected request: {}", e);
                e.into_reply()
            }
        }
    }

    pub async fn run(&self, action: Action) -> Reply {
        info!("Running {:?}", action);
        match action {
            Action::Renumber { group_filter } => {
                let report = self.renumber.run(group_filter.as_deref()).await;
                Reply::transcript(&report.transcript_lines())
            }
            Action::NewDirectory { key } => {
                let outcome = self.provisioner.make_directory(&key).await;
                Reply::Json(outcome.to_json())
            }
        }
    }
}

/// Reply for a request that could not be served at all, e.g. when the
/// configuration is unusable. Matches the content type the action expects.
pub fn failure_reply(form: &ActionForm, message: &str) -> Reply {
    match form.cmd.as_deref() {
        Some("new") => Reply::Json(ProvisionOutcome::error(message).to_json()),
        _ => Reply::Html(message.to_string()),
    }
}
