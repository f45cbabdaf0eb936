//! Jira wire types

use serde::Deserialize;
use serde_json::{Map, Value};
use wts2_core::{FieldConfig, IssueRecord};

/// One page of `/search` results.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<RawIssue>,
    pub total: u32,
}

/// An issue as returned by search, with only the requested fields.
#[derive(Clone, Debug, Deserialize)]
pub struct RawIssue {
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawIssue {
    pub fn new(key: impl Into<String>, fields: Value) -> Self {
        Self {
            key: key.into(),
            fields: match fields {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    /// Extract (key, PI, sort order). A select field arrives as
    /// `{"value": "..."}`; a plain string is taken as-is.
    pub fn to_record(&self, fields: &FieldConfig) -> IssueRecord {
        let group = match self.fields.get(&fields.group) {
            Some(Value::Object(option)) => option
                .get("value")
                .and_then(Value::as_str)
                .map(str::to_string),
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        };
        let priority = self.fields.get(&fields.priority).and_then(Value::as_f64);
        IssueRecord::new(self.key.as_str(), group, priority)
    }
}

/// `/servicedesk/{id}/queue/{queue}` response.
#[derive(Clone, Debug, Deserialize)]
pub struct QueueDefinition {
    pub jql: String,
}

/// `/issue/{key}?fields=key` response.
#[derive(Clone, Debug, Deserialize)]
pub struct IssueRef {
    pub key: String,
}
