//! Core types for WTS2

use crate::error::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Z][A-Z0-9_]*)-([0-9]+)$").expect("static regex"))
}

/// Jira issue key (`<PROJECT>-<number>`) - cheaply cloneable
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct IssueKey(Arc<str>);

impl IssueKey {
    /// Wraps a key as returned by the tracker. No format check is made.
    pub fn new(s: impl Into<String>) -> Self {
        Self(Arc::from(s.into()))
    }

    /// Parses user-supplied input, accepting only `<PROJECT>-<number>`.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if key_pattern().is_match(trimmed) {
            Ok(Self::new(trimmed))
        } else {
            Err(Error::invalid_key(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn project(&self) -> Option<&str> {
        self.0.rsplit_once('-').map(|(project, _)| project)
    }

    /// Numeric suffix of the key, e.g. `250` for `WTS2-250`.
    pub fn number(&self) -> Option<u64> {
        self.0
            .rsplit_once('-')
            .and_then(|(_, number)| number.parse().ok())
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssueKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for IssueKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One issue of the top-10 queue as retrieved from the tracker.
///
/// `group` is the PI label and `priority` the current sort order. Either may
/// be absent, in which case the record takes no part in renumbering.
#[derive(Clone, Debug, PartialEq)]
pub struct IssueRecord {
    pub key: IssueKey,
    pub group: Option<String>,
    pub priority: Option<f64>,
}

impl IssueRecord {
    pub fn new(key: impl Into<IssueKey>, group: Option<String>, priority: Option<f64>) -> Self {
        Self {
            key: key.into(),
            group,
            priority,
        }
    }

    /// Record with both group and priority present.
    pub fn ranked(key: impl Into<IssueKey>, group: impl Into<String>, priority: f64) -> Self {
        Self::new(key, Some(group.into()), Some(priority))
    }

    pub fn is_rankable(&self) -> bool {
        self.group.is_some() && self.priority.is_some()
    }

    /// Ordering used by renumbering: group label, then priority.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.group.cmp(&other.group).then_with(|| {
            let a = self.priority.unwrap_or(f64::INFINITY);
            let b = other.priority.unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        })
    }
}

/// A computed renumbering step for one issue.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanEntry {
    pub key: IssueKey,
    pub group: String,
    pub old_priority: f64,
    pub new_priority: u32,
}

impl PlanEntry {
    pub fn is_unchanged(&self) -> bool {
        self.old_priority == f64::from(self.new_priority)
    }

    /// Whether the group label contains `token` as a whitespace-separated word,
    /// compared case-insensitively.
    pub fn group_matches(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.group
            .to_lowercase()
            .split_whitespace()
            .any(|word| word == token)
    }
}
