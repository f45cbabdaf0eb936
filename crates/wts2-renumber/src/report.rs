//! Outcome of applying a renumber plan

use wts2_core::IssueKey;
use wts2_tracker::TrackerError;

#[derive(Clone, Debug, PartialEq)]
pub enum ApplyStatus {
    /// Already at its target; nothing was written.
    Unchanged,
    Set,
    Error(TrackerError),
}

/// What happened to one plan entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplyResult {
    pub key: IssueKey,
    pub group: String,
    /// Target priority.
    pub priority: u32,
    pub status: ApplyStatus,
}

impl ApplyResult {
    pub fn is_error(&self) -> bool {
        matches!(self.status, ApplyStatus::Error(_))
    }
}

/// Transcript line, e.g. `Set: WTS2-4 PI 24.1 2`.
impl std::fmt::Display for ApplyResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.status {
            ApplyStatus::Unchanged => {
                write!(f, "Unchanged: {} {} {}", self.key, self.group, self.priority)
            }
            ApplyStatus::Set => write!(f, "Set: {} {} {}", self.key, self.group, self.priority),
            ApplyStatus::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

/// One renumber run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenumberReport {
    pub results: Vec<ApplyResult>,
    /// Set when the queue or search could not be read; no updates were made.
    pub failure: Option<TrackerError>,
}

impl RenumberReport {
    pub fn failed(error: TrackerError) -> Self {
        Self {
            results: Vec::new(),
            failure: Some(error),
        }
    }

    pub fn set_count(&self) -> usize {
        self.count(|s| matches!(s, ApplyStatus::Set))
    }

    pub fn unchanged_count(&self) -> usize {
        self.count(|s| matches!(s, ApplyStatus::Unchanged))
    }

    pub fn error_count(&self) -> usize {
        self.count(|s| matches!(s, ApplyStatus::Error(_))) + usize::from(self.failure.is_some())
    }

    fn count(&self, pred: impl Fn(&ApplyStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }

    /// One line per result in plan order, followed by the run failure if any.
    pub fn transcript_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.results.iter().map(ToString::to_string).collect();
        if let Some(e) = &self.failure {
            lines.push(format!("Error: {}", e));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: ApplyStatus) -> ApplyResult {
        ApplyResult {
            key: "WTS2-4".into(),
            group: "PI 24.1".into(),
            priority: 2,
            status,
        }
    }

    #[test]
    fn transcript_line_formats() {
        assert_eq!(result(ApplyStatus::Unchanged).to_string(), "Unchanged: WTS2-4 PI 24.1 2");
        assert_eq!(result(ApplyStatus::Set).to_string(), "Set: WTS2-4 PI 24.1 2");
        let rejected = ApplyStatus::Error(TrackerError::Update {
            status_code: 403,
            body: "nope".into(),
            reason: "Forbidden".into(),
        });
        assert_eq!(result(rejected).to_string(), "Error: 403 nope Forbidden");
    }

    #[test]
    fn failure_counts_and_is_listed_last() {
        let report = RenumberReport {
            results: vec![result(ApplyStatus::Set)],
            failure: Some(TrackerError::Transport("timed out".into())),
        };
        assert_eq!(report.set_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.transcript_lines().last().map(String::as_str),
            Some("Error: transport error: timed out")
        );
    }
}
