//! Renumbering: plan computation and application
//!
//! Within each PI, the new sort order is the 1-based position of the issue
//! once the group is ordered by its current sort order. Issues with equal
//! sort order keep the order in which the tracker returned them.

use crate::report::{ApplyResult, ApplyStatus};
use tracing::{debug, info, warn};
use wts2_core::{IssueRecord, PlanEntry};
use wts2_tracker::TrackerApi;

/// Assign contiguous priorities per group. Records without a group or a
/// priority are left out. Entries that need no change are still emitted.
pub fn compute_plan(records: &[IssueRecord]) -> Vec<PlanEntry> {
    let mut ranked: Vec<&IssueRecord> = records.iter().filter(|r| r.is_rankable()).collect();
    // sort_by is stable
    ranked.sort_by(|a, b| a.rank_cmp(b));

    let mut plan = Vec::with_capacity(ranked.len());
    let mut last_group: Option<&str> = None;
    let mut position = 0u32;

    for record in ranked {
        let (Some(group), Some(priority)) = (record.group.as_deref(), record.priority) else {
            continue;
        };
        if last_group == Some(group) {
            position += 1;
        } else {
            position = 1;
        }
        last_group = Some(group);

        plan.push(PlanEntry {
            key: record.key.clone(),
            group: group.to_string(),
            old_priority: priority,
            new_priority: position,
        });
    }
    plan
}

/// Apply `plan` in order, one remote write at a time.
///
/// Unchanged entries are always reported. A changed entry whose group does
/// not contain `group_filter` is skipped without a result. Rejected writes
/// are reported and do not stop the run.
pub async fn apply_plan(
    tracker: &dyn TrackerApi,
    plan: &[PlanEntry],
    group_filter: Option<&str>,
) -> Vec<ApplyResult> {
    let filter = group_filter.map(str::trim).filter(|f| !f.is_empty());
    let mut results = Vec::new();

    for entry in plan {
        let status = if entry.is_unchanged() {
            ApplyStatus::Unchanged
        } else if filter.is_some_and(|token| !entry.group_matches(token)) {
            debug!("Skipping {} ({}): outside filter", entry.key, entry.group);
            continue;
        } else {
            match tracker.update_priority(&entry.key, entry.new_priority).await {
                Ok(()) => {
                    info!(
                        "Set {} ({}) {} -> {}",
                        entry.key, entry.group, entry.old_priority, entry.new_priority
                    );
                    ApplyStatus::Set
                }
                Err(e) => {
                    warn!("Update of {} failed: {}", entry.key, e);
                    ApplyStatus::Error(e)
                }
            }
        };

        results.push(ApplyResult {
            key: entry.key.clone(),
            group: entry.group.clone(),
            priority: entry.new_priority,
            status,
        });
    }
    results
}
