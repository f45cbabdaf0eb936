//! Paginated retrieval of the top-10 queue

use tracing::debug;
use wts2_core::{FieldConfig, IssueRecord};
use wts2_tracker::{TrackerApi, TrackerResult};

/// Fetch every issue matching `jql`, keeping only those with both a PI and
/// a sort order, in the order the tracker returned them.
///
/// `jql` is resolved by the caller and reused for every page.
pub async fn fetch_top_ten(
    tracker: &dyn TrackerApi,
    jql: &str,
    fields: &FieldConfig,
    page_size: u32,
) -> TrackerResult<Vec<IssueRecord>> {
    let page_size = page_size.max(1);
    let field_list = [fields.group.as_str(), fields.priority.as_str()];
    let mut records = Vec::new();
    let mut start_at = 0u32;

    loop {
        let page = tracker
            .fetch_page(jql, &field_list, start_at, page_size)
            .await?;
        let fetched = page.issues.len();
        debug!(
            "Page at {}: {} issues of {} total",
            start_at, fetched, page.total
        );

        records.extend(
            page.issues
                .iter()
                .map(|issue| issue.to_record(fields))
                .filter(IssueRecord::is_rankable),
        );

        // Jira may return fewer than `maxResults`; continue after the last
        // issue actually received. An empty page means `total` is unreachable.
        start_at = start_at.saturating_add(fetched as u32);
        if start_at >= page.total || fetched == 0 {
            break;
        }
    }
    Ok(records)
}
