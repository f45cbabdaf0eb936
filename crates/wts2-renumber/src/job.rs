//! A full renumber run: resolve, retrieve, plan, apply

use crate::engine::{apply_plan, compute_plan};
use crate::report::RenumberReport;
use crate::retrieve::fetch_top_ten;
use std::sync::Arc;
use tracing::{error, info};
use wts2_core::{FieldConfig, Wts2Config};
use wts2_tracker::{QueueResolver, TrackerApi};

pub struct RenumberJob {
    tracker: Arc<dyn TrackerApi>,
    fields: FieldConfig,
    queue_id: String,
    page_size: u32,
}

impl RenumberJob {
    pub fn new(tracker: Arc<dyn TrackerApi>, config: &Wts2Config) -> Self {
        Self {
            tracker,
            fields: config.fields.clone(),
            queue_id: config.renumber.queue_id.clone(),
            page_size: config.renumber.page_size,
        }
    }

    /// Run once. Failing to read the queue or the search results ends the
    /// run before any update; per-issue update failures do not.
    pub async fn run(&self, group_filter: Option<&str>) -> RenumberReport {
        info!(
            "Renumbering queue {} via {} (filter: {:?})",
            self.queue_id,
            self.tracker.name(),
            group_filter
        );

        let resolver = QueueResolver::new(self.tracker.clone(), self.queue_id.as_str());
        let jql = match resolver.resolve_filter_expression().await {
            Ok(jql) => jql,
            Err(e) => {
                error!("Queue {} could not be resolved: {}", self.queue_id, e);
                return RenumberReport::failed(e);
            }
        };

        let records =
            match fetch_top_ten(self.tracker.as_ref(), jql, &self.fields, self.page_size).await {
                Ok(records) => records,
                Err(e) => {
                    error!("Top-10 retrieval failed: {}", e);
                    return RenumberReport::failed(e);
                }
            };

        let plan = compute_plan(&records);
        info!("Retrieved {} ranked issues", plan.len());

        let results = apply_plan(self.tracker.as_ref(), &plan, group_filter).await;
        let report = RenumberReport {
            results,
            failure: None,
        };
        info!(
            "Renumber complete: {} set, {} unchanged, {} errors",
            report.set_count(),
            report.unchanged_count(),
            report.error_count()
        );
        report
    }
}
