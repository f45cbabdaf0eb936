//! WTS2 Renumber - per-PI re-sequencing of the top-10 queue

pub mod engine;
pub mod job;
pub mod report;
pub mod retrieve;

pub use engine::{apply_plan, compute_plan};
pub use job::RenumberJob;
pub use report::{ApplyResult, ApplyStatus, RenumberReport};
pub use retrieve::fetch_top_ten;
