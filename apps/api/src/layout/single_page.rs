//! Single-page fit heuristic: estimates rendered lines from the record alone
//! and trims list lengths when the estimate is over budget.
//!
//! # Rules
//! - each job: its points + 2 (title row and spacing)
//! - each project, each education entry: 1
//! - a non-empty summary: 2
//!
//! Pruning caps, applied in this order: points per job 2, jobs 3, projects 2,
//! education 2. Truncation keeps the original relative order.

use tracing::info;

use crate::models::ExtendedResume;

/// Estimates above this are pruned before the first render.
pub const OVERFLOW_THRESHOLD_LINES: usize = 28;

const MAX_POINTS: usize = 2;
const MAX_JOBS: usize = 3;
const MAX_PROJECTS: usize = 2;
const MAX_EDUCATION: usize = 2;

pub fn estimate_lines(record: &ExtendedResume) -> usize {
    let jobs: usize = record.experience.iter().map(|job| job.points.len() + 2).sum();
    let summary = if record.summary.trim().is_empty() { 0 } else { 2 };
    jobs + record.projects.len() + record.education.len() + summary
}

/// Structural copy with every list capped for a single page.
pub fn prune(record: &ExtendedResume) -> ExtendedResume {
    let mut pruned = record.clone();
    for job in &mut pruned.experience {
        job.points.truncate(MAX_POINTS);
    }
    pruned.experience.truncate(MAX_JOBS);
    pruned.projects.truncate(MAX_PROJECTS);
    pruned.education.truncate(MAX_EDUCATION);
    pruned
}

/// Prunes only when the estimate exceeds `OVERFLOW_THRESHOLD_LINES`.
pub fn fit_before_render(record: ExtendedResume) -> ExtendedResume {
    let estimate = estimate_lines(&record);
    if estimate <= OVERFLOW_THRESHOLD_LINES {
        return record;
    }
    let pruned = prune(&record);
    info!(
        "Estimated {estimate} lines (> {OVERFLOW_THRESHOLD_LINES}); pruned to {}",
        estimate_lines(&pruned)
    );
    pruned
}
