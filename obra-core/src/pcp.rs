//! PCP aggregation: completion breakdowns over a week's task records.
//!
//! PCP (Percentage of Plan Complete) is the ratio of fully-completed planned
//! tasks to total planned tasks. Tasks with nothing planned contribute to no
//! ratio and are filtered out before any counting.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::task::Task;

/// Bucket key for tasks whose label field is empty. Unassigned work is
/// aggregated, never dropped.
pub const UNASSIGNED_BUCKET: &str = "undefined";

/// Counts and ratio for one bucket of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Unrounded, in [0, 100]. Rounding is a display concern; callers round.
    pub percentage: f64,
}

impl BucketStats {
    fn from_counts(total_tasks: usize, completed_tasks: usize) -> Self {
        let percentage = if total_tasks == 0 {
            0.0
        } else {
            100.0 * completed_tasks as f64 / total_tasks as f64
        };
        Self {
            total_tasks,
            completed_tasks,
            percentage,
        }
    }
}

/// Overall PCP plus per-category sub-aggregates.
///
/// Map key order carries no meaning; `BTreeMap` just keeps rendered output
/// stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    pub overall: BucketStats,
    pub by_sector: BTreeMap<String, BucketStats>,
    pub by_discipline: BTreeMap<String, BucketStats>,
    pub by_team: BTreeMap<String, BucketStats>,
    pub by_responsible: BTreeMap<String, BucketStats>,
    pub by_executor: BTreeMap<String, BucketStats>,
}

fn bucket_key(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        UNASSIGNED_BUCKET.to_string()
    } else {
        label.to_string()
    }
}

/// Group `tasks` by a label accessor and aggregate each bucket like the
/// overall calculation. One helper for all five categories.
fn aggregate_by<'a, F>(tasks: &[&'a Task], label: F) -> BTreeMap<String, BucketStats>
where
    F: Fn(&'a Task) -> &'a str,
{
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for &t in tasks {
        let entry = counts.entry(bucket_key(label(t))).or_default();
        entry.0 += 1;
        if t.is_fully_completed {
            entry.1 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(k, (total, done))| (k, BucketStats::from_counts(total, done)))
        .collect()
}

/// Compute the full breakdown for one week's tasks.
///
/// The completion signal is `is_fully_completed` exclusively. An empty
/// qualifying set yields the all-zero breakdown, which is a defined base
/// case rather than an error.
pub fn compute_breakdown(tasks: &[Task]) -> Breakdown {
    let qualifying: Vec<&Task> = tasks.iter().filter(|t| t.has_plan()).collect();
    if qualifying.is_empty() {
        return Breakdown::default();
    }

    let completed = qualifying.iter().filter(|t| t.is_fully_completed).count();

    Breakdown {
        overall: BucketStats::from_counts(qualifying.len(), completed),
        by_sector: aggregate_by(&qualifying, |t| t.sector.as_str()),
        by_discipline: aggregate_by(&qualifying, |t| t.discipline.as_str()),
        by_team: aggregate_by(&qualifying, |t| t.team.as_str()),
        by_responsible: aggregate_by(&qualifying, |t| t.responsible.as_str()),
        by_executor: aggregate_by(&qualifying, |t| t.executor.as_str()),
    }
}

/// Count not-fully-completed qualifying tasks by their recorded cause.
/// Tasks without a cause land in the "undefined" bucket.
pub fn cause_summary(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for t in tasks.iter().filter(|t| t.has_plan() && !t.is_fully_completed) {
        let key = bucket_key(t.cause_if_not_done.as_deref().unwrap_or(""));
        *counts.entry(key).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{DayStatus, PlanDay};
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn done_task(id: &str, sector: &str, days: &[PlanDay]) -> Task {
        let mut t = Task::new(id, monday())
            .with_sector(sector)
            .with_planned_days(days);
        for d in days.to_vec() {
            t.set_day_status(d, DayStatus::Completed).unwrap();
        }
        t
    }

    fn open_task(id: &str, sector: &str, days: &[PlanDay]) -> Task {
        Task::new(id, monday())
            .with_sector(sector)
            .with_planned_days(days)
    }

    #[test]
    fn empty_input_yields_zero_breakdown() {
        let b = compute_breakdown(&[]);
        assert_eq!(b.overall, BucketStats::default());
        assert!(b.by_sector.is_empty());
        assert!(b.by_executor.is_empty());
    }

    #[test]
    fn unplanned_tasks_are_excluded_from_ratios() {
        // Mirror of the canonical scenario: two Fundação tasks (one done),
        // one Alvenaria task with an empty plan.
        let tasks = vec![
            done_task("t1", "Fundação", &[PlanDay::Mon, PlanDay::Tue]),
            open_task("t2", "Fundação", &[PlanDay::Wed]),
            open_task("t3", "Alvenaria", &[]),
        ];

        let b = compute_breakdown(&tasks);
        assert_eq!(b.overall.total_tasks, 2);
        assert_eq!(b.overall.completed_tasks, 1);
        assert_eq!(b.overall.percentage, 50.0);

        let fundacao = &b.by_sector["Fundação"];
        assert_eq!(fundacao.total_tasks, 2);
        assert_eq!(fundacao.percentage, 50.0);

        // No qualifying tasks, so the sector never appears.
        assert!(!b.by_sector.contains_key("Alvenaria"));
    }

    #[test]
    fn empty_labels_aggregate_under_undefined() {
        let tasks = vec![
            done_task("t1", "", &[PlanDay::Mon]),
            open_task("t2", "  ", &[PlanDay::Tue]),
        ];

        let b = compute_breakdown(&tasks);
        let bucket = &b.by_sector[UNASSIGNED_BUCKET];
        assert_eq!(bucket.total_tasks, 2);
        assert_eq!(bucket.completed_tasks, 1);
        assert_eq!(b.by_sector.len(), 1);
    }

    #[test]
    fn percentage_is_exact_and_unrounded() {
        let tasks = vec![
            done_task("t1", "A", &[PlanDay::Mon]),
            open_task("t2", "A", &[PlanDay::Tue]),
            open_task("t3", "A", &[PlanDay::Wed]),
        ];
        let b = compute_breakdown(&tasks);
        assert!((b.overall.percentage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn completed_never_exceeds_total_in_any_bucket() {
        let tasks = vec![
            done_task("t1", "A", &[PlanDay::Mon]),
            done_task("t2", "B", &[PlanDay::Mon]),
            open_task("t3", "A", &[PlanDay::Tue]),
        ];
        let b = compute_breakdown(&tasks);
        for stats in b.by_sector.values() {
            assert!(stats.completed_tasks <= stats.total_tasks);
        }
        assert_eq!(b.overall.total_tasks, 3);
        assert_eq!(b.overall.completed_tasks, 2);
    }

    #[test]
    fn breakdown_is_deterministic() {
        let tasks = vec![
            done_task("t1", "A", &[PlanDay::Mon]),
            open_task("t2", "B", &[PlanDay::Tue]),
            open_task("t3", "", &[PlanDay::Wed]),
        ];
        assert_eq!(compute_breakdown(&tasks), compute_breakdown(&tasks));
    }

    #[test]
    fn all_five_categories_are_grouped_independently() {
        let t = Task::new("t1", monday())
            .with_sector("Fundação")
            .with_discipline("Concreto")
            .with_team("Equipe A")
            .with_responsible("Marcos")
            .with_executor("João")
            .with_planned_days(&[PlanDay::Mon]);
        let b = compute_breakdown(&[t]);
        assert!(b.by_sector.contains_key("Fundação"));
        assert!(b.by_discipline.contains_key("Concreto"));
        assert!(b.by_team.contains_key("Equipe A"));
        assert!(b.by_responsible.contains_key("Marcos"));
        assert!(b.by_executor.contains_key("João"));
    }

    #[test]
    fn cause_summary_counts_open_tasks_only() {
        let mut late = open_task("t1", "A", &[PlanDay::Mon]);
        late.cause_if_not_done = Some("Chuva".to_string());
        let tasks = vec![
            late,
            done_task("t2", "A", &[PlanDay::Mon]),
            open_task("t3", "A", &[PlanDay::Tue]),
            open_task("t4", "A", &[]),
        ];

        let causes = cause_summary(&tasks);
        assert_eq!(causes["Chuva"], 1);
        assert_eq!(causes[UNASSIGNED_BUCKET], 1);
        assert_eq!(causes.len(), 2);
    }
}
