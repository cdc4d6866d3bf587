//! Projection of the task tree into chart rows and dependency links.
//!
//! Rows come out in tree pre-order. Each task's `dependencies` field lists
//! the ids it waits on; each listed id becomes a finish-to-start link
//! (`type "0"`) from that task to this one. Tokens that are not ids, and ids
//! that are not in the project, are skipped and reported as warnings. A
//! cycle among the links is reported the same way; the chart still renders.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use super::arena::TaskArena;
use super::cycle;
use super::duration::business_days;
use super::status::derive_status;
use crate::models::TaskStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttTask {
    pub id: i64,
    pub text: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Business days.
    pub duration: i64,
    /// 0.0 to 1.0.
    pub progress: f64,
    /// 0 for top-level tasks.
    pub parent: i64,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub open: bool,
    #[serde(skip)]
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttLink {
    pub id: i64,
    pub source: i64,
    pub target: i64,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GanttChart {
    pub data: Vec<GanttTask>,
    pub links: Vec<GanttLink>,
    pub warnings: Vec<String>,
}

pub fn project(arena: &TaskArena, today: NaiveDate) -> GanttChart {
    let mut chart = GanttChart::default();

    for (depth, task) in arena.flatten_with_depth() {
        let has_children = arena.has_children(task.id);
        chart.data.push(GanttTask {
            id: task.id,
            text: task.name.clone(),
            start_date: task.start_date,
            end_date: task.end_date,
            duration: business_days(task.start_date, task.end_date),
            progress: f64::from(task.progress.min(100)) / 100.0,
            parent: task.parent_id.unwrap_or(0),
            status: derive_status(task, today),
            kind: if has_children { "project" } else { "task" },
            open: true,
            depth,
        });

        let Some(deps) = task.dependencies.as_deref() else {
            continue;
        };
        let mut seen = HashSet::new();
        for token in deps.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let source = match token.parse::<i64>() {
                Ok(id) => id,
                Err(_) => {
                    warn!(task = task.id, token, "skipping malformed dependency");
                    chart
                        .warnings
                        .push(format!("Task {}: ignored dependency '{token}'", task.id));
                    continue;
                }
            };
            if source == task.id || !arena.contains(source) {
                warn!(task = task.id, source, "skipping dependency on unknown task");
                chart
                    .warnings
                    .push(format!("Task {}: ignored dependency on task {source}", task.id));
                continue;
            }
            if !seen.insert(source) {
                continue;
            }
            chart.links.push(GanttLink {
                id: chart.links.len() as i64 + 1,
                source,
                target: task.id,
                kind: "0",
            });
        }
    }

    let nodes: Vec<i64> = chart.data.iter().map(|t| t.id).collect();
    let edges: Vec<(i64, i64)> = chart.links.iter().map(|l| (l.target, l.source)).collect();
    if let Err(e) = cycle::detect_cycle(&nodes, &edges) {
        warn!("{}", e.message);
        chart.warnings.push(format!("Dependency links: {}", e.message));
    }

    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::arena::tests::task;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_durations_from_business_days() {
        let mut a = task(1, None);
        a.start_date = Some(d(2024, 1, 1));
        a.end_date = Some(d(2024, 1, 5));
        let mut b = task(2, None);
        b.start_date = Some(d(2024, 1, 5));
        b.end_date = Some(d(2024, 1, 8));
        let chart = project(&TaskArena::from_records(vec![a, b]), d(2024, 1, 1));
        assert_eq!(chart.data[0].duration, 5);
        assert_eq!(chart.data[1].duration, 2);
    }

    #[test]
    fn test_rows_carry_parent_kind_and_progress() {
        let mut child = task(2, Some(1));
        child.progress = 40;
        let chart = project(&TaskArena::from_records(vec![task(1, None), child]), d(2024, 1, 1));
        assert_eq!(chart.data[0].kind, "project");
        assert_eq!(chart.data[0].parent, 0);
        assert_eq!(chart.data[1].kind, "task");
        assert_eq!(chart.data[1].parent, 1);
        assert!((chart.data[1].progress - 0.4).abs() < 1e-9);
        assert_eq!(chart.data[1].depth, 1);
    }

    #[test]
    fn test_status_is_derived() {
        let mut t = task(1, None);
        t.start_date = Some(d(2024, 1, 1));
        let chart = project(&TaskArena::from_records(vec![t]), d(2024, 2, 1));
        assert_eq!(chart.data[0].status, TaskStatus::Delayed);
    }

    #[test]
    fn test_links_parsed_and_bad_tokens_skipped() {
        let mut c = task(3, None);
        c.dependencies = Some("1, 2,,x, 99, 1".into());
        let chart = project(
            &TaskArena::from_records(vec![task(1, None), task(2, None), c]),
            d(2024, 1, 1),
        );
        let pairs: Vec<(i64, i64)> = chart.links.iter().map(|l| (l.source, l.target)).collect();
        assert_eq!(pairs, vec![(1, 3), (2, 3)]);
        assert_eq!(chart.links[1].id, 2);
        assert!(chart.links.iter().all(|l| l.kind == "0"));
        assert_eq!(chart.warnings.len(), 2);
    }

    #[test]
    fn test_dependency_cycle_is_a_warning() {
        let mut a = task(1, None);
        a.dependencies = Some("2".into());
        let mut b = task(2, None);
        b.dependencies = Some("1".into());
        let chart = project(&TaskArena::from_records(vec![a, b]), d(2024, 1, 1));
        assert_eq!(chart.links.len(), 2);
        assert!(chart.warnings.iter().any(|w| w.contains("Cycle detected")));
    }

    #[test]
    fn test_json_shape() {
        let chart = project(&TaskArena::from_records(vec![task(1, None)]), d(2024, 1, 1));
        let v = serde_json::to_value(&chart).unwrap();
        assert_eq!(v["data"][0]["type"], "task");
        assert_eq!(v["data"][0]["text"], "Tarea 1");
        assert!(v["data"][0].get("depth").is_none());
    }
}
