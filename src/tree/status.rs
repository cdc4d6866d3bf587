use chrono::NaiveDate;

use crate::models::{Task, TaskStatus};

/// Status shown for a task on `today`. A fully progressed task is
/// completed, a pending task whose start date has passed is delayed, and
/// everything else keeps its stored status.
pub fn derive_status(task: &Task, today: NaiveDate) -> TaskStatus {
    if task.progress >= 100 {
        return TaskStatus::Completed;
    }
    match (task.status, task.start_date) {
        (TaskStatus::Pending, Some(start)) if start < today => TaskStatus::Delayed,
        (status, _) => status,
    }
}

/// Returns true when the derived status differs from the stored one.
pub fn needs_sync(task: &Task, today: NaiveDate) -> bool {
    derive_status(task, today) != task.status
}

/// One user edit to a task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldChange {
    Progress(u8),
    ActualStart(Option<NaiveDate>),
    ActualEnd(Option<NaiveDate>),
    Status(TaskStatus),
}

/// Apply an edit and the status rule it triggers. A task at 100 %
/// stays completed whatever the edit.
pub fn apply_change(task: &mut Task, change: FieldChange) {
    match change {
        FieldChange::Progress(progress) => task.progress = progress.min(100),
        FieldChange::ActualStart(date) => {
            task.actual_start_date = date;
            if date.is_some() && task.status != TaskStatus::Completed {
                task.status = TaskStatus::InProgress;
            }
        }
        FieldChange::ActualEnd(date) => task.actual_end_date = date,
        FieldChange::Status(status) => task.status = status,
    }
    if task.progress >= 100 {
        task.status = TaskStatus::Completed;
    }
}
