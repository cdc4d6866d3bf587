use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::de::{lenient_date, null_as_default};
use super::{require_text, Identified, Validate};
use crate::error::ObraError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Delayed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
        }
    }
}

/// Task priority, carried on the wire as 1 (low), 2 (medium) or 3 (high).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(format!("invalid priority {other}, expected 1, 2 or 3")),
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        match p {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub email: String,
}

/// One task record, without its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub actual_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub actual_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: u8,
    #[serde(default)]
    pub responsible_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_user: Option<UserRef>,
    /// Comma-separated ids of the tasks this one waits on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
}

impl Identified for Task {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A task as the backend nests it inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtasks: Vec<TaskNode>,
}

impl TaskNode {
    pub fn leaf(task: Task) -> Self {
        Self {
            task,
            subtasks: Vec::new(),
        }
    }
}

/// Full editable task record sent on create and on every update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub parent_id: Option<i64>,
    pub priority: Priority,
    pub responsible_user_id: Option<i64>,
    pub status: TaskStatus,
    pub progress: u8,
    pub actual_start_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            start_date: None,
            end_date: None,
            parent_id: None,
            priority: Priority::default(),
            responsible_user_id: None,
            status: TaskStatus::default(),
            progress: 0,
            actual_start_date: None,
            actual_end_date: None,
            dependencies: None,
        }
    }
}

impl From<&Task> for TaskDraft {
    fn from(t: &Task) -> Self {
        Self {
            name: t.name.clone(),
            description: t.description.clone(),
            start_date: t.start_date,
            end_date: t.end_date,
            parent_id: t.parent_id,
            priority: t.priority,
            responsible_user_id: t.responsible_user_id,
            status: t.status,
            progress: t.progress,
            actual_start_date: t.actual_start_date,
            actual_end_date: t.actual_end_date,
            dependencies: t.dependencies.clone(),
        }
    }
}

impl Validate for TaskDraft {
    fn validate(&self) -> Result<(), ObraError> {
        require_text(&self.name, "Task name")?;
        let (start, end) = match (self.start_date, self.end_date) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(ObraError::validation(
                    "Task name, start date and end date are required",
                ))
            }
        };
        if start > end {
            return Err(ObraError::validation(format!(
                "Start date {start} is after end date {end}"
            )));
        }
        if self.progress > 100 {
            return Err(ObraError::validation("Progress must be between 0 and 100"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_priority_wire_format() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "3");
        let p: Priority = serde_json::from_str("1").unwrap();
        assert_eq!(p, Priority::Low);
        assert!(serde_json::from_str::<Priority>("7").is_err());
    }

    #[test]
    fn test_task_node_nested_parse() {
        let raw = r#"{
            "id": 1, "name": "Cimentación", "start_date": "2024-01-01", "end_date": "2024-01-05",
            "priority": 3, "status": null, "progress": null,
            "subtasks": [
                {"id": 2, "name": "Excavación", "parent_id": 1, "start_date": "2024-01-01",
                 "end_date": "2024-01-02", "status": "in_progress", "progress": 40}
            ]
        }"#;
        let node: TaskNode = serde_json::from_str(raw).unwrap();
        assert_eq!(node.task.status, TaskStatus::Pending);
        assert_eq!(node.task.progress, 0);
        assert_eq!(node.task.priority, Priority::High);
        assert_eq!(node.subtasks.len(), 1);
        assert_eq!(node.subtasks[0].task.status, TaskStatus::InProgress);
        assert!(node.subtasks[0].subtasks.is_empty());
    }

    #[test]
    fn test_draft_requires_name_and_dates() {
        let mut draft = TaskDraft::new("Muros");
        assert!(draft.validate().is_err());
        draft.start_date = day(2024, 2, 1);
        draft.end_date = day(2024, 2, 9);
        assert!(draft.validate().is_ok());
        draft.name = "  ".into();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_draft_rejects_inverted_dates() {
        let mut draft = TaskDraft::new("Losa");
        draft.start_date = day(2024, 3, 10);
        draft.end_date = day(2024, 3, 1);
        let err = draft.validate().unwrap_err();
        assert!(err.message.contains("after end date"));
    }
}
