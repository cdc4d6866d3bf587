use serde::{Deserialize, Serialize};

use super::de::null_as_default;
use super::document::Folder;
use super::task::TaskNode;
use super::{require_text, Identified, Validate};
use crate::error::ObraError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
    /// Root tasks with nested subtasks; only filled by the detail endpoint.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<TaskNode>,
    /// Flat folder list; only filled by the detail endpoint.
    #[serde(default, deserialize_with = "null_as_default")]
    pub folders: Vec<Folder>,
}

impl Identified for Project {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    /// Only sent on create; taken from the signed-in user's company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
}

impl From<&Project> for ProjectDraft {
    fn from(p: &Project) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            company_id: None,
        }
    }
}

impl Validate for ProjectDraft {
    fn validate(&self) -> Result<(), ObraError> {
        require_text(&self.name, "Project name")
    }
}
