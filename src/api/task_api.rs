use super::project_api::get_project;
use super::ApiClient;
use crate::error::ObraError;
use crate::models::{Task, TaskDraft};
use crate::screen::Resource;
use crate::tree::TaskArena;

pub fn create_task(client: &ApiClient, project_id: i64, draft: &TaskDraft) -> Result<Task, ObraError> {
    client.post(&format!("/projects/{project_id}/tasks/"), draft)
}

/// Full-record update; last write wins.
pub fn update_task(client: &ApiClient, id: i64, draft: &TaskDraft) -> Result<Task, ObraError> {
    client.put(&format!("/tasks/{id}/"), draft)
}

pub fn delete_task(client: &ApiClient, id: i64) -> Result<(), ObraError> {
    client.delete(&format!("/tasks/{id}"))
}

/// The project's task tree, as an arena.
pub fn load_tasks(client: &ApiClient, project_id: i64) -> Result<TaskArena, ObraError> {
    let project = get_project(client, project_id)?;
    Ok(TaskArena::from_tree(project.tasks))
}

/// Tasks of one project, listed flat in tree order.
pub struct Tasks<'a> {
    pub client: &'a ApiClient,
    pub project_id: i64,
}

impl Resource for Tasks<'_> {
    type Record = Task;
    type Draft = TaskDraft;
    const LABEL: &'static str = "Task";

    fn list(&self) -> Result<Vec<Task>, ObraError> {
        let arena = load_tasks(self.client, self.project_id)?;
        Ok(arena.flatten().into_iter().cloned().collect())
    }

    fn create(&self, draft: &TaskDraft) -> Result<Task, ObraError> {
        create_task(self.client, self.project_id, draft)
    }

    fn update(&self, id: i64, draft: &TaskDraft) -> Result<Task, ObraError> {
        update_task(self.client, id, draft)
    }

    fn delete(&self, id: i64) -> Result<(), ObraError> {
        delete_task(self.client, id)
    }
}
