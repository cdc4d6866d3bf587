use super::ApiClient;
use crate::error::ObraError;
use crate::models::{Project, ProjectDraft};
use crate::screen::Resource;

pub fn list_projects(client: &ApiClient) -> Result<Vec<Project>, ObraError> {
    client.get("/projects/")
}

/// Project detail, including the nested task tree and the flat folder list.
pub fn get_project(client: &ApiClient, id: i64) -> Result<Project, ObraError> {
    client.get(&format!("/projects/{id}"))
}

pub fn create_project(client: &ApiClient, draft: &ProjectDraft) -> Result<Project, ObraError> {
    client.post("/projects/", draft)
}

pub fn update_project(client: &ApiClient, id: i64, draft: &ProjectDraft) -> Result<Project, ObraError> {
    client.put(&format!("/projects/{id}"), draft)
}

pub fn delete_project(client: &ApiClient, id: i64) -> Result<(), ObraError> {
    client.delete(&format!("/projects/{id}"))
}

pub struct Projects<'a>(pub &'a ApiClient);

impl Resource for Projects<'_> {
    type Record = Project;
    type Draft = ProjectDraft;
    const LABEL: &'static str = "Project";

    fn list(&self) -> Result<Vec<Project>, ObraError> {
        list_projects(self.0)
    }

    fn create(&self, draft: &ProjectDraft) -> Result<Project, ObraError> {
        create_project(self.0, draft)
    }

    fn update(&self, id: i64, draft: &ProjectDraft) -> Result<Project, ObraError> {
        update_project(self.0, id, draft)
    }

    fn delete(&self, id: i64) -> Result<(), ObraError> {
        delete_project(self.0, id)
    }
}

