use std::path::Path;

use serde::Serialize;

use super::ApiClient;
use crate::budget::EstimateFilter;
use crate::error::ObraError;
use crate::models::{
    Contract, ContractDraft, Contractor, ContractorDraft, Estimate, EstimateDraft, UploadReport,
    WorkItem, WorkItemDraft,
};
use crate::screen::Resource;

// ─── Contractors ───────────────────────────────────────

pub fn list_contractors(client: &ApiClient) -> Result<Vec<Contractor>, ObraError> {
    client.get("/contractors/")
}

pub fn import_contractors(client: &ApiClient, file: &Path) -> Result<UploadReport, ObraError> {
    client.post_file("/contractors/import-excel/", file)
}

pub struct Contractors<'a>(pub &'a ApiClient);

impl Resource for Contractors<'_> {
    type Record = Contractor;
    type Draft = ContractorDraft;
    const LABEL: &'static str = "Contractor";

    fn list(&self) -> Result<Vec<Contractor>, ObraError> {
        list_contractors(self.0)
    }

    fn create(&self, draft: &ContractorDraft) -> Result<Contractor, ObraError> {
        self.0.post("/contractors/", draft)
    }

    fn update(&self, id: i64, draft: &ContractorDraft) -> Result<Contractor, ObraError> {
        self.0.put(&format!("/contractors/{id}"), draft)
    }

    fn delete(&self, id: i64) -> Result<(), ObraError> {
        self.0.delete(&format!("/contractors/{id}"))
    }
}

// ─── Work items ────────────────────────────────────────

pub fn list_work_items(client: &ApiClient, project_id: i64) -> Result<Vec<WorkItem>, ObraError> {
    client.get(&format!("/projects/{project_id}/work_items/"))
}

pub struct WorkItems<'a> {
    pub client: &'a ApiClient,
    pub project_id: i64,
}

impl Resource for WorkItems<'_> {
    type Record = WorkItem;
    type Draft = WorkItemDraft;
    const LABEL: &'static str = "Work item";

    fn list(&self) -> Result<Vec<WorkItem>, ObraError> {
        list_work_items(self.client, self.project_id)
    }

    fn create(&self, draft: &WorkItemDraft) -> Result<WorkItem, ObraError> {
        self.client
            .post(&format!("/projects/{}/work_items/", self.project_id), draft)
    }

    fn update(&self, id: i64, draft: &WorkItemDraft) -> Result<WorkItem, ObraError> {
        self.client.put(&format!("/work_items/{id}"), draft)
    }

    fn delete(&self, id: i64) -> Result<(), ObraError> {
        self.client.delete(&format!("/work_items/{id}"))
    }
}

// ─── Contracts ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ContractQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<i64>,
}

/// Contracts of a project. Filters are applied by the backend.
pub fn list_contracts(
    client: &ApiClient,
    project_id: i64,
    query: ContractQuery,
) -> Result<Vec<Contract>, ObraError> {
    client.get_with_query(&format!("/projects/{project_id}/contracts/"), &query)
}

pub fn import_contracts(client: &ApiClient, project_id: i64, file: &Path) -> Result<UploadReport, ObraError> {
    client.post_file(&format!("/projects/{project_id}/contracts/import-excel/"), file)
}

pub fn export_contracts(client: &ApiClient, project_id: i64) -> Result<Vec<u8>, ObraError> {
    client.download(&format!("/projects/{project_id}/contracts/export-excel/"))
}

pub struct Contracts<'a> {
    pub client: &'a ApiClient,
    pub project_id: i64,
    pub query: ContractQuery,
}

impl Resource for Contracts<'_> {
    type Record = Contract;
    type Draft = ContractDraft;
    const LABEL: &'static str = "Contract";

    fn list(&self) -> Result<Vec<Contract>, ObraError> {
        list_contracts(self.client, self.project_id, self.query)
    }

    fn create(&self, draft: &ContractDraft) -> Result<Contract, ObraError> {
        self.client
            .post(&format!("/projects/{}/contracts/", self.project_id), draft)
    }

    fn update(&self, id: i64, draft: &ContractDraft) -> Result<Contract, ObraError> {
        self.client.put(&format!("/contracts/{id}"), draft)
    }

    fn delete(&self, id: i64) -> Result<(), ObraError> {
        self.client.delete(&format!("/contracts/{id}"))
    }
}

// ─── Estimates ─────────────────────────────────────────

pub fn list_estimates(client: &ApiClient, project_id: i64) -> Result<Vec<Estimate>, ObraError> {
    client.get(&format!("/projects/{project_id}/estimates/"))
}

pub fn import_estimates(client: &ApiClient, project_id: i64, file: &Path) -> Result<UploadReport, ObraError> {
    client.post_file(&format!("/projects/{project_id}/estimates/import-excel/"), file)
}

pub fn export_estimates(client: &ApiClient, project_id: i64) -> Result<Vec<u8>, ObraError> {
    client.download(&format!("/projects/{project_id}/estimates/export-excel/"))
}

/// Estimates of a project, filtered client-side.
pub struct Estimates<'a> {
    pub client: &'a ApiClient,
    pub project_id: i64,
    pub filter: EstimateFilter,
}

impl Resource for Estimates<'_> {
    type Record = Estimate;
    type Draft = EstimateDraft;
    const LABEL: &'static str = "Estimate";

    fn list(&self) -> Result<Vec<Estimate>, ObraError> {
        let all = list_estimates(self.client, self.project_id)?;
        Ok(all.into_iter().filter(|e| self.filter.matches(e)).collect())
    }

    fn create(&self, draft: &EstimateDraft) -> Result<Estimate, ObraError> {
        self.client
            .post(&format!("/projects/{}/estimates/", self.project_id), draft)
    }

    fn update(&self, id: i64, draft: &EstimateDraft) -> Result<Estimate, ObraError> {
        self.client.put(&format!("/estimates/{id}"), draft)
    }

    fn delete(&self, id: i64) -> Result<(), ObraError> {
        self.client.delete(&format!("/estimates/{id}"))
    }
}
