use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use super::project_api::get_project;
use super::ApiClient;
use crate::error::ObraError;
use crate::models::{
    Document, DocumentDraft, DocumentVersion, Folder, FolderContents, FolderDraft, UploadReport,
    Validate,
};
use crate::screen::Resource;

/// Flat folder list of a project.
pub fn project_folders(client: &ApiClient, project_id: i64) -> Result<Vec<Folder>, ObraError> {
    Ok(get_project(client, project_id)?.folders)
}

pub fn get_folder(client: &ApiClient, id: i64) -> Result<FolderContents, ObraError> {
    client.get(&format!("/folders/{id}"))
}

pub fn create_folder(client: &ApiClient, project_id: i64, draft: &FolderDraft) -> Result<Folder, ObraError> {
    draft.validate()?;
    client.post(&format!("/projects/{project_id}/folders/"), draft)
}

pub fn rename_folder(client: &ApiClient, id: i64, name: &str) -> Result<(), ObraError> {
    if name.trim().is_empty() {
        return Err(ObraError::validation("Folder name is required"));
    }
    let _: Value = client.put(&format!("/folders/{id}/rename"), &json!({ "name": name.trim() }))?;
    Ok(())
}

pub fn delete_folder(client: &ApiClient, id: i64) -> Result<(), ObraError> {
    client.delete(&format!("/folders/{id}"))
}

/// Folders of one project. Updates are renames.
pub struct Folders<'a> {
    pub client: &'a ApiClient,
    pub project_id: i64,
}

impl Resource for Folders<'_> {
    type Record = Folder;
    type Draft = FolderDraft;
    const LABEL: &'static str = "Folder";

    fn list(&self) -> Result<Vec<Folder>, ObraError> {
        project_folders(self.client, self.project_id)
    }

    fn create(&self, draft: &FolderDraft) -> Result<Folder, ObraError> {
        create_folder(self.client, self.project_id, draft)
    }

    fn update(&self, id: i64, draft: &FolderDraft) -> Result<Folder, ObraError> {
        rename_folder(self.client, id, &draft.name)?;
        Ok(Folder {
            id,
            name: draft.name.trim().to_string(),
            parent_id: draft.parent_id,
        })
    }

    fn delete(&self, id: i64) -> Result<(), ObraError> {
        delete_folder(self.client, id)
    }
}

pub fn upload_version(client: &ApiClient, document_id: i64, file: &Path) -> Result<UploadReport, ObraError> {
    client.post_file(&format!("/documents/{document_id}/upload_version/"), file)
}

/// Create the document record, then upload its first version.
pub fn create_document(client: &ApiClient, draft: &DocumentDraft, file: &Path) -> Result<Document, ObraError> {
    draft.validate()?;
    if !file.is_file() {
        return Err(ObraError::validation(format!(
            "File not found: {}",
            file.display()
        )));
    }
    let document: Document = client.post("/documents/", draft)?;
    upload_version(client, document.id, file)?;
    info!(document = document.id, "document created with first version");
    Ok(document)
}

pub fn download_version(client: &ApiClient, version_id: i64) -> Result<Vec<u8>, ObraError> {
    client.download(&format!("/documents/file/{version_id}"))
}

/// Latest version of an IFC document, ready for a model viewer.
pub fn model_version(client: &ApiClient, folder_id: i64, document_id: i64) -> Result<(Document, DocumentVersion), ObraError> {
    let folder = get_folder(client, folder_id)?;
    let document = folder
        .documents
        .into_iter()
        .find(|d| d.id == document_id)
        .ok_or_else(|| ObraError::not_found("Document", document_id))?;
    let version = document
        .latest_version()
        .cloned()
        .ok_or_else(|| ObraError::validation(format!("Document {} has no versions", document.name)))?;
    if !version.is_ifc() {
        return Err(ObraError::validation(format!(
            "{} is not an IFC model",
            version.filename
        )));
    }
    Ok((document, version))
}
