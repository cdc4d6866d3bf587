use serde::{Deserialize, Serialize};

use super::de::null_as_default;
use super::{require_text, Identified, Validate};
use crate::error::ObraError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

impl Identified for Folder {
    fn id(&self) -> i64 {
        self.id
    }
}

/// One folder's listing as returned by `GET /folders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderContents {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subfolders: Vec<Folder>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub folder_id: Option<i64>,
    /// Oldest first; the last entry is the current version.
    #[serde(default, deserialize_with = "null_as_default")]
    pub versions: Vec<DocumentVersion>,
}

impl Document {
    pub fn latest_version(&self) -> Option<&DocumentVersion> {
        self.versions.last()
    }

    pub fn is_ifc(&self) -> bool {
        self.latest_version().is_some_and(DocumentVersion::is_ifc)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version_number: u32,
    pub filename: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

impl DocumentVersion {
    pub fn is_ifc(&self) -> bool {
        self.filename.to_lowercase().ends_with(".ifc")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderDraft {
    pub name: String,
    pub parent_id: Option<i64>,
}

impl Validate for FolderDraft {
    fn validate(&self) -> Result<(), ObraError> {
        require_text(&self.name, "Folder name")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDraft {
    pub name: String,
    pub folder_id: i64,
}

impl Validate for DocumentDraft {
    fn validate(&self) -> Result<(), ObraError> {
        require_text(&self.name, "Document name")
    }
}

/// Acknowledgement returned by upload and spreadsheet import endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadReport {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_version_drives_ifc_flag() {
        let doc: Document = serde_json::from_str(
            r#"{"id": 9, "name": "Modelo", "versions": [
                {"id": 1, "version_number": 1, "filename": "plano.pdf"},
                {"id": 2, "version_number": 2, "filename": "Modelo.IFC"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.latest_version().map(|v| v.id), Some(2));
        assert!(doc.is_ifc());

        let empty = Document {
            id: 1,
            name: "x".into(),
            folder_id: None,
            versions: vec![],
        };
        assert!(!empty.is_ifc());
    }
}
