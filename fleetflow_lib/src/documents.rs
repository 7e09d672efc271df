//! Documents attached to drivers, vehicles, expenses and payments.

use std::path::Path;

use fleetflow_api::multipart::{Form, Part};
use fleetflow_api::normalize::normalize_collection;
use fleetflow_api::types::{Document, OwnerKind, ResourceId, ResourceKind};
use fleetflow_api::Client;
use serde_json::Value;

use crate::datetime::now_for_api;
use crate::error::FleetError;

/// A file to attach to an owner record.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub owner_id: ResourceId,
    /// Document category, e.g. `Logbook` or `Driving_License`.
    pub file_type: String,
    pub file_name: String,
    pub contents: Vec<u8>,
    /// `YYYY-MM-DD HH:MM:SS`; the current time when unset.
    pub upload_date: Option<String>,
}

impl DocumentUpload {
    /// Reads `path` into memory.
    pub async fn from_path(
        owner_id: ResourceId,
        file_type: &str,
        path: &Path,
    ) -> Result<Self, FleetError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                FleetError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?
            .to_string();
        let contents = tokio::fs::read(path).await?;
        Ok(Self {
            owner_id,
            file_type: file_type.to_string(),
            file_name,
            contents,
            upload_date: None,
        })
    }

    fn into_form(self) -> Form {
        let upload_date = self.upload_date.unwrap_or_else(now_for_api);
        Form::new()
            .part("file", Part::bytes(self.contents).file_name(self.file_name.clone()))
            .text("file_type", self.file_type)
            .text("upload_date", upload_date)
            .text("file_path", self.file_name)
    }
}

/// POSTs the file as multipart to `/documents/{owner_id}`.
pub async fn upload_document(client: &Client, upload: DocumentUpload) -> Result<Value, FleetError> {
    if upload.file_type.trim().is_empty() {
        return Err(FleetError::InvalidInput(
            "A document type is required.".to_string(),
        ));
    }
    let path = ResourceKind::Documents.member(&upload.owner_id);
    tracing::info!("Uploading {} to {}", upload.file_name, path);
    Ok(client.post_form(&path, upload.into_form()).await?)
}

/// Keeps the documents attached to the `kind` record `owner_id`, in their
/// original order.
pub fn documents_for_owner(
    documents: &[Document],
    kind: OwnerKind,
    owner_id: &ResourceId,
) -> Vec<Document> {
    documents
        .iter()
        .filter(|doc| doc.belongs_to(kind, owner_id))
        .cloned()
        .collect()
}

/// Loads every document and keeps those attached to the `kind` record
/// `owner_id`. The backend has no per-owner listing.
pub async fn fetch_owner_documents(
    client: &Client,
    kind: OwnerKind,
    owner_id: &ResourceId,
) -> Result<Vec<Document>, FleetError> {
    let payload = client.get(ResourceKind::Documents.endpoint()).await?;
    let documents = normalize_collection(payload)
        .items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Document>, _>>()?;
    Ok(documents_for_owner(&documents, kind, owner_id))
}
