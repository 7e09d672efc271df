use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use fleetflow_lib::datetime::format_date_for_api;
use fleetflow_lib::documents::{fetch_owner_documents, upload_document, DocumentUpload};
use fleetflow_lib::types::{Document, OwnerKind, ResourceId};
use fleetflow_lib::Client;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_rows, OutputFormat};

#[derive(Args)]
pub struct UploadArgs {
    /// Id of the driver, vehicle, expense or payment the file belongs to
    #[arg(long)]
    pub owner: String,

    /// What the owner id refers to: driver, vehicle, expense or payment
    #[arg(long)]
    pub owner_kind: OwnerKind,

    /// Document type, e.g. Logbook or Driving_License
    #[arg(long = "type")]
    pub file_type: String,

    /// Upload date (defaults to now)
    #[arg(long)]
    pub date: Option<String>,

    /// File to upload
    pub path: PathBuf,
}

#[derive(Tabled, Serialize)]
struct DocumentRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Type")]
    file_type: String,
    #[tabled(rename = "File")]
    file_path: String,
    #[tabled(rename = "Uploaded")]
    upload_date: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

impl From<&Document> for DocumentRow {
    fn from(doc: &Document) -> Self {
        Self {
            code: doc.code.clone().unwrap_or_default(),
            file_type: doc.file_type.clone().unwrap_or_default(),
            file_path: doc.file_path.clone().unwrap_or_default(),
            upload_date: doc.upload_date.clone().unwrap_or_default(),
            owner: doc
                .owner
                .as_ref()
                .map(|o| o.label.clone())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

pub async fn run(args: &UploadArgs, client: Arc<Client>, format: &OutputFormat) -> Result<()> {
    let owner = ResourceId::parse(&args.owner);
    let mut upload = DocumentUpload::from_path(owner.clone(), &args.file_type, &args.path).await?;
    upload.upload_date = args.date.as_deref().map(format_date_for_api);

    upload_document(&client, upload).await?;
    eprintln!("Document uploaded successfully.");

    let documents = fetch_owner_documents(&client, args.owner_kind, &owner).await?;
    let rows: Vec<DocumentRow> = documents.iter().map(DocumentRow::from).collect();
    print_rows(&rows, "No documents found.", format)
}
