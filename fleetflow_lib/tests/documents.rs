use fleetflow_lib::documents::{fetch_owner_documents, upload_document, DocumentUpload};
use fleetflow_lib::types::{OwnerKind, ResourceId};
use fleetflow_lib::{Client, FleetError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn upload_posts_multipart_to_owner() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/documents/12"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "code": "DOC-0001"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let upload = DocumentUpload {
        owner_id: ResourceId::Int(12),
        file_type: "Logbook".to_string(),
        file_name: "logbook.pdf".to_string(),
        contents: b"%PDF-1.4".to_vec(),
        upload_date: Some("2024-05-01 10:00:00".to_string()),
    };
    let created = upload_document(&client, upload).await.unwrap();
    assert_eq!(created["code"], json!("DOC-0001"));

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    for field in ["name=\"file\"", "filename=\"logbook.pdf\"", "name=\"file_type\"", "Logbook", "2024-05-01 10:00:00", "name=\"file_path\""] {
        assert!(body.contains(field), "missing {} in {}", field, body);
    }
}

#[tokio::test]
async fn upload_requires_file_type() {
    let client = Client::with_base_url("http://localhost:8000/api").unwrap();
    let upload = DocumentUpload {
        owner_id: ResourceId::Int(1),
        file_type: " ".to_string(),
        file_name: "x.pdf".to_string(),
        contents: Vec::new(),
        upload_date: None,
    };
    let err = upload_document(&client, upload).await.unwrap_err();
    assert!(matches!(err, FleetError::InvalidInput(_)));
}

#[tokio::test]
async fn owner_documents_are_filtered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "code": "DOC-1", "documentable_type": "App\\Models\\Vehicle", "documentable": {"id": 5, "code": "VEH-0005"}},
                {"id": 2, "code": "DOC-2", "documentable": {"id": 5, "code": "DRI-0005"}}
            ],
            "links": {},
            "meta": {"total": 2}
        })))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let docs = fetch_owner_documents(&client, OwnerKind::Vehicle, &ResourceId::Int(5)).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].owner.as_ref().unwrap().kind, OwnerKind::Vehicle);
}
