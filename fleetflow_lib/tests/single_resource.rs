use std::sync::Arc;
use std::time::Duration;

use fleetflow_lib::types::{Invoice, ResourceId};
use fleetflow_lib::{Client, SingleResource};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Arc<Client> {
    Arc::new(Client::with_base_url(&server.uri()).unwrap())
}

#[tokio::test]
async fn bare_object_is_kept_whole() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "code": "INV-0007",
            "total_amount": "1500.00",
            "invoice_items": [{"id": 1, "destination": "Mombasa"}]
        })))
        .mount(&mock_server)
        .await;

    let invoice: SingleResource<Invoice> =
        SingleResource::open(client(&mock_server), "/invoices/7").await;
    let state = invoice.state();
    assert!(!state.loading);
    assert!(state.error.is_none());
    let data = state.data.unwrap();
    assert_eq!(data.id, ResourceId::Int(7));
    assert_eq!(data.total_amount, Some(1500.0));
    assert_eq!(data.invoice_items.len(), 1);
}

#[tokio::test]
async fn paginated_envelope_yields_item_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": [{"id": 1}, {"id": 2}], "total": 2}
        })))
        .mount(&mock_server)
        .await;

    let docs: SingleResource = SingleResource::open(client(&mock_server), "/documents").await;
    assert_eq!(docs.state().data, Some(json!([{"id": 1}, {"id": 2}])));
}

#[tokio::test]
async fn refetch_picks_up_changes_and_errors_keep_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/credit_notes/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "status": "Draft"})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/credit_notes/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "status": "Issued"})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/credit_notes/3"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
        .mount(&mock_server)
        .await;

    let note: SingleResource<Value> =
        SingleResource::open(client(&mock_server), "/credit_notes/3").await;
    assert_eq!(note.state().data.unwrap()["status"], json!("Draft"));

    note.refetch().await;
    assert_eq!(note.state().data.unwrap()["status"], json!("Issued"));

    note.refetch().await;
    let state = note.state();
    assert!(!state.loading);
    assert_eq!(state.error.unwrap().to_string(), "Not found");
    assert_eq!(state.data.unwrap()["status"], json!("Issued"));
}

#[tokio::test]
async fn closed_record_discards_in_flight_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 3, "name": "Acme"}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    let record: Arc<SingleResource<Value>> =
        Arc::new(SingleResource::new(client(&mock_server), "/customers/3"));
    let task = {
        let record = record.clone();
        tokio::spawn(async move { record.fetch().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(record.state().loading);
    record.close();
    task.await.unwrap();

    let state = record.state();
    assert!(state.data.is_none());
    assert!(!state.loading);
}
