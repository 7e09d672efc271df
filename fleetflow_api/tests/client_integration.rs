use std::sync::{Arc, Mutex};

use fleetflow_api::multipart::{Form, Part};
use fleetflow_api::session::{MemoryTokenStore, Navigator, TokenStore};
use fleetflow_api::{Client, Error};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

fn client_for(server: &MockServer, token: Option<&str>) -> (Client, Arc<MemoryTokenStore>) {
    let store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let client = Client::with_base_url(&server.uri())
        .unwrap()
        .with_token_store(store.clone());
    (client, store)
}

#[tokio::test]
async fn get_sends_json_headers_and_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, Some("tok-123"));
    let body = client.get("/customers").await.unwrap();
    assert_eq!(body, json!([{"id": 1}]));
}

#[tokio::test]
async fn no_authorization_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, None);
    client.get("/vehicles").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn post_and_put_send_json_bodies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/drivers"))
        .and(body_json(json!({"name": "Jane"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5, "name": "Jane"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/drivers/5"))
        .and(body_json(json!({"name": "Janet"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "Janet"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, None);
    let created = client.post("/drivers", &json!({"name": "Jane"})).await.unwrap();
    assert_eq!(created["id"], json!(5));
    let updated = client.put("/drivers/5", &json!({"name": "Janet"})).await.unwrap();
    assert_eq!(updated["name"], json!("Janet"));
}

#[tokio::test]
async fn empty_success_body_is_empty_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/customers/3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, None);
    assert_eq!(client.del("/customers/3").await.unwrap(), json!({}));
}

#[tokio::test]
async fn empty_error_body_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, None);
    let err = client.get("/invoices").await.unwrap_err();
    assert_eq!(
        err,
        Error::HttpStatus {
            status: 502,
            message: "HTTP error! status: 502".to_string()
        }
    );
    assert_eq!(err.to_string(), "HTTP error! status: 502");
}

#[tokio::test]
async fn server_message_becomes_error_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "The name field is required."})),
        )
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, None);
    let err = client.post("/customers", &json!({})).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "The name field is required.");
}

#[tokio::test]
async fn error_without_message_uses_generic_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payments"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, None);
    let err = client.get("/payments").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn malformed_json_is_protocol_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, None);
    let err = client.get("/expenses").await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
}

#[tokio::test]
async fn unauthorized_clears_token_and_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .mount(&mock_server)
        .await;

    let navigator = Arc::new(RecordingNavigator::default());
    let (client, store) = client_for(&mock_server, Some("stale"));
    let client = client.with_navigator(navigator.clone());

    let err = client.get("/invoices").await.unwrap_err();
    assert_eq!(err, Error::SessionExpired);
    assert_eq!(err.to_string(), "Session expired. Redirecting to login.");
    assert_eq!(store.load(), None);
    assert_eq!(*navigator.routes.lock().unwrap(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn multipart_upload_lets_transport_set_boundary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/documents/7"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .mount(&mock_server)
        .await;

    let (client, _) = client_for(&mock_server, Some("tok"));
    let form = Form::new()
        .text("file_type", "Logbook")
        .part("file", Part::bytes(b"pdf-bytes".to_vec()).file_name("logbook.pdf"));
    client.post_form("/documents/7", form).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("logbook.pdf"));
    assert!(body.contains("Logbook"));
}

#[tokio::test]
async fn absolute_next_link_is_fetched_relative_to_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 16}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = format!("{}/api", mock_server.uri());
    let client = Client::with_base_url(&base).unwrap();
    let link = format!("{}/customers?page=2", base);
    let relative = client.relative_reference(&link);
    assert_eq!(relative, "/customers?page=2");
    assert_eq!(client.get(&relative).await.unwrap(), json!([{"id": 16}]));
}
