//! Integration tests for `HttpTransport` against a local `wiremock` server.

use bytes::Bytes;
use kiosk_client::application::ports::{ApiTransport, PrintUpload, TransportErrorKind};
use kiosk_client::infrastructure::network::HttpTransport;
use kiosk_core::protocol::{API_BASE_PATH, PRINT_UPLOAD_PATH};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_get_sends_query_to_management_endpoint() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_BASE_PATH))
        .and(query_param("node", "kiosk-07"))
        .and(query_param("action", "login"))
        .and(query_param("username", "alice smith"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"authenticated":1}"#))
        .expect(1)
        .mount(&server)
        .await;
    let transport = HttpTransport::new(&server.uri()).unwrap();

    // Act
    let body = transport
        .get(&query(&[
            ("node", "kiosk-07"),
            ("action", "login"),
            ("username", "alice smith"),
        ]))
        .await
        .unwrap();

    // Assert
    assert_eq!(body, Bytes::from_static(br#"{"authenticated":1}"#));
}

#[tokio::test]
async fn test_error_status_is_classified_with_status_code() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_BASE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let transport = HttpTransport::new(&server.uri()).unwrap();

    // Act
    let err = transport
        .get(&query(&[("action", "register_node")]))
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.kind, TransportErrorKind::HttpStatus(503));
    assert!(err.to_string().starts_with("503: "));
}

#[tokio::test]
async fn test_upload_posts_multipart_fields() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PRINT_UPLOAD_PATH))
        .and(body_string_contains(r#"name="client_name""#))
        .and(body_string_contains(r#"name="print_file"; filename="report.pdf""#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let transport = HttpTransport::new(&server.uri()).unwrap();
    let upload = PrintUpload {
        client_name: "kiosk-07".into(),
        username: "alice".into(),
        printer: "laser".into(),
        file_name: "report.pdf".into(),
        content: Bytes::from_static(b"%PDF-1.7 body"),
    };

    // Act
    assert_ok!(transport.upload(&upload).await);

    // Assert
    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).into_owned();
    for field in ["client_name", "username", "printer", "filename"] {
        assert!(body.contains(&format!(r#"name="{field}""#)), "missing {field}");
    }
    assert!(body.contains("kiosk-07"));
    assert!(body.contains("laser"));
    assert!(body.contains("%PDF-1.7 body"));
}

#[tokio::test]
async fn test_probe_reports_success_and_failure() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let transport = HttpTransport::new("http://unused.invalid").unwrap();

    // Act
    let ok = transport.probe(&format!("{}/ok", server.uri())).await;
    let down = transport.probe(&format!("{}/down", server.uri())).await;

    // Assert
    assert_ok!(ok);
    let err = assert_err!(down);
    assert_eq!(err.kind, TransportErrorKind::HttpStatus(502));
}
