//! API list endpoint integration tests
//!
//! Tests for `GET /apim/apis`, proxied to the APIM Publisher.

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::MockServer;

use crate::common::{
    apim_mocks, constants, http_test_server, test_server, urls, RecordingApimClient,
    UnreadableAuthConfig,
};

fn cookie(value: &'static str) -> HeaderValue {
    HeaderValue::from_static(value)
}

#[tokio::test]
async fn test_api_list_is_returned_unchanged() {
    let upstream = MockServer::start().await;
    apim_mocks::mock_listing(&upstream, "publisher", "apis", 200, apim_mocks::api_list(), 1).await;

    let server = http_test_server(urls(Some(upstream.uri().as_str()), None));
    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), apim_mocks::api_list());
}

#[tokio::test]
async fn test_token_and_endpoint_forwarded() {
    let client = RecordingApimClient::new(StatusCode::OK, r#"{"count":0,"list":[]}"#);
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), client.clone());

    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await;

    response.assert_status_ok();
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operation, "get_apis");
    assert_eq!(
        calls[0].endpoint,
        "https://publisher.example.com:9443/api/am/publisher/v1"
    );
    assert_eq!(calls[0].access_token, constants::TEST_TOKEN);
}

#[tokio::test]
async fn test_token_without_hid_uses_sdid_only() {
    let client = RecordingApimClient::new(StatusCode::OK, "{}");
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), client.clone());

    server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(r#"DASHBOARD_USER={"SDID":"abc"}; lang=en"#))
        .await
        .assert_status_ok();

    assert_eq!(client.calls()[0].access_token, "abc");
}

#[tokio::test]
async fn test_upstream_failure_status_maps_to_internal_error() {
    let upstream = MockServer::start().await;
    apim_mocks::mock_listing(
        &upstream,
        "publisher",
        "apis",
        503,
        json!({"code": 503, "message": "Service Unavailable"}),
        1,
    )
    .await;

    let server = http_test_server(urls(Some(upstream.uri().as_str()), None));
    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({"code": 500, "message": "Unable to retrieve API list."})
    );
}

#[tokio::test]
async fn test_upstream_failure_status_releases_response_once() {
    let client = RecordingApimClient::new(StatusCode::SERVICE_UNAVAILABLE, "unavailable");
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), client.clone());

    server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(client.responses_issued(), 1);
    assert_eq!(client.responses_released(), 1);
}

#[tokio::test]
async fn test_missing_server_urls_is_bad_request_without_upstream_call() {
    let client = RecordingApimClient::new(StatusCode::OK, "{}");
    let server = test_server(urls(None, None), client.clone());

    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"code": 400, "message": "Unable to find Publisher server URL."})
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_store_url_does_not_serve_publisher() {
    let client = RecordingApimClient::new(StatusCode::OK, "{}");
    let server = test_server(urls(None, Some(constants::STORE_URL)), client.clone());

    server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_dashboard_cookie_is_bad_request() {
    let client = RecordingApimClient::new(StatusCode::OK, "{}");
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), client.clone());

    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie("DASHBOARD_USER={broken; HID=123"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["code"], 400);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Malformed DASHBOARD_USER cookie"));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_utf8_dashboard_cookie_is_forwarded() {
    let client = RecordingApimClient::new(StatusCode::OK, r#"{"count":0,"list":[]}"#);
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), client.clone());

    let value = HeaderValue::from_bytes(
        r#"DASHBOARD_USER={"authUser":"José","SDID":"abc"}; HID=123"#.as_bytes(),
    )
    .unwrap();
    server
        .get("/apim/apis")
        .add_header(header::COOKIE, value)
        .await
        .assert_status_ok();

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].access_token, "abc123");
}

#[tokio::test]
async fn test_token_with_control_characters_is_bad_request() {
    let client = RecordingApimClient::new(StatusCode::OK, "{}");
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), client.clone());

    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(r#"DASHBOARD_USER={"SDID":"ab\ncd"}; HID=123"#))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], 400);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_missing_cookie_header_is_bad_request() {
    let client = RecordingApimClient::new(StatusCode::OK, "{}");
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), client.clone());

    let response = server.get("/apim/apis").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"code": 400, "message": "Missing Cookie header."})
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_unreadable_configuration_is_internal_error() {
    let client = RecordingApimClient::new(StatusCode::OK, "{}");
    let server = test_server(Arc::new(UnreadableAuthConfig), client.clone());

    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(
        body["message"],
        "Error occurred while retrieving Publisher server URL."
    );
    assert!(body["description"]
        .as_str()
        .unwrap()
        .contains("permission denied"));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_undecodable_body_is_internal_error_with_cause() {
    let client = RecordingApimClient::new(StatusCode::OK, "<html>login</html>");
    let server = test_server(urls(Some(constants::PUBLISHER_URL), None), client.clone());

    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(
        body["message"],
        "Error occurred while processing server response."
    );
    assert!(body["description"].is_string());
    assert_eq!(client.responses_issued(), 1);
    assert_eq!(client.responses_released(), 1);
}

#[tokio::test]
async fn test_unreachable_upstream_is_internal_error() {
    let server = http_test_server(urls(Some("http://127.0.0.1:1"), None));

    let response = server
        .get("/apim/apis")
        .add_header(header::COOKIE, cookie(constants::TEST_COOKIE))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["message"],
        "Error occurred while processing server response."
    );
}
