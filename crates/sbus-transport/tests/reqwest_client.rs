// crates/sbus-transport/tests/reqwest_client.rs
// ============================================================================
// Module: HTTP Client Integration Tests
// Description: Production client and signing decorator against a live server.
// Purpose: Pin wire behavior of the reqwest implementation and token injection.
// Dependencies: sbus-core, sbus-transport, tiny_http
// ============================================================================

//! ## Overview
//! Runs the production `reqwest` client and the signing decorator against a
//! local `tiny_http` server, asserting the verbs, headers, and bodies that
//! actually hit the wire: authorization injection, role default headers,
//! header preservation, and response header normalization.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::thread;

use sbus_core::Endpoint;
use sbus_core::EndpointRole;
use sbus_core::Headers;
use sbus_transport::ClientConfig;
use sbus_transport::HttpClient;
use sbus_transport::HttpClientConfig;
use sbus_transport::HttpMethod;
use sbus_transport::HttpRequest;
use sbus_transport::ReqwestClient;
use sbus_transport::SENDER_CONTENT_TYPE;
use sbus_transport::SasClient;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Observed shape of one request as the server saw it.
struct SeenRequest {
    /// HTTP verb.
    method: String,
    /// Request path.
    path: String,
    /// Request headers, lowercased names.
    headers: Headers,
    /// Request body.
    body: String,
}

/// Serves one request, records it, and replies with the given response.
fn one_shot_server(
    status: u16,
    response_headers: Vec<(&'static str, &'static str)>,
) -> (String, thread::JoinHandle<SeenRequest>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = format!("http://{addr}");

    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut headers = Headers::new();
        for header in request.headers() {
            headers.insert(
                header.field.as_str().as_str().to_ascii_lowercase(),
                header.value.as_str().to_string(),
            );
        }
        let mut body = String::new();
        request.as_reader().read_to_string(&mut body).unwrap();
        let seen = SeenRequest {
            method: request.method().to_string(),
            path: request.url().to_string(),
            headers,
            body,
        };

        let mut response = Response::from_string("response body").with_status_code(status);
        for (name, value) in response_headers {
            response
                .add_header(Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap());
        }
        request.respond(response).unwrap();
        seen
    });

    (url, handle)
}

/// Builds a signing client over the production HTTP client for a local URL.
fn local_sas_client(base_url: &str, default_headers: Headers) -> SasClient<ReqwestClient> {
    let config = ClientConfig {
        endpoint: Endpoint::from_url(EndpointRole::Receiver, base_url),
        shared_access_key_name: "KeyName".to_string(),
        shared_access_key: "Key".to_string(),
        token_expiry: 3600,
        default_headers,
    };
    let inner = ReqwestClient::new(&HttpClientConfig::default()).expect("client builds");
    SasClient::new(inner, config).expect("signing client builds")
}

// ============================================================================
// SECTION: Production Client
// ============================================================================

#[test]
fn posts_carry_headers_and_body_and_normalize_response_headers() {
    let (url, handle) = one_shot_server(201, vec![("BrokerProperties", "{}")]);
    let client = ReqwestClient::new(&HttpClientConfig::default()).expect("client builds");

    let mut headers = Headers::new();
    headers.insert("X-Custom".to_string(), "custom".to_string());
    let response = client
        .request(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{url}/entity/messages"),
            headers,
            body: Some("payload".to_string()),
        })
        .expect("round trip succeeds");

    let seen = handle.join().expect("server thread finishes");
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/entity/messages");
    assert_eq!(seen.body, "payload");
    assert_eq!(seen.headers.get("x-custom").map(String::as_str), Some("custom"));

    assert_eq!(response.status, 201);
    assert_eq!(response.body, "response body");
    assert_eq!(response.header("brokerproperties"), Some("{}"));
    assert_eq!(response.header("BrokerProperties"), Some("{}"));
}

#[test]
fn deletes_send_no_body() {
    let (url, handle) = one_shot_server(200, Vec::new());
    let client = ReqwestClient::new(&HttpClientConfig::default()).expect("client builds");

    client
        .request(HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{url}/entity/messages/id/token"),
            headers: Headers::new(),
            body: None,
        })
        .expect("round trip succeeds");

    let seen = handle.join().expect("server thread finishes");
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.path, "/entity/messages/id/token");
    assert_eq!(seen.body, "");
}

#[test]
fn unreachable_servers_fail_visibly() {
    let client = ReqwestClient::new(&HttpClientConfig {
        timeout_ms: 500,
        ..HttpClientConfig::default()
    })
    .expect("client builds");

    let result = client.request(HttpRequest {
        method: HttpMethod::Post,
        // Reserved TEST-NET-1 address, nothing listens there.
        url: "http://192.0.2.1:9/messages".to_string(),
        headers: Headers::new(),
        body: None,
    });

    assert!(result.is_err());
}

// ============================================================================
// SECTION: Signing Decorator
// ============================================================================

#[test]
fn decorated_requests_carry_a_fresh_shared_access_signature() {
    let (url, handle) = one_shot_server(201, Vec::new());
    let client = local_sas_client(&url, Headers::new());

    client
        .request(HttpRequest {
            method: HttpMethod::Post,
            url: "messages/head".to_string(),
            headers: Headers::new(),
            body: None,
        })
        .expect("round trip succeeds");

    let seen = handle.join().expect("server thread finishes");
    assert_eq!(seen.path, "/messages/head");
    let authorization = seen.headers.get("authorization").expect("authorization present");
    assert!(authorization.starts_with("SharedAccessSignature sig="));
    assert!(authorization.contains("&skn=KeyName&sr="));
}

#[test]
fn role_default_headers_reach_the_wire_without_clobbering_request_headers() {
    let (url, handle) = one_shot_server(201, Vec::new());
    let mut defaults = Headers::new();
    defaults.insert("Content-Type".to_string(), SENDER_CONTENT_TYPE.to_string());
    defaults.insert("X-Role".to_string(), "default".to_string());
    let client = local_sas_client(&url, defaults);

    let mut headers = Headers::new();
    headers.insert("X-Role".to_string(), "request".to_string());
    client
        .request(HttpRequest {
            method: HttpMethod::Post,
            url: "messages".to_string(),
            headers,
            body: Some("payload".to_string()),
        })
        .expect("round trip succeeds");

    let seen = handle.join().expect("server thread finishes");
    assert_eq!(
        seen.headers.get("content-type").map(String::as_str),
        Some(SENDER_CONTENT_TYPE)
    );
    assert_eq!(seen.headers.get("x-role").map(String::as_str), Some("request"));
}
