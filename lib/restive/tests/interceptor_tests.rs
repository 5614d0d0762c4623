//! Integration tests for request interceptors.

use std::sync::{Arc, Mutex};

use restive::interceptor::{SetContentType, SetHeader};
use restive::{Error, Failure, HyperTransport, Method, Request, RestClient};
use tower::limit::ConcurrencyLimitLayer;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn url(server: &MockServer, path: &str) -> url::Url {
    url::Url::parse(&format!("{}{path}", server.uri())).expect("url")
}

/// Test that an installed header interceptor reaches the server.
#[tokio::test]
async fn test_header_interceptor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("foo", "bar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = RestClient::default();
    client.install(SetHeader::new("foo", "bar").expect("header"));

    let request = Request::builder(Method::GET, url(&mock_server, "/health"))
        .build()
        .expect("request");

    let result = client.send(request, &[]).await;
    assert!(result.is_ok());
}

/// Test that auth helpers set the Authorization header.
#[tokio::test]
async fn test_auth_interceptors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bearer"))
        .and(header("Authorization", "Bearer my-secret-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/basic"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bearer = RestClient::builder(HyperTransport::new())
        .bearer_auth("my-secret-token")
        .expect("bearer")
        .build();
    let basic = RestClient::builder(HyperTransport::new())
        .basic_auth("user", "pass")
        .expect("basic")
        .build();

    let request = Request::builder(Method::GET, url(&mock_server, "/bearer"))
        .build()
        .expect("request");
    assert!(bearer.send(request, &[]).await.is_ok());

    let request = Request::builder(Method::GET, url(&mock_server, "/basic"))
        .build()
        .expect("request");
    assert!(basic.send(request, &[]).await.is_ok());
}

/// Test that the content-type interceptor only touches requests with a body.
#[tokio::test]
async fn test_content_type_only_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/jobs"))
        .and(header("Content-Type", "application/json; charset=utf-8"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = RestClient::default();
    client.install(SetContentType::json());

    let post = Request::builder(Method::POST, url(&mock_server, "/jobs"))
        .body(bytes::Bytes::from_static(br#"{"name":"build"}"#))
        .build()
        .expect("request");
    assert!(client.send(post, &[201]).await.is_ok());

    let get = Request::builder(Method::GET, url(&mock_server, "/jobs"))
        .build()
        .expect("request");
    assert!(client.send(get, &[]).await.is_ok());

    let requests = mock_server.received_requests().await.expect("recorded requests");
    let get = requests
        .iter()
        .find(|request| request.method.as_str() == "GET")
        .expect("GET request");
    assert!(get.headers.get("content-type").is_none());
}

/// Test that the last installed interceptor runs first.
#[tokio::test]
async fn test_install_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("x-seen", "b>a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let order = Arc::new(Mutex::new(Vec::new()));

    let marker = |name: &'static str| {
        let order = Arc::clone(&order);
        move |request: &mut Request| -> restive::Result<()> {
            order.lock().expect("lock").push(name);
            let seen = match request.header("x-seen") {
                Some(previous) => format!("{previous}>{name}"),
                None => name.to_string(),
            };
            request
                .headers_mut()
                .insert("x-seen", seen.parse().expect("header value"));
            Ok(())
        }
    };

    let mut client = RestClient::default();
    client.install(marker("a"));
    client.install(marker("b"));

    let request = Request::builder(Method::GET, url(&mock_server, "/health"))
        .build()
        .expect("request");

    assert!(client.send(request, &[]).await.is_ok());
    assert_eq!(*order.lock().expect("lock"), ["b", "a"]);
}

/// Test that a failing interceptor aborts the call before any I/O.
#[tokio::test]
async fn test_interceptor_error_aborts_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = RestClient::default();
    client.install(|_: &mut Request| -> restive::Result<()> {
        Err(Error::invalid_request("missing credentials"))
    });

    let request = Request::builder(Method::GET, url(&mock_server, "/health"))
        .build()
        .expect("request");

    let err = client.send(request, &[]).await.expect_err("aborted call");
    assert!(err.is_transport());
    assert!(err.to_string().ends_with("failed: invalid request: missing credentials"));
    assert!(matches!(
        err.failure(),
        Failure::Transport(Error::InvalidRequest(reason)) if reason == "missing credentials"
    ));
}

/// Test that clones taken before an install keep the previous stack.
#[tokio::test]
async fn test_install_does_not_affect_earlier_clones() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut client = RestClient::default();
    let earlier = client.clone();
    client.install(|_: &mut Request| -> restive::Result<()> {
        Err(Error::invalid_request("blocked"))
    });

    let request = Request::builder(Method::GET, url(&mock_server, "/health"))
        .build()
        .expect("request");
    assert!(earlier.send(request, &[]).await.is_ok());

    let request = Request::builder(Method::GET, url(&mock_server, "/health"))
        .build()
        .expect("request");
    assert!(client.send(request, &[]).await.is_err());
}

#[test]
fn test_invalid_header_is_rejected_at_install_time() {
    let err = SetHeader::new("foo bar", "baz").expect_err("invalid name");
    assert!(matches!(err, Error::InvalidHeader { ref name, .. } if name == "foo bar"));

    let err = SetHeader::new("foo", "line\nbreak").expect_err("invalid value");
    assert!(err.to_string().starts_with("invalid header \"foo\""));
}

/// Test that logging composes with interceptors.
#[tokio::test]
async fn test_logging_with_interceptors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .and(header("x-api-key", "secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"logged": true})),
        )
        .mount(&mock_server)
        .await;

    let client = RestClient::builder(HyperTransport::new())
        .with_debug_logging()
        .header("X-Api-Key", "secret")
        .expect("header")
        .with_logging()
        .build();

    let request = Request::builder(Method::GET, url(&mock_server, "/logged"))
        .build()
        .expect("request");

    let body: serde_json::Value = client.fetch(request, &[]).await.expect("body");
    assert_eq!(body["logged"], true);
}

/// Test that interceptors compose with a tower layer that needs `poll_ready`.
#[tokio::test]
async fn test_interceptors_over_concurrency_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .and(header("x-client", "restive"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut client = RestClient::builder(HyperTransport::new())
        .layer(ConcurrencyLimitLayer::new(1))
        .header("x-client", "restive")
        .expect("header")
        .with_logging()
        .build();
    client.install(|_: &mut Request| -> restive::Result<()> { Ok(()) });

    for _ in 0..3 {
        let request = Request::builder(Method::GET, url(&mock_server, "/limited"))
            .build()
            .expect("request");
        let result = client.send(request, &[204]).await;
        assert!(result.is_ok());
    }
}
