// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use super::*;
use crate::session::AuthEvent;

/// Serve a router on an ephemeral port and return its address.
async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(format!("http://{addr}"), Arc::new(SessionStore::ephemeral()))
}

fn ok_body(data: serde_json::Value) -> String {
    serde_json::json!({ "code": "200", "data": data }).to_string()
}

#[tokio::test]
async fn bearer_is_attached_only_with_a_token() {
    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    let router = Router::new().route(
        "/ping",
        get(move |headers: HeaderMap| {
            let seen = Arc::clone(&seen_clone);
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                seen.lock().expect("seen lock").push(auth);
                ok_body(serde_json::Value::Null)
            }
        }),
    );
    let addr = serve(router).await;

    let session = Arc::new(SessionStore::ephemeral());
    let client = ApiClient::new(format!("http://{addr}"), Arc::clone(&session));

    client.get("/ping", &[]).await.expect("anonymous request");
    session.establish("tok-xyz".to_owned(), Vec::new()).await;
    client.get("/ping", &[]).await.expect("authenticated request");

    let seen = seen.lock().expect("seen lock").clone();
    assert_eq!(seen, vec![None, Some("Bearer tok-xyz".to_owned())]);
}

#[tokio::test]
async fn get_with_body_goes_out_as_marked_post() {
    let seen: Arc<Mutex<Option<(Option<String>, String)>>> = Arc::new(Mutex::new(None));
    let seen_clone = Arc::clone(&seen);
    let router = Router::new().route(
        "/search",
        post(move |headers: HeaderMap, body: String| {
            let seen = Arc::clone(&seen_clone);
            async move {
                let marker = headers
                    .get(METHOD_OVERRIDE_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);
                *seen.lock().expect("seen lock") = Some((marker, body));
                ok_body(serde_json::Value::Null)
            }
        }),
    );
    let addr = serve(router).await;

    let client = client_for(addr);
    client
        .get_with_body("/search", &serde_json::json!({ "email": "a@b.co" }))
        .await
        .expect("request");

    let (marker, body) = seen.lock().expect("seen lock").clone().expect("captured");
    assert_eq!(marker.as_deref(), Some("GET"));
    assert!(body.contains("a@b.co"));
}

#[tokio::test]
async fn body_code_is_authoritative_over_http_success() {
    let router = Router::new().route(
        "/flaky",
        get(|| async { serde_json::json!({ "code": "500", "message": "backend exploded" }).to_string() }),
    );
    let addr = serve(router).await;

    let err = client_for(addr).get("/flaky", &[]).await.expect_err("body code error");
    assert_eq!(err.kind, ErrorKind::Unknown);
    assert_eq!(err.message, "backend exploded");
}

#[tokio::test]
async fn body_code_error_without_message_uses_generic_fallback() {
    let router =
        Router::new().route("/flaky", get(|| async { r#"{"code": "503"}"#.to_owned() }));
    let addr = serve(router).await;

    let err = client_for(addr).get("/flaky", &[]).await.expect_err("body code error");
    assert_eq!(err.message, GENERIC_MESSAGE);
}

#[tokio::test]
async fn unauthorized_wipes_session_and_broadcasts_redirect() {
    let router = Router::new().route(
        "/cart",
        get(|| async {
            (
                axum::http::StatusCode::UNAUTHORIZED,
                serde_json::json!({ "message": "token expired" }).to_string(),
            )
        }),
    );
    let addr = serve(router).await;

    let session = Arc::new(SessionStore::ephemeral());
    session.establish("stale-tok".to_owned(), vec!["CUSTOMER".to_owned()]).await;
    let mut rx = session.subscribe();

    let client = ApiClient::new(format!("http://{addr}"), Arc::clone(&session));
    let err = client.get("/cart", &[]).await.expect_err("401");

    assert_eq!(err.kind, ErrorKind::Auth);
    assert_eq!(err.message, "token expired");
    assert!(!session.is_authenticated().await);
    assert!(session.roles().await.is_empty());
    match rx.try_recv().expect("event") {
        AuthEvent::SessionExpired { redirect_to } => assert_eq!(redirect_to, "/login"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn forbidden_and_not_found_pass_the_server_payload_through() {
    let router = Router::new()
        .route(
            "/admin",
            get(|| async {
                (
                    axum::http::StatusCode::FORBIDDEN,
                    serde_json::json!({ "message": "admin only" }).to_string(),
                )
            }),
        )
        .route(
            "/missing",
            get(|| async {
                (
                    axum::http::StatusCode::NOT_FOUND,
                    serde_json::json!({ "message": "no such thing" }).to_string(),
                )
            }),
        );
    let addr = serve(router).await;
    let client = client_for(addr);

    let forbidden = client.get("/admin", &[]).await.expect_err("403");
    assert_eq!(forbidden.kind, ErrorKind::Forbidden);
    assert_eq!(forbidden.message, "admin only");

    let missing = client.get("/missing", &[]).await.expect_err("404");
    assert_eq!(missing.kind, ErrorKind::NotFound);
    assert_eq!(missing.message, "no such thing");
}

#[tokio::test]
async fn field_level_messages_become_validation_errors() {
    let router = Router::new().route(
        "/users/register",
        post(|| async {
            (
                axum::http::StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "message": "Validation failed",
                    "data": { "email": "Email already in use" },
                })
                .to_string(),
            )
        }),
    );
    let addr = serve(router).await;

    let err = client_for(addr)
        .post("/users/register", &serde_json::json!({ "email": "a@b.co" }))
        .await
        .expect_err("400");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "Validation failed");
    assert_eq!(err.field("email"), Some("Email already in use"));
}

#[tokio::test]
async fn no_response_yields_the_fixed_connectivity_message() {
    // Nothing listens on port 1.
    let session = Arc::new(SessionStore::ephemeral());
    let client = ApiClient::with_timeout(
        "http://127.0.0.1:1",
        session,
        std::time::Duration::from_secs(2),
    );

    let err = client.get("/categories", &[]).await.expect_err("refused");
    assert_eq!(err.kind, ErrorKind::Connectivity);
    assert_eq!(err.message, crate::error::CONNECT_MESSAGE);
}

#[tokio::test]
async fn success_envelope_decodes_data_payload() {
    let router = Router::new().route(
        "/products/7",
        get(|| async { ok_body(serde_json::json!({ "id": 7, "productName": "Mango" })) }),
    );
    let addr = serve(router).await;

    let envelope = client_for(addr).get("/products/7", &[]).await.expect("envelope");
    assert_eq!(envelope.code, SUCCESS_CODE);
    let product: crate::api::products::Product = envelope.data_as().expect("product");
    assert_eq!(product.id, 7);
    assert_eq!(product.product_name, "Mango");
}

#[tokio::test]
async fn malformed_success_body_is_an_unknown_error() {
    let router = Router::new().route("/weird", get(|| async { "not json".to_owned() }));
    let addr = serve(router).await;

    let err = client_for(addr).get("/weird", &[]).await.expect_err("parse failure");
    assert_eq!(err.kind, ErrorKind::Unknown);
    assert!(err.message.starts_with("malformed response body"));
}
