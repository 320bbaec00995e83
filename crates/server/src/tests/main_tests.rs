use super::*;
use axum::{body, body::Body, http::Request};
use serde_json::json;
use shared::endpoints::ServiceEndpoints;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tower::ServiceExt;

async fn spawn_upstream() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let upstream = Router::new()
        .route(
            "/analyze",
            post(|Json(body): Json<Value>| async move {
                match body.get("url").and_then(Value::as_str) {
                    Some("teapot") => (StatusCode::IM_A_TEAPOT, Json(json!({ "detail": "teapot" }))),
                    Some("") | None => (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "detail": "URL is required" })),
                    ),
                    Some(url) => (
                        StatusCode::OK,
                        Json(json!({ "analysis": format!("analysis of {url}"), "content": "C" })),
                    ),
                }
            }),
        )
        .route(
            "/revise",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "revised": format!("{} + {}", body["content"], body["suggestions"]) }))
            }),
        )
        .route(
            "/broken/analyze",
            post(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>") }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, upstream).await;
    });
    format!("http://{addr}")
}

fn test_app(upstream_base: &str) -> Router {
    let endpoints = ServiceEndpoints::parse(upstream_base).expect("endpoints");
    build_router(Arc::new(AppState::new(endpoints)))
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app("http://localhost:8000");
    let request = Request::get("/healthz")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn upstream_error_status_and_body_pass_through_unchanged() {
    let app = test_app(&spawn_upstream().await);

    let response = app
        .oneshot(json_post("/api/analyze", json!({ "url": "teapot" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(read_json(response).await, json!({ "detail": "teapot" }));
}

#[tokio::test]
async fn analyze_success_is_relayed() {
    let app = test_app(&spawn_upstream().await);

    let response = app
        .oneshot(json_post(
            "/api/analyze",
            json!({ "url": "https://docs.example.com/api" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({ "analysis": "analysis of https://docs.example.com/api", "content": "C" })
    );
}

#[tokio::test]
async fn legacy_analyze_address_still_reaches_revise() {
    let upstream = spawn_upstream().await;
    let app = test_app(&format!("{upstream}/analyze"));

    let response = app
        .oneshot(json_post(
            "/api/revise",
            json!({ "content": "C", "suggestions": "A" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "revised": "\"C\" + \"A\"" }));
}

#[tokio::test]
async fn body_without_json_content_type_is_still_forwarded() {
    let app = test_app(&spawn_upstream().await);

    let request = Request::post("/api/analyze")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"url":"https://docs.example.com/guide"}"#))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!({ "analysis": "analysis of https://docs.example.com/guide", "content": "C" })
    );
}

#[tokio::test]
async fn oversize_body_is_rejected_with_detail_before_forwarding() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let hits = Arc::new(AtomicUsize::new(0));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let counter = Arc::clone(&hits);
    let upstream = Router::new().route(
        "/analyze",
        post(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(json!({ "analysis": "A", "content": "C" }))
            }
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, upstream).await;
    });
    let app = test_app(&format!("http://{addr}"));

    let payload = format!(r#"{{"url":"{}"}}"#, "a".repeat(MAX_RELAY_BODY_BYTES + 1));
    let request = Request::post("/api/analyze")
        .header("content-type", "application/json")
        .header("content-length", payload.len().to_string())
        .body(Body::from(payload))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = read_json(response).await;
    assert!(body["detail"]
        .as_str()
        .expect("detail")
        .contains("byte limit"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn upstream_json_413_passes_through_untouched() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let upstream = Router::new().route(
        "/analyze",
        post(|| async {
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "detail": "page too large to analyze" })),
            )
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, upstream).await;
    });
    let app = test_app(&format!("http://{addr}"));

    let response = app
        .oneshot(json_post("/api/analyze", json!({ "url": "x" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        read_json(response).await,
        json!({ "detail": "page too large to analyze" })
    );
}

#[tokio::test]
async fn invalid_json_body_is_rejected_before_forwarding() {
    let app = test_app("http://localhost:8000");

    let request = Request::post("/api/analyze")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["detail"]
        .as_str()
        .expect("detail")
        .contains("not valid JSON"));
}

#[tokio::test]
async fn non_json_upstream_reply_becomes_bad_gateway() {
    let upstream = spawn_upstream().await;
    let app = test_app(&format!("{upstream}/broken"));

    let response = app
        .oneshot(json_post("/api/analyze", json!({ "url": "x" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert!(body["detail"].as_str().expect("detail").contains("non-JSON"));
}

#[tokio::test]
async fn unreachable_upstream_becomes_bad_gateway() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let app = test_app(&format!("http://{addr}"));

    let response = app
        .oneshot(json_post("/api/analyze", json!({ "url": "x" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert!(body["detail"]
        .as_str()
        .expect("detail")
        .contains("unreachable"));
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let app = test_app("http://localhost:8000");

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/analyze")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
