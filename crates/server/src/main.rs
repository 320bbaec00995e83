use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use shared::error::ErrorDetail;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod app_state;
mod config;
mod relay;

use app_state::AppState;
use config::load_settings;
use relay::forward_json;

const MAX_RELAY_BODY_BYTES: usize = 2 * 1024 * 1024;

type RelayResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<ErrorDetail>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let endpoints = settings.endpoints()?;
    info!(upstream = %endpoints, "relaying to analysis service");

    let app = build_router(Arc::new(AppState::new(endpoints)));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "relay listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/analyze", post(relay_analyze))
        .route("/api/revise", post(relay_revise))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_RELAY_BODY_BYTES))
        .layer(middleware::map_response(oversize_body_as_detail))
        .with_state(state)
}

/// Rewrites the body limit's plain-text 413 into the `{detail}` error shape.
/// A JSON 413 relayed from upstream is left alone.
async fn oversize_body_as_detail(response: Response) -> Response {
    let is_json = response.headers().get(header::CONTENT_TYPE)
        == Some(&HeaderValue::from_static("application/json"));
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json {
        return response;
    }
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(ErrorDetail::new(format!(
            "request body exceeds the {MAX_RELAY_BODY_BYTES} byte limit"
        ))),
    )
        .into_response()
}

async fn healthz() -> &'static str {
    "ok"
}

async fn relay_analyze(State(state): State<Arc<AppState>>, body: Bytes) -> RelayResult {
    relay_to(&state, state.endpoints.analyze_url(), &body).await
}

async fn relay_revise(State(state): State<Arc<AppState>>, body: Bytes) -> RelayResult {
    relay_to(&state, state.endpoints.revise_url(), &body).await
}

async fn relay_to(state: &AppState, target: &Url, body: &[u8]) -> RelayResult {
    let body: Value = serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDetail::new(format!("request body is not valid JSON: {e}"))),
        )
    })?;

    match forward_json(&state.http, target, &body).await {
        Ok((status, payload)) => Ok((status, Json(payload))),
        Err(error) => {
            warn!(%target, %error, "relay to analysis service failed");
            Err((error.status(), Json(error.detail())))
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
