//! Verbatim JSON forwarding to the analysis service.

use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use shared::error::ErrorDetail;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub(crate) enum RelayError {
    #[error("analysis service at {target} is unreachable: {source}")]
    Unreachable {
        target: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("analysis service at {target} answered {status} with a non-JSON body")]
    NonJsonBody {
        target: Url,
        status: u16,
        #[source]
        source: reqwest::Error,
    },
}

impl RelayError {
    pub(crate) fn status(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    pub(crate) fn detail(&self) -> ErrorDetail {
        ErrorDetail::new(self.to_string())
    }
}

/// POSTs `body` to `target` and hands back the upstream status and JSON body
/// unchanged. There is no retry and no timeout.
pub(crate) async fn forward_json(
    http: &Client,
    target: &Url,
    body: &Value,
) -> Result<(StatusCode, Value), RelayError> {
    let response = http
        .post(target.clone())
        .json(body)
        .send()
        .await
        .map_err(|source| RelayError::Unreachable {
            target: target.clone(),
            source,
        })?;

    let status = response.status();
    let payload = response
        .json::<Value>()
        .await
        .map_err(|source| RelayError::NonJsonBody {
            target: target.clone(),
            status: status.as_u16(),
            source,
        })?;

    info!(%target, status = status.as_u16(), "relayed upstream response");
    Ok((status, payload))
}

#[cfg(test)]
#[path = "tests/relay_tests.rs"]
mod tests;
