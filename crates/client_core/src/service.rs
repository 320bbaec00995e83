use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    endpoints::ServiceEndpoints,
    error::detail_message,
    protocol::{AnalyzeRequest, AnalyzeResponse, ReviseRequest, ReviseResponse},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::ServiceError;

/// The two calls the controller makes against the analysis service.
#[async_trait]
pub trait DocService: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, ServiceError>;
    async fn revise(&self, request: &ReviseRequest) -> Result<ReviseResponse, ServiceError>;
}

#[derive(Clone)]
pub struct HttpDocService {
    http: Client,
    endpoints: ServiceEndpoints,
}

impl HttpDocService {
    pub fn new(endpoints: ServiceEndpoints) -> Self {
        Self::with_client(Client::new(), endpoints)
    }

    pub fn with_client(http: Client, endpoints: ServiceEndpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    async fn post_json<Req, Resp>(&self, target: &Url, body: &Req) -> Result<Resp, ServiceError>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .http
            .post(target.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(detail_message);
            warn!(%target, status = status.as_u16(), ?detail, "analysis service call failed");
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        debug!(%target, status = status.as_u16(), "analysis service call succeeded");
        response
            .json::<Resp>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocService for HttpDocService {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, ServiceError> {
        self.post_json(self.endpoints.analyze_url(), request).await
    }

    async fn revise(&self, request: &ReviseRequest) -> Result<ReviseResponse, ServiceError> {
        self.post_json(self.endpoints.revise_url(), request).await
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
