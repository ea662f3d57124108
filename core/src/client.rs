//! The shared client: request construction, transport dispatch and decoding.
//!
//! # Design
//! `Client` holds an immutable `ClientConfig` and a shared `Transport`, and
//! carries no mutable state between calls. Resource-specific clients borrow
//! it and only decide paths, verbs and list ordering. Everything here is a
//! single attempt: no retries, no caching, no timeout override.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::resource::{ResourceClient, VersionedResource};
use crate::types::{BigQuery, S3};
use crate::version::VersionClient;

const JSON: &str = "application/json";

/// A decoded payload together with the response it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub response: HttpResponse,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Entry point for the configuration API.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client backed by the blocking `ureq` transport.
    #[cfg(feature = "ureq-transport")]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, crate::transport::UreqTransport::new())
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn versions(&self) -> VersionClient<'_> {
        VersionClient::new(self)
    }

    pub fn bigquery(&self) -> ResourceClient<'_, BigQuery> {
        self.resource()
    }

    pub fn s3(&self) -> ResourceClient<'_, S3> {
        self.resource()
    }

    /// Client for any version-scoped resource type.
    pub fn resource<R: VersionedResource>(&self) -> ResourceClient<'_, R> {
        ResourceClient::new(self)
    }

    /// Bodiless request for `path` relative to the base URL.
    pub(crate) fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.config.base_url()),
            headers: vec![
                ("accept".to_string(), JSON.to_string()),
                ("user-agent".to_string(), self.config.user_agent().to_string()),
            ],
            body: None,
        }
    }

    /// Request whose body is the JSON serialization of `body`.
    pub(crate) fn json_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &T,
    ) -> Result<HttpRequest> {
        let body = serde_json::to_string(body).map_err(ApiError::Encode)?;
        let mut request = self.request(method, path);
        request
            .headers
            .push(("content-type".to_string(), JSON.to_string()));
        request.body = Some(body);
        Ok(request)
    }

    /// Hand `request` to the transport. Status codes are not inspected here.
    pub(crate) fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let (method, url) = (request.method, request.url.clone());
        let response = self.transport.execute(request)?;
        tracing::debug!(%method, %url, status = response.status, "request complete");
        Ok(response)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    match response.status {
        200..=299 => Ok(response),
        404 => Err(ApiError::NotFound { response }),
        _ => Err(ApiError::Status { response }),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<T>> {
    match serde_json::from_str(&response.body) {
        Ok(data) => Ok(ApiResponse { data, response }),
        Err(source) => Err(ApiError::Decode { response, source }),
    }
}
