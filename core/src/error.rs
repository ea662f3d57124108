//! Error types for the configuration API client.
//!
//! # Design
//! Errors fall into two groups. `Encode` happens while building a request,
//! so nothing was sent. Every other variant happens after the attempt, and
//! the ones that got an answer from the server keep the raw `HttpResponse`
//! so callers can inspect status, headers and body. `NotFound` gets its own
//! variant because callers routinely branch on it; everything else that is
//! not 2xx lands in `Status`.

use thiserror::Error;

use crate::http::{HttpResponse, TransportError};

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by resource client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be serialized; no request was sent.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The transport could not complete the exchange.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 404.
    #[error("resource not found: {}", .response.body)]
    NotFound { response: HttpResponse },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {}: {}", .response.status, .response.body)]
    Status { response: HttpResponse },

    /// A 2xx body did not match the expected shape.
    #[error("failed to decode response body: {source}")]
    Decode {
        response: HttpResponse,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// The raw response, when the server answered at all.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::NotFound { response }
            | ApiError::Status { response }
            | ApiError::Decode { response, .. } => Some(response),
            ApiError::Encode(_) | ApiError::Transport(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// Errors raised while assembling a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {scheme:?} in {url:?}, expected http or https")]
    UnsupportedScheme { url: String, scheme: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: r#"{"msg":"Record not found"}"#.to_string(),
        }
    }

    #[test]
    fn server_errors_expose_the_response() {
        let err = ApiError::Status {
            response: response(500),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), r#"HTTP 500: {"msg":"Record not found"}"#);
    }

    #[test]
    fn not_found_is_recognised() {
        let err = ApiError::NotFound {
            response: response(404),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn transport_failures_carry_no_response() {
        let err: ApiError =
            TransportError::new(HttpMethod::Get, "http://localhost/", "connection reset").into();
        assert!(err.response().is_none());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "GET http://localhost/ failed: connection reset");
    }
}
