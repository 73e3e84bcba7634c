//! HTTP error handling for the macro gate.
//!
//! Policy rejections are never errors; they are ordinary `no_trade`
//! decisions. Errors here are request faults rendered uniformly as
//!
//! ```json
//! {"ok": false, "code": 401, "error": "missing api key"}
//! ```
//!
//! | Status | Variant |
//! |--------|---------|
//! | 400 | [`ApiError::BadRequest`] |
//! | 401 | [`ApiError::MissingApiKey`], [`ApiError::InvalidApiKey`], [`ApiError::UnauthorizedMetrics`] |
//! | 429 | [`ApiError::RateLimited`] |
//! | 500 | [`ApiError::Internal`] |

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header carrying the epoch second at which the rate window resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Uniform error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false.
    pub ok: bool,
    /// HTTP status code.
    pub code: u16,
    /// Error message.
    pub error: String,
}

/// Request-level failures.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No key in the header or query.
    #[error("missing api key")]
    MissingApiKey,

    /// Key not in the configured set.
    #[error("invalid api key")]
    InvalidApiKey,

    /// `/metrics` called without a valid header key.
    #[error("unauthorized metrics")]
    UnauthorizedMetrics,

    /// Sliding window is full for this key.
    #[error("rate limit exceeded")]
    RateLimited {
        /// Window length, sent as `Retry-After`.
        retry_after_secs: u64,
        /// Epoch second of the next minute boundary.
        reset_epoch: i64,
    },

    /// Malformed body or structurally invalid field.
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected server-side failure. The detail is logged, never returned.
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::InvalidApiKey | Self::UnauthorizedMetrics => {
                StatusCode::UNAUTHORIZED
            }
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Uniform body for this error.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            ok: false,
            code: self.status().as_u16(),
            error: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(detail = %detail, "Internal error");
        }

        let mut response = (self.status(), Json(self.body())).into_response();

        if let Self::RateLimited {
            retry_after_secs,
            reset_epoch,
        } = self
        {
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            headers.insert(RATE_LIMIT_RESET_HEADER, HeaderValue::from(reset_epoch));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ApiError::MissingApiKey, 401, "missing api key")]
    #[test_case(ApiError::InvalidApiKey, 401, "invalid api key")]
    #[test_case(ApiError::UnauthorizedMetrics, 401, "unauthorized metrics")]
    #[test_case(ApiError::BadRequest("bad direction".into()), 400, "bad direction")]
    #[test_case(ApiError::Internal("db gone".into()), 500, "internal error")]
    fn body_is_uniform(err: ApiError, code: u16, message: &str) {
        let body = err.body();
        assert!(!body.ok);
        assert_eq!(body.code, code);
        assert_eq!(body.error, message);
    }

    #[test]
    fn rate_limited_response_carries_retry_headers() {
        let response = ApiError::RateLimited {
            retry_after_secs: 60,
            reset_epoch: 1_700_000_040,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");
        assert_eq!(response.headers()[RATE_LIMIT_RESET_HEADER], "1700000040");
    }

    #[test]
    fn other_errors_have_no_retry_headers() {
        let response = ApiError::MissingApiKey.into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
