//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the evaluation use case.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Query, Request, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::application::dto::{DecisionDto, EvaluationDto, VerdictDto};
use crate::application::use_cases::EvaluateTradeUseCase;
use crate::config::BuildInfo;
use crate::error::{ApiError, RATE_LIMIT_RESET_HEADER};
use crate::observability::{record_auth_failure, record_rate_limit_hit};

use super::auth::{API_KEY_HEADER, ApiKeys, mask_key};
use super::rate_limit::SlidingWindowLimiter;
use super::request::{ConstraintsRequest, DecideRequest, GateRequest, KeyQuery};
use super::response::{HealthResponse, IndexResponse, VersionResponse};

/// Service name reported by `/` and `/version`.
pub const SERVICE_NAME: &str = "Macro Gate";

/// Routes listed by `/`.
pub const ENDPOINTS: [&str; 6] = [
    "/healthz",
    "/version",
    "/metrics",
    "/v1/constraints",
    "/v1/gate",
    "/v1/decide",
];

const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Decision cycle use case.
    pub evaluate: Arc<EvaluateTradeUseCase>,
    /// Accepted API keys.
    pub api_keys: Arc<ApiKeys>,
    /// Per-key rate limiter.
    pub rate_limiter: Arc<SlidingWindowLimiter>,
    /// Prometheus handle backing `/metrics`.
    pub metrics: Option<PrometheusHandle>,
    /// Build metadata.
    pub build: Arc<BuildInfo>,
}

impl AppState {
    /// Create state without a metrics handle.
    #[must_use]
    pub fn new(
        evaluate: EvaluateTradeUseCase,
        api_keys: ApiKeys,
        rate_limiter: SlidingWindowLimiter,
        build: BuildInfo,
    ) -> Self {
        Self {
            evaluate: Arc::new(evaluate),
            api_keys: Arc::new(api_keys),
            rate_limiter: Arc::new(rate_limiter),
            metrics: None,
            build: Arc::new(build),
        }
    }

    /// Attach the Prometheus handle.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    fn version_response(&self) -> VersionResponse {
        VersionResponse {
            name: SERVICE_NAME.to_string(),
            version: self.build.version.clone(),
            git_sha: self.build.git_sha.clone(),
            built_at: self.build.built_at.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/v1/constraints", post(build_constraints))
        .route("/v1/gate", post(gate_candidate))
        .route("/v1/decide", post(decide))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/version", get(version))
        .route("/metrics", get(render_metrics))
        .merge(v1)
        .with_state(state)
}

/// Authenticate, rate limit, and stamp quota headers on the response.
async fn require_api_key(
    State(state): State<AppState>,
    query: Result<Query<KeyQuery>, QueryRejection>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let header_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    let key = state
        .api_keys
        .authorize(header_key, query.key.as_deref())
        .inspect_err(|e| {
            let reason = if matches!(e, ApiError::MissingApiKey) {
                "missing"
            } else {
                "invalid"
            };
            record_auth_failure(reason);
            tracing::warn!(reason, path = %request.uri().path(), "Rejected API key");
        })?;

    let status = state.rate_limiter.check(&key).inspect_err(|_| {
        record_rate_limit_hit();
        tracing::warn!(api_key = %mask_key(&key), "Rate limit exceeded");
    })?;

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(status.limit));
    headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(status.remaining));
    headers.insert(RATE_LIMIT_RESET_HEADER, HeaderValue::from(status.reset_epoch));
    Ok(response)
}

fn bad_request(rejection: &JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Service index.
async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        version: state.version_response(),
        endpoints: ENDPOINTS.iter().map(ToString::to_string).collect(),
    })
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Build metadata.
async fn version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(state.version_response())
}

/// Prometheus text exposition. Requires a valid key in the header.
async fn render_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let authorized = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|k| state.api_keys.contains(k));
    if !authorized {
        record_auth_failure("metrics");
        return Err(ApiError::UnauthorizedMetrics);
    }

    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| ApiError::Internal("metrics recorder not installed".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response())
}

/// Run the Constraint Builder.
async fn build_constraints(
    State(state): State<AppState>,
    payload: Result<Json<ConstraintsRequest>, JsonRejection>,
) -> Result<Json<DecisionDto>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_request(&e))?;
    Ok(Json(state.evaluate.build_constraints(
        request.macro_snapshot.unwrap_or_default(),
        request.portfolio.unwrap_or_default(),
    )))
}

/// Run the Trade Gate for one candidate.
async fn gate_candidate(
    State(state): State<AppState>,
    payload: Result<Json<GateRequest>, JsonRejection>,
) -> Result<Json<VerdictDto>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_request(&e))?;
    Ok(Json(state.evaluate.gate_candidate(
        &request.constraints.unwrap_or_default(),
        request.candidate.unwrap_or_default(),
        request.macro_state.unwrap_or_default(),
        request.mtf_trend.unwrap_or_default(),
    )))
}

/// Run the full decision cycle.
async fn decide(
    State(state): State<AppState>,
    payload: Result<Json<DecideRequest>, JsonRejection>,
) -> Result<Json<EvaluationDto>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_request(&e))?;
    Ok(Json(state.evaluate.evaluate(
        request.macro_snapshot.unwrap_or_default(),
        request.portfolio.unwrap_or_default(),
        request.mtf_trend.unwrap_or_default(),
        request.candidates.unwrap_or_default(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const KEY: &str = "test-key-123";

    fn state_with_capacity(capacity: usize) -> AppState {
        AppState::new(
            EvaluateTradeUseCase::default(),
            ApiKeys::new(vec![KEY.to_string()]),
            SlidingWindowLimiter::new(capacity),
            BuildInfo::default(),
        )
    }

    fn app() -> Router {
        create_router(state_with_capacity(60))
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header(API_KEY_HEADER, KEY)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_index_and_version() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["name"], SERVICE_NAME);
        assert_eq!(body["git_sha"], "dev");
        assert!(body["endpoints"].as_array().unwrap().contains(&json!("/v1/decide")));

        let response = app()
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body.get("endpoints").is_none());
    }

    #[tokio::test]
    async fn test_constraints_endpoint() {
        let body = json!({
            "macro": {"state": "risk_off", "confidence": "low"},
            "portfolio": {"open_risk_R": 0.5},
        });
        let response = app().oneshot(post_json("/v1/constraints", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(RATE_LIMIT_REMAINING_HEADER));
        let body = body_json(response).await;
        assert_eq!(body["decision"], "ok");
        assert!(body["reason"].is_null());
        assert_eq!(body["constraints"]["ban_new_counter_trend_longs"], true);
        assert_eq!(body["constraints"]["cap_initial_risk_R"], 0.5);
        assert_eq!(body["constraints"]["size_multiplier"], 0.25);
    }

    #[tokio::test]
    async fn test_constraints_veto_is_a_200() {
        let body = json!({"macro": {"state": "caution"}, "portfolio": {"open_risk_R": 2.0, "buckets": {"btc_beta": 1.6}}});
        let response = app().oneshot(post_json("/v1/constraints", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["decision"], "no_trade");
        assert_eq!(body["reason_code"], "BUCKET_RISK_EXCEEDED");
        assert_eq!(body["reason"], "BTC-beta bucket 1.60R exceeds cap 1.50R under caution");
        assert_eq!(body["constraints"]["require_location_confluence"], true);
    }

    #[tokio::test]
    async fn test_gate_endpoint() {
        let body = json!({
            "constraints": {"ban_new_counter_trend_longs": true, "require_trend_alignment": true, "cap_initial_risk_R": 0.5},
            "candidate": {"invalidate": 0.8, "risk_R": 0.4, "tp": [1.0], "direction": "long"},
            "macro_state": "risk_off",
            "mtf_trend": "down",
        });
        let response = app().oneshot(post_json("/v1/gate", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["decision"], "no_trade");
        assert_eq!(body["reason"], "counter-trend long banned under risk_off");
    }

    #[tokio::test]
    async fn test_decide_endpoint() {
        let body = json!({
            "macro": {"state": "supportive", "dxy_trend": "bullish", "confidence": "high"},
            "portfolio": {"open_risk_R": 1.0, "buckets": {"btc_beta": 0.5}},
            "mtf_trend": "up",
            "candidates": [
                {"invalidate": 0.8, "risk_R": 0.4, "tp": [1.0, 1.8], "direction": "long"},
                {"invalidate": 0.8, "risk_R": 0.4, "tp": []},
            ],
        });
        let response = app().oneshot(post_json("/v1/decide", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["decision"], "ok");
        assert_eq!(body["constraints"]["normal_playbook"], true);
        assert_eq!(body["candidates"][0]["decision"], "ok");
        assert_eq!(body["candidates"][1]["reason_code"], "MISSING_CANDIDATE_FIELDS");
    }

    #[tokio::test]
    async fn test_unknown_direction_is_bad_request() {
        let body = json!({"candidate": {"invalidate": 1, "risk_R": 0.4, "tp": [2], "direction": "sideways"}});
        let response = app().oneshot(post_json("/v1/gate", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/decide")
            .header("content-type", "application/json")
            .header(API_KEY_HEADER, KEY)
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/constraints")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({"ok": false, "code": 401, "error": "missing api key"})
        );
    }

    #[tokio::test]
    async fn test_invalid_api_key() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/constraints")
            .header("content-type", "application/json")
            .header(API_KEY_HEADER, "wrong")
            .body(Body::from("{}"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "invalid api key");
    }

    #[tokio::test]
    async fn test_query_key_is_accepted() {
        let request = Request::builder()
            .method("POST")
            .uri(format!("/v1/constraints?key={KEY}"))
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_repeated_query_key_is_uniform_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/constraints?key=a&key=b")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["code"], 400);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let router = create_router(state_with_capacity(2));

        for expected_remaining in ["1", "0"] {
            let response = router
                .clone()
                .oneshot(post_json("/v1/constraints", &json!({})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[RATE_LIMIT_LIMIT_HEADER], "2");
            assert_eq!(response.headers()[RATE_LIMIT_REMAINING_HEADER], expected_remaining);
        }

        let response = router
            .oneshot(post_json("/v1/constraints", &json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");
        assert!(response.headers().contains_key(RATE_LIMIT_RESET_HEADER));
        assert_eq!(body_json(response).await["error"], "rate limit exceeded");
    }

    #[tokio::test]
    async fn test_metrics_requires_header_key() {
        let request = Request::builder()
            .uri(format!("/metrics?key={KEY}"))
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "unauthorized metrics");
    }

    #[tokio::test]
    async fn test_metrics_renders_prometheus_text() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let router = create_router(state_with_capacity(60).with_metrics(handle));

        let request = Request::builder()
            .uri("/metrics")
            .header(API_KEY_HEADER, KEY)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
    }

    #[tokio::test]
    async fn test_metrics_without_recorder_is_internal_error() {
        let request = Request::builder()
            .uri("/metrics")
            .header(API_KEY_HEADER, KEY)
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "internal error");
    }
}
