//! HTTP/REST API adapter.
//!
//! Inbound adapter implementing REST endpoints that delegate to the
//! evaluation use case, guarded by API keys and a per-key rate limiter.

mod auth;
mod controller;
mod rate_limit;
mod request;
mod response;

pub use auth::{API_KEY_HEADER, ApiKeys, mask_key};
pub use controller::{AppState, ENDPOINTS, SERVICE_NAME, create_router};
pub use rate_limit::{RateStatus, SlidingWindowLimiter, next_minute_boundary};
pub use request::*;
pub use response::*;
